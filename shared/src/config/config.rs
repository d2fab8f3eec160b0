use std::fs;
use std::path::Path;
use tracing::{debug, error, info, warn};

use crate::types::client_config::{ClientConfig, ConfigError};

pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    info!("Loading configuration from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    debug!("Processing file: {}", path.display());

    if contents.trim().is_empty() {
        error!("Configuration file is empty");
        return Err(ConfigError::InvalidConfig("empty file".into()));
    }

    let config: ClientConfig = toml::from_str(&contents)?;

    info!("Configuration loaded successfully");
    debug!("Config: {:?}", config);

    validate_config(&config)?;

    info!("Config validated");

    Ok(config)
}

/// Load `path` when it exists, otherwise fall back to built-in defaults.
/// A file that exists but does not parse or validate is still an error.
pub fn load_or_default(path: Option<&Path>) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(p) if p.exists() => load_config(p),
        Some(p) => {
            warn!("Config file {} not found, using defaults", p.display());
            default_config()
        }
        None => default_config(),
    }
}

fn default_config() -> Result<ClientConfig, ConfigError> {
    let config = ClientConfig::default();
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &ClientConfig) -> Result<(), ConfigError> {
    validate_http_url("api.base_url", &config.api.base_url)?;

    if let Some(scoring) = &config.api.scoring_url {
        validate_http_url("api.scoring_url", scoring)?;
    }

    if config.ui.notice_ttl_ms == 0 {
        return Err(ConfigError::InvalidConfig(
            "notice_ttl_ms must be greater than 0".into(),
        ));
    }

    if config.ui.menu_width == 0 || config.ui.menu_height == 0 {
        return Err(ConfigError::InvalidConfig(
            "menu_width and menu_height must be greater than 0".into(),
        ));
    }

    Ok(())
}

// The client speaks plain HTTP only; TLS termination is the deployment's job.
fn validate_http_url(name: &str, url: &str) -> Result<(), ConfigError> {
    let Some(rest) = url.strip_prefix("http://") else {
        return Err(ConfigError::InvalidConfig(format!(
            "{} must start with http:// (got {:?})",
            name, url
        )));
    };

    if rest.trim_matches('/').is_empty() {
        return Err(ConfigError::InvalidConfig(format!(
            "{} is missing a host",
            name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_full_config() {
        let file = write_config(
            r#"
[api]
base_url = "http://hr.internal:5000/api/"
scoring_url = "http://ml.internal:8000"

[storage]
data_dir = "/tmp/hr"
ephemeral = true

[ui]
notice_ttl_ms = 3500
menu_width = 20
menu_height = 6
menu_padding = 2
"#,
        );

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.api.base(), "http://hr.internal:5000/api");
        assert_eq!(config.api.scoring_url.as_deref(), Some("http://ml.internal:8000"));
        assert!(config.storage.ephemeral);
        assert_eq!(config.ui.notice_ttl_ms, 3500);
        assert_eq!(config.ui.menu_padding, 2);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_config("[api]\nbase_url = \"http://localhost:5000/api\"\n");
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.ui.notice_ttl_ms, 2000);
        assert_eq!(config.ui.menu_width, 18);
        assert!(!config.storage.ephemeral);
        assert!(config.api.scoring_url.is_none());
    }

    #[test]
    fn empty_file_is_rejected() {
        let file = write_config("   \n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn https_base_url_is_rejected() {
        let file = write_config("[api]\nbase_url = \"https://hr.example.com/api\"\n");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_notice_ttl_is_rejected() {
        let file = write_config("[ui]\nnotice_ttl_ms = 0\n");
        assert!(load_config(file.path()).is_err());
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let file = write_config("[api\nbase_url = ");
        assert!(matches!(
            load_config(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_or_default(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
    }
}
