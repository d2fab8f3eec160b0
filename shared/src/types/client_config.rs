use serde::Deserialize;
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// Config structs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Root of the external scoring service. Prediction pages are disabled
    /// when unset.
    #[serde(default)]
    pub scoring_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StorageConfig {
    /// Directory holding the persisted token and the log file.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Keep the token in memory only; it is gone when the process exits.
    #[serde(default)]
    pub ephemeral: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UiConfig {
    #[serde(default = "default_notice_ttl")]
    pub notice_ttl_ms: u64,
    #[serde(default = "default_menu_width")]
    pub menu_width: u16,
    #[serde(default = "default_menu_height")]
    pub menu_height: u16,
    #[serde(default = "default_menu_padding")]
    pub menu_padding: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

impl ApiConfig {
    /// Base URL without a trailing slash, ready for `format!("{}{}", base, path)`.
    pub fn base(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl StorageConfig {
    /// Resolve the data directory: explicit config, then `$HR_PORTAL_HOME`,
    /// then `$HOME/.hr-portal`, then the working directory.
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }
        if let Some(dir) = std::env::var_os("HR_PORTAL_HOME").filter(|d| !d.is_empty()) {
            return PathBuf::from(dir);
        }
        std::env::var_os("HOME")
            .filter(|h| !h.is_empty())
            .map(|home| PathBuf::from(home).join(".hr-portal"))
            .unwrap_or_else(|| PathBuf::from(".hr-portal"))
    }
}

impl UiConfig {
    pub fn notice_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.notice_ttl_ms)
    }
}

// ---------------------------------------------------------------------------
// Serde defaults
// ---------------------------------------------------------------------------

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            scoring_url: None,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            notice_ttl_ms: default_notice_ttl(),
            menu_width: default_menu_width(),
            menu_height: default_menu_height(),
            menu_padding: default_menu_padding(),
        }
    }
}

pub fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

pub fn default_notice_ttl() -> u64 {
    2000
}

pub fn default_menu_width() -> u16 {
    18
}

pub fn default_menu_height() -> u16 {
    5
}

pub fn default_menu_padding() -> u16 {
    1
}
