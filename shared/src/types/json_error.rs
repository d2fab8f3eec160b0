use serde::{Deserialize, Serialize};

/// Shape of the backend's error bodies. Only `message` is reliably present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ErrorResponse {
    /// Best-effort extraction of the server's message from a raw body.
    pub fn message_from(body: &[u8]) -> Option<String> {
        serde_json::from_slice::<ErrorResponse>(body)
            .ok()
            .map(|e| e.message)
            .filter(|m| !m.is_empty())
    }
}
