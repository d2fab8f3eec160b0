use serde::{Deserialize, Serialize};

/// Claims carried by the credential token the backend issues on `/login-hr`.
///
/// The client never verifies the signature: the backend does that on every
/// request. The client only reads the claims to know who is signed in and
/// when the token stops being usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Email of the signed-in HR user. Stamped as `approved_by` on leave
    /// decisions.
    pub email: String,

    /// HR identifier. Stamped as `assigned_by` on new tasks.
    pub hr_id: i64,

    /// Standard JWT expiry (Unix timestamp, seconds).
    pub exp: u64,

    /// Issued-at (Unix timestamp, seconds). Older backends omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
}

impl Identity {
    /// A token is usable only while its expiry lies strictly in the future.
    pub fn is_expired_at(&self, now_secs: u64) -> bool {
        self.exp <= now_secs
    }
}
