use std::collections::HashSet;

/// Marker consulted by the dashboard's one-time refresh.
pub const DASHBOARD_REFRESHED: &str = "dashboard_refreshed";

/// Session-scoped flags that can each be claimed once.
///
/// Lives as long as the process (the terminal "session"); clearing it is the
/// equivalent of the session ending.
#[derive(Debug, Default, Clone)]
pub struct SessionMarker {
    claimed: HashSet<String>,
}

impl SessionMarker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` exactly once per key until [`SessionMarker::clear`].
    pub fn claim(&mut self, key: &str) -> bool {
        self.claimed.insert(key.to_string())
    }

    pub fn is_claimed(&self, key: &str) -> bool {
        self.claimed.contains(key)
    }

    pub fn clear(&mut self) {
        self.claimed.clear();
    }
}
