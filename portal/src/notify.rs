//! Transient notices (the terminal's toasts).

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Info => f.write_str("info"),
            Self::Error => f.write_str("error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
    pub expires_at: Instant,
}

/// Queue of notices, oldest first. Each one disappears after the configured
/// time to live.
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    queue: VecDeque<Notice>,
}

/// Upper bound on notices shown at once; older ones are dropped first.
const MAX_VISIBLE: usize = 4;

impl Notices {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            queue: VecDeque::new(),
        }
    }

    pub fn push(&mut self, level: Level, text: impl Into<String>, now: Instant) {
        let text = text.into();
        match level {
            Level::Error => error!("notice: {}", text),
            _ => info!("notice ({}): {}", level, text),
        }
        if self.queue.len() == MAX_VISIBLE {
            self.queue.pop_front();
        }
        self.queue.push_back(Notice {
            level,
            text,
            expires_at: now + self.ttl,
        });
    }

    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.push(Level::Success, text, now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.push(Level::Error, text, now);
    }

    pub fn info(&mut self, text: impl Into<String>, now: Instant) {
        self.push(Level::Info, text, now);
    }

    /// Drop expired notices. Returns whether anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.expires_at > now);
        before != self.queue.len()
    }

    pub fn active(&self) -> impl Iterator<Item = &Notice> {
        self.queue.iter()
    }

    pub fn latest(&self) -> Option<&Notice> {
        self.queue.back()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
