//! Composing synthetic actions and the notices they raise

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::record::DispatchedAction;

/// How long a notice stays on screen
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

/// Maximum number of notices shown at once
pub const MAX_NOTICES: usize = 3;

pub const INVALID_PAYLOAD: &str = "Invalid JSON format in the payload";
pub const DISPATCHED: &str = "The action is dispatched";
pub const DISPATCH_FAILED: &str = "Failed to get response from client ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A short-lived message shown after a user operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub created: Instant,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            created: Instant::now(),
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.created) >= NOTICE_DURATION
    }
}

/// Bounded queue of notices, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notices {
    items: VecDeque<Notice>,
}

impl Notices {
    /// Push a notice, dropping the oldest when more than [`MAX_NOTICES`]
    pub fn push(&mut self, notice: Notice) {
        self.items.push_back(notice);
        while self.items.len() > MAX_NOTICES {
            self.items.pop_front();
        }
    }

    /// Drop expired notices; returns true if anything was removed
    pub fn expire(&mut self, now: Instant) -> bool {
        let before = self.items.len();
        self.items.retain(|n| !n.is_expired(now));
        self.items.len() != before
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// A synthetic action ready to send, plus a notice if the payload was bad
#[derive(Debug, Clone, PartialEq)]
pub struct Composed {
    pub action: DispatchedAction,
    pub notice: Option<Notice>,
}

/// Build the action for the dispatch box.
///
/// A blank payload becomes `[]`. A payload that is not valid JSON is sent as
/// the raw string and raises an error notice.
pub fn compose_dispatch(action_type: &str, payload_text: &str) -> Composed {
    if payload_text.trim().is_empty() {
        return Composed {
            action: DispatchedAction::new(action_type, Value::Array(Vec::new())),
            notice: None,
        };
    }

    match serde_json::from_str::<Value>(payload_text) {
        Ok(payload) => Composed {
            action: DispatchedAction::new(action_type, payload),
            notice: None,
        },
        Err(err) => {
            tracing::debug!(error = %err, "Payload is not JSON, sending raw text");
            Composed {
                action: DispatchedAction::new(action_type, Value::String(payload_text.to_string())),
                notice: Some(Notice::error(INVALID_PAYLOAD)),
            }
        }
    }
}

/// Notice text for a failed dispatch
pub fn dispatch_failed(error: &str) -> String {
    format!("{DISPATCH_FAILED}{error}")
}
