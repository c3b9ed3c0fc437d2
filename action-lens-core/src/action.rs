//! Action traits for type-safe state mutations

use std::fmt::Debug;

/// Marker trait for actions that can be dispatched to the store
///
/// Actions represent intents to change inspector state. They should be:
/// - Clone: Actions may be logged or sent to multiple handlers
/// - Debug: For debugging and logging
/// - Send + 'static: For async dispatch from tasks and subscriptions
pub trait Action: Clone + Debug + Send + 'static {
    /// Get the action name for logging and filtering
    fn name(&self) -> &'static str;
}

/// Groups actions by the part of the UI (or the host) they belong to.
///
/// Categories are plain strings such as `"host"`, `"table"` or `"dispatch"`.
/// Actions without a category return `None`.
pub trait ActionCategory: Action {
    /// Category name, if the action belongs to one
    fn category(&self) -> Option<&'static str>;

    /// Whether the action belongs to `category`
    fn in_category(&self, category: &str) -> bool {
        self.category() == Some(category)
    }
}

/// Short, log-friendly rendering of an action.
///
/// Actions that carry whole state snapshots should override this so that
/// log lines stay readable.
pub trait ActionSummary: Action {
    /// One-line summary of the action
    fn summary(&self) -> String {
        format!("{:?}", self)
    }
}
