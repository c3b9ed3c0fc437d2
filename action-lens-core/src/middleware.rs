//! Middleware hooks around store dispatch

use crate::action::ActionSummary;

/// Middleware trait for intercepting actions
///
/// Implement this trait to add logging, persistence, or other
/// cross-cutting concerns to the store.
pub trait Middleware<A> {
    /// Called before the action is dispatched to the reducer
    fn before(&mut self, action: &A);

    /// Called after the action is processed by the reducer
    fn after(&mut self, action: &A, state_changed: bool);
}

/// Middleware that traces every dispatched action.
///
/// Actions whose name matches one of the `quiet` names (e.g. `Tick`) are
/// counted but not logged.
#[derive(Debug, Clone)]
pub struct LoggingMiddleware {
    /// Whether to log before dispatch
    pub log_before: bool,
    /// Whether to log after dispatch
    pub log_after: bool,
    quiet: Vec<&'static str>,
    dispatched: u64,
}

impl Default for LoggingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingMiddleware {
    /// Create a new logging middleware (log after only, `Tick` is quiet)
    pub fn new() -> Self {
        Self {
            log_before: false,
            log_after: true,
            quiet: vec!["Tick"],
            dispatched: 0,
        }
    }

    /// Log both before and after dispatch
    pub fn verbose() -> Self {
        Self {
            log_before: true,
            ..Self::new()
        }
    }

    /// Replace the list of action names that are never logged
    pub fn quiet(mut self, names: &[&'static str]) -> Self {
        self.quiet = names.to_vec();
        self
    }

    /// Number of actions that went through this middleware
    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    fn is_quiet(&self, name: &str) -> bool {
        self.quiet.iter().any(|q| *q == name)
    }
}

impl<A: ActionSummary> Middleware<A> for LoggingMiddleware {
    fn before(&mut self, action: &A) {
        self.dispatched += 1;
        if self.log_before && !self.is_quiet(action.name()) {
            tracing::debug!(action = %action.name(), "Dispatching action");
        }
    }

    fn after(&mut self, action: &A, state_changed: bool) {
        if self.log_after && !self.is_quiet(action.name()) {
            tracing::debug!(
                action = %action.name(),
                summary = %action.summary(),
                state_changed,
                "Action processed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Action;

    #[derive(Clone, Debug)]
    enum TestAction {
        Tick,
        Select(i64),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Tick => "Tick",
                TestAction::Select(_) => "Select",
            }
        }
    }

    impl ActionSummary for TestAction {}

    #[test]
    fn test_logging_counts_quiet_actions() {
        let mut mw = LoggingMiddleware::new();
        mw.before(&TestAction::Tick);
        mw.after(&TestAction::Tick, false);
        mw.before(&TestAction::Select(3));
        mw.after(&TestAction::Select(3), true);

        assert_eq!(mw.dispatched(), 2);
        assert!(mw.is_quiet("Tick"));
        assert!(!mw.is_quiet("Select"));
    }

    #[test]
    fn test_quiet_override() {
        let mw = LoggingMiddleware::verbose().quiet(&["Select"]);
        assert!(mw.log_before);
        assert!(mw.is_quiet("Select"));
        assert!(!mw.is_quiet("Tick"));
    }
}
