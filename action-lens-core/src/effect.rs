//! Effect-based state management
//!
//! The inspector reducer returns a [`DispatchResult`] describing whether the
//! state changed and which side effects (sending a synthetic action to the
//! host, copying to the clipboard, persisting the session) the runtime should
//! perform. Effects are declarative descriptions of work, not the work itself.
//!
//! # Example
//!
//! ```ignore
//! use action_lens_core::{DispatchResult, EffectStore};
//!
//! enum Effect {
//!     SendDispatch(DispatchedAction),
//! }
//!
//! fn reducer(state: &mut State, action: Action) -> DispatchResult<Effect> {
//!     match action {
//!         Action::DispatchSubmit => {
//!             let composed = compose_dispatch(&state.dispatch_type, &state.dispatch_payload);
//!             DispatchResult::changed_with(Effect::SendDispatch(composed.action))
//!         }
//!         Action::TableClear => {
//!             state.records.clear();
//!             DispatchResult::changed()
//!         }
//!     }
//! }
//! ```

use std::marker::PhantomData;

use crate::action::Action;
use crate::middleware::Middleware;

/// Result of dispatching an action to an effect-aware store.
///
/// Contains both the state change indicator and any effects to be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchResult<E> {
    /// Whether the state was modified by this action.
    pub changed: bool,
    /// Effects to be processed after dispatch.
    pub effects: Vec<E>,
}

impl<E> Default for DispatchResult<E> {
    fn default() -> Self {
        Self::unchanged()
    }
}

impl<E> DispatchResult<E> {
    /// No state change and no effects.
    #[inline]
    pub fn unchanged() -> Self {
        Self {
            changed: false,
            effects: vec![],
        }
    }

    /// State changed, no effects.
    #[inline]
    pub fn changed() -> Self {
        Self {
            changed: true,
            effects: vec![],
        }
    }

    /// A single effect without a state change.
    #[inline]
    pub fn effect(effect: E) -> Self {
        Self {
            changed: false,
            effects: vec![effect],
        }
    }

    /// State changed with a single effect.
    #[inline]
    pub fn changed_with(effect: E) -> Self {
        Self {
            changed: true,
            effects: vec![effect],
        }
    }

    /// Add an effect to this result.
    #[inline]
    pub fn with(mut self, effect: E) -> Self {
        self.effects.push(effect);
        self
    }

    /// Returns true if there are any effects to process.
    #[inline]
    pub fn has_effects(&self) -> bool {
        !self.effects.is_empty()
    }
}

impl<E> From<bool> for DispatchResult<E> {
    fn from(changed: bool) -> Self {
        Self {
            changed,
            effects: vec![],
        }
    }
}

/// A reducer function that can emit effects.
pub type EffectReducer<S, A, E> = fn(&mut S, A) -> DispatchResult<E>;

/// A store whose reducer returns [`DispatchResult<E>`].
pub struct EffectStore<S, A, E> {
    state: S,
    reducer: EffectReducer<S, A, E>,
    _marker: PhantomData<(A, E)>,
}

impl<S, A, E> EffectStore<S, A, E>
where
    A: Action,
{
    /// Create a new effect store with the given initial state and reducer.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self {
            state,
            reducer,
            _marker: PhantomData,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Get a mutable reference to the state.
    ///
    /// Use sparingly - prefer dispatching actions for state changes.
    /// This is mainly useful for restoring a saved session.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        &mut self.state
    }

    /// Dispatch an action to the store.
    #[inline]
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        (self.reducer)(&mut self.state, action)
    }
}

/// An effect store with middleware support.
///
/// Calls middleware hooks before and after each dispatch. The middleware
/// receives action references and the state change indicator, not the effects.
pub struct EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    store: EffectStore<S, A, E>,
    middleware: M,
}

impl<S, A, E, M> EffectStoreWithMiddleware<S, A, E, M>
where
    A: Action,
    M: Middleware<A>,
{
    /// Create a new effect store with middleware.
    pub fn new(state: S, reducer: EffectReducer<S, A, E>, middleware: M) -> Self {
        Self {
            store: EffectStore::new(state, reducer),
            middleware,
        }
    }

    /// Get a reference to the current state.
    #[inline]
    pub fn state(&self) -> &S {
        self.store.state()
    }

    /// Get a mutable reference to the state.
    #[inline]
    pub fn state_mut(&mut self) -> &mut S {
        self.store.state_mut()
    }

    /// Get a reference to the middleware.
    #[inline]
    pub fn middleware(&self) -> &M {
        &self.middleware
    }

    /// Dispatch an action through middleware and store.
    pub fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        self.middleware.before(&action);
        let result = self.store.dispatch(action.clone());
        self.middleware.after(&action, result.changed);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug)]
    enum TestAction {
        Append(i64),
        Clear,
        Send,
        NoOp,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Append(_) => "Append",
                TestAction::Clear => "Clear",
                TestAction::Send => "Send",
                TestAction::NoOp => "NoOp",
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum TestEffect {
        Send(usize),
        Persist,
    }

    #[derive(Default)]
    struct TestState {
        ids: Vec<i64>,
    }

    fn test_reducer(state: &mut TestState, action: TestAction) -> DispatchResult<TestEffect> {
        match action {
            TestAction::Append(id) => {
                state.ids.push(id);
                DispatchResult::changed()
            }
            TestAction::Clear => {
                state.ids.clear();
                DispatchResult::changed_with(TestEffect::Persist)
            }
            TestAction::Send => DispatchResult::effect(TestEffect::Send(state.ids.len())),
            TestAction::NoOp => DispatchResult::unchanged(),
        }
    }

    #[derive(Default)]
    struct CountingMiddleware {
        before: usize,
        changed: usize,
    }

    impl<A> Middleware<A> for CountingMiddleware {
        fn before(&mut self, _action: &A) {
            self.before += 1;
        }

        fn after(&mut self, _action: &A, state_changed: bool) {
            if state_changed {
                self.changed += 1;
            }
        }
    }

    #[test]
    fn test_dispatch_result_builders() {
        let r: DispatchResult<TestEffect> = DispatchResult::unchanged();
        assert!(!r.changed);
        assert!(!r.has_effects());

        let r = DispatchResult::changed_with(TestEffect::Persist).with(TestEffect::Send(1));
        assert!(r.changed);
        assert_eq!(r.effects, vec![TestEffect::Persist, TestEffect::Send(1)]);

        let r: DispatchResult<TestEffect> = true.into();
        assert!(r.changed);
    }

    #[test]
    fn test_effect_store() {
        let mut store = EffectStore::new(TestState::default(), test_reducer);

        assert!(store.dispatch(TestAction::Append(1)).changed);
        assert!(store.dispatch(TestAction::Append(2)).changed);
        assert_eq!(store.state().ids, vec![1, 2]);

        let result = store.dispatch(TestAction::Send);
        assert!(!result.changed);
        assert_eq!(result.effects, vec![TestEffect::Send(2)]);

        let result = store.dispatch(TestAction::Clear);
        assert!(result.changed);
        assert!(store.state().ids.is_empty());
        assert!(!store.dispatch(TestAction::NoOp).changed);
    }

    #[test]
    fn test_effect_store_with_middleware() {
        let mut store = EffectStoreWithMiddleware::new(
            TestState::default(),
            test_reducer,
            CountingMiddleware::default(),
        );

        store.dispatch(TestAction::Append(7));
        store.dispatch(TestAction::NoOp);
        store.dispatch(TestAction::Send);

        assert_eq!(store.middleware().before, 3);
        assert_eq!(store.middleware().changed, 1);
        store.state_mut().ids.push(8);
        assert_eq!(store.state().ids, vec![7, 8]);
    }
}
