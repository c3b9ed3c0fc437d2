//! The event / action / render loop
//!
//! [`EffectRuntime`] owns the store, the action channel, the task manager and
//! the subscriptions. Each turn of the loop renders if needed, then waits for
//! either a terminal event (mapped to actions by the app) or an action (sent
//! through the reducer, with effects handed to the app's effect handler).

use std::io;
use std::marker::PhantomData;
use std::time::Duration;

use ratatui::backend::Backend;
use ratatui::layout::Rect;
use ratatui::{Frame, Terminal};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
use crate::event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};
use crate::middleware::Middleware;
use crate::subscriptions::Subscriptions;
use crate::tasks::TaskManager;
use crate::Action;

/// Configuration for the event poller.
#[derive(Debug, Clone, Copy)]
struct PollerConfig {
    /// Timeout passed to each `crossterm::event::poll` call.
    poll_timeout: Duration,
    /// Sleep between poll cycles.
    loop_sleep: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            poll_timeout: Duration::from_millis(10),
            loop_sleep: Duration::from_millis(16),
        }
    }
}

/// Actions produced by an event, plus whether to re-render regardless
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventOutcome<A> {
    pub actions: Vec<A>,
    pub needs_render: bool,
}

impl<A> EventOutcome<A> {
    pub fn ignored() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: false,
        }
    }

    pub fn needs_render() -> Self {
        Self {
            actions: Vec::new(),
            needs_render: true,
        }
    }

    pub fn action(action: A) -> Self {
        Self {
            actions: vec![action],
            needs_render: false,
        }
    }

    /// Collect the result of `Component::handle_event`
    pub fn from_actions(iter: impl IntoIterator<Item = A>) -> Self {
        Self {
            actions: iter.into_iter().collect(),
            needs_render: false,
        }
    }

    pub fn with_render(mut self) -> Self {
        self.needs_render = true;
        self
    }

    pub fn is_ignored(&self) -> bool {
        self.actions.is_empty() && !self.needs_render
    }
}

impl<A> Default for EventOutcome<A> {
    fn default() -> Self {
        Self::ignored()
    }
}

impl<A> From<A> for EventOutcome<A> {
    fn from(action: A) -> Self {
        Self::action(action)
    }
}

impl<A> From<Option<A>> for EventOutcome<A> {
    fn from(action: Option<A>) -> Self {
        action.map_or_else(Self::ignored, Self::action)
    }
}

impl<A> From<Vec<A>> for EventOutcome<A> {
    fn from(actions: Vec<A>) -> Self {
        Self::from_actions(actions)
    }
}

/// Effect store interface used by [`EffectRuntime`].
pub trait EffectStoreLike<S, A: Action, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E>;
    fn state(&self) -> &S;
}

impl<S, A: Action, E> EffectStoreLike<S, A, E> for EffectStore<S, A, E> {
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStore::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStore::state(self)
    }
}

impl<S, A: Action, E, M: Middleware<A>> EffectStoreLike<S, A, E>
    for EffectStoreWithMiddleware<S, A, E, M>
{
    fn dispatch(&mut self, action: A) -> DispatchResult<E> {
        EffectStoreWithMiddleware::dispatch(self, action)
    }

    fn state(&self) -> &S {
        EffectStoreWithMiddleware::state(self)
    }
}

/// What effect handlers can reach: the action queue, tasks and subscriptions
pub struct EffectContext<'a, A: Action> {
    action_tx: &'a mpsc::UnboundedSender<A>,
    tasks: &'a mut TaskManager<A>,
    subscriptions: &'a mut Subscriptions<A>,
}

impl<'a, A: Action> EffectContext<'a, A> {
    pub fn new(
        action_tx: &'a mpsc::UnboundedSender<A>,
        tasks: &'a mut TaskManager<A>,
        subscriptions: &'a mut Subscriptions<A>,
    ) -> Self {
        Self {
            action_tx,
            tasks,
            subscriptions,
        }
    }

    /// Queue an action for the next loop turn.
    pub fn emit(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> &mpsc::UnboundedSender<A> {
        self.action_tx
    }

    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        self.tasks
    }

    pub fn subscriptions(&mut self) -> &mut Subscriptions<A> {
        self.subscriptions
    }
}

/// Runtime for effect-based stores.
pub struct EffectRuntime<S, A: Action, E, St: EffectStoreLike<S, A, E> = EffectStore<S, A, E>> {
    store: St,
    action_tx: mpsc::UnboundedSender<A>,
    action_rx: mpsc::UnboundedReceiver<A>,
    poller_config: PollerConfig,
    should_render: bool,
    tasks: TaskManager<A>,
    subscriptions: Subscriptions<A>,
    _marker: PhantomData<(S, E)>,
}

impl<S: 'static, A: Action, E> EffectRuntime<S, A, E, EffectStore<S, A, E>> {
    pub fn new(state: S, reducer: EffectReducer<S, A, E>) -> Self {
        Self::from_store(EffectStore::new(state, reducer))
    }
}

impl<S: 'static, A: Action, E, St: EffectStoreLike<S, A, E>> EffectRuntime<S, A, E, St> {
    pub fn from_store(store: St) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        Self {
            store,
            tasks: TaskManager::new(action_tx.clone()),
            subscriptions: Subscriptions::new(action_tx.clone()),
            action_tx,
            action_rx,
            poller_config: PollerConfig::default(),
            should_render: true,
            _marker: PhantomData,
        }
    }

    /// Send an action into the runtime queue.
    pub fn enqueue(&self, action: A) {
        let _ = self.action_tx.send(action);
    }

    pub fn action_tx(&self) -> mpsc::UnboundedSender<A> {
        self.action_tx.clone()
    }

    pub fn state(&self) -> &S {
        self.store.state()
    }

    pub fn tasks(&mut self) -> &mut TaskManager<A> {
        &mut self.tasks
    }

    pub fn subscriptions(&mut self) -> &mut Subscriptions<A> {
        &mut self.subscriptions
    }

    /// Run the loop until `should_quit` accepts an action or all channels close.
    pub async fn run<B, FRender, FEvent, FQuit, FEffect, R>(
        &mut self,
        terminal: &mut Terminal<B>,
        mut render: FRender,
        mut map_event: FEvent,
        mut should_quit: FQuit,
        mut handle_effect: FEffect,
    ) -> io::Result<()>
    where
        B: Backend,
        FRender: FnMut(&mut Frame, Rect, &S),
        FEvent: FnMut(&EventKind, &S) -> R,
        R: Into<EventOutcome<A>>,
        FQuit: FnMut(&A) -> bool,
        FEffect: FnMut(E, &mut EffectContext<A>),
    {
        let (event_tx, mut event_rx) = mpsc::unbounded_channel::<RawEvent>();
        let cancel_token = CancellationToken::new();
        let _poller = spawn_event_poller(
            event_tx,
            self.poller_config.poll_timeout,
            self.poller_config.loop_sleep,
            cancel_token.clone(),
        );

        loop {
            if self.should_render {
                let state = self.store.state();
                terminal.draw(|frame| {
                    let area = frame.area();
                    render(frame, area, state);
                })?;
                self.should_render = false;
            }

            tokio::select! {
                Some(raw_event) = event_rx.recv() => {
                    let event = process_raw_event(raw_event);
                    let outcome: EventOutcome<A> = map_event(&event, self.store.state()).into();
                    self.should_render |= outcome.needs_render;
                    for action in outcome.actions {
                        let _ = self.action_tx.send(action);
                    }
                }

                Some(action) = self.action_rx.recv() => {
                    if should_quit(&action) {
                        tracing::info!("Quit requested");
                        break;
                    }

                    let result = self.store.dispatch(action);
                    if result.has_effects() {
                        let mut ctx = EffectContext::new(
                            &self.action_tx,
                            &mut self.tasks,
                            &mut self.subscriptions,
                        );
                        for effect in result.effects {
                            handle_effect(effect, &mut ctx);
                        }
                    }
                    self.should_render |= result.changed;
                }

                else => {
                    break;
                }
            }
        }

        cancel_token.cancel();
        self.subscriptions.cancel_all();
        self.tasks.cancel_all();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Select(i64),
        Quit,
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Select(_) => "Select",
                TestAction::Quit => "Quit",
            }
        }
    }

    #[test]
    fn test_event_outcome_conversions() {
        let outcome: EventOutcome<TestAction> = None.into();
        assert!(outcome.is_ignored());

        let outcome: EventOutcome<TestAction> = Some(TestAction::Select(1)).into();
        assert_eq!(outcome.actions, vec![TestAction::Select(1)]);
        assert!(!outcome.needs_render);

        let outcome: EventOutcome<TestAction> =
            vec![TestAction::Select(1), TestAction::Quit].into();
        assert_eq!(outcome.actions.len(), 2);

        let outcome = EventOutcome::<TestAction>::ignored().with_render();
        assert!(outcome.needs_render);
        assert!(!outcome.is_ignored());
    }

    #[tokio::test]
    async fn test_effect_context_emits_to_runtime_queue() {
        fn reducer(state: &mut Vec<i64>, action: TestAction) -> DispatchResult<i64> {
            match action {
                TestAction::Select(id) => {
                    state.push(id);
                    DispatchResult::changed_with(id)
                }
                TestAction::Quit => DispatchResult::unchanged(),
            }
        }

        let mut runtime = EffectRuntime::new(Vec::new(), reducer);
        runtime.enqueue(TestAction::Select(3));
        assert!(runtime.state().is_empty());

        let action = runtime.action_rx.recv().await.expect("queued");
        let result = runtime.store.dispatch(action);
        assert_eq!(result.effects, vec![3]);

        let tx = runtime.action_tx();
        let mut ctx = EffectContext::new(&tx, &mut runtime.tasks, &mut runtime.subscriptions);
        ctx.emit(TestAction::Quit);
        assert_eq!(runtime.action_rx.recv().await, Some(TestAction::Quit));
        assert_eq!(runtime.state(), &vec![3]);
    }
}
