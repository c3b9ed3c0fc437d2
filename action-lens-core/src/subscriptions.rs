//! Keyed, long-lived action sources
//!
//! The inspector has two: a tick interval that expires notices and the host
//! connection, a stream of actions decoded from the transport. Each is
//! registered under a key; registering the same key again replaces the old
//! source, and everything is aborted on [`Subscriptions::cancel_all`] or drop.
//!
//! ```ignore
//! let mut subs = Subscriptions::new(action_tx);
//! subs.interval("tick", Duration::from_millis(250), || Action::Tick);
//! subs.stream("host", transport::listen(addr));
//! ```

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

use crate::Action;

/// Identifies a subscription for cancellation.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SubKey(String);

impl SubKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SubKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SubKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry of running action sources
pub struct Subscriptions<A> {
    handles: HashMap<SubKey, JoinHandle<()>>,
    action_tx: mpsc::UnboundedSender<A>,
}

impl<A> Subscriptions<A>
where
    A: Action,
{
    pub fn new(action_tx: mpsc::UnboundedSender<A>) -> Self {
        Self {
            handles: HashMap::new(),
            action_tx,
        }
    }

    /// Emit `action_fn()` every `period`, starting one period from now.
    pub fn interval<F>(&mut self, key: impl Into<SubKey>, period: Duration, action_fn: F) -> &mut Self
    where
        F: Fn() -> A + Send + 'static,
    {
        self.spawn_keyed(key.into(), move |tx| async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // the first tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(action_fn()).is_err() {
                    break;
                }
            }
        })
    }

    /// Forward every item of `stream` as an action until it ends.
    pub fn stream<S>(&mut self, key: impl Into<SubKey>, stream: S) -> &mut Self
    where
        S: Stream<Item = A> + Send + 'static,
    {
        self.spawn_keyed(key.into(), move |tx| async move {
            tokio::pin!(stream);
            while let Some(action) = stream.next().await {
                if tx.send(action).is_err() {
                    break;
                }
            }
        })
    }

    fn spawn_keyed<F, Fut>(&mut self, key: SubKey, run: F) -> &mut Self
    where
        F: FnOnce(mpsc::UnboundedSender<A>) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.cancel(&key);
        tracing::debug!(key = key.name(), "Subscription started");
        let handle = tokio::spawn(run(self.action_tx.clone()));
        self.handles.insert(key, handle);
        self
    }

    /// Cancel a subscription by key; unknown keys are a no-op.
    pub fn cancel(&mut self, key: &SubKey) {
        if let Some(handle) = self.handles.remove(key) {
            tracing::debug!(key = key.name(), "Subscription cancelled");
            handle.abort();
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }

    pub fn is_active(&self, key: &SubKey) -> bool {
        self.handles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<A> Drop for Subscriptions<A> {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    enum TestAction {
        Tick,
        Record(i64),
    }

    impl Action for TestAction {
        fn name(&self) -> &'static str {
            match self {
                TestAction::Tick => "Tick",
                TestAction::Record(_) => "Record",
            }
        }
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<TestAction>) -> TestAction {
        tokio::time::timeout(Duration::from_millis(200), rx.recv())
            .await
            .expect("timeout")
            .expect("channel closed")
    }

    #[test]
    fn test_sub_key() {
        let a = SubKey::new("host");
        let b: SubKey = "host".into();
        let c: SubKey = String::from("host").into();
        assert_eq!(a, b);
        assert_eq!(b, c);
        assert_eq!(a.name(), "host");
    }

    #[tokio::test]
    async fn test_interval_emits_actions() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);
        subs.interval("tick", Duration::from_millis(20), || TestAction::Tick);

        assert_eq!(recv(&mut rx).await, TestAction::Tick);
        assert_eq!(recv(&mut rx).await, TestAction::Tick);
    }

    #[tokio::test]
    async fn test_stream_forwards_items_in_order() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        let records = tokio_stream::iter((1..=3).map(TestAction::Record));
        subs.stream("host", records);

        for id in 1..=3 {
            assert_eq!(recv(&mut rx).await, TestAction::Record(id));
        }
    }

    #[tokio::test]
    async fn test_cancel_stops_subscription() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);
        subs.interval("tick", Duration::from_millis(10), || TestAction::Tick);
        assert!(subs.is_active(&SubKey::new("tick")));

        recv(&mut rx).await;
        subs.cancel(&SubKey::new("tick"));
        assert!(!subs.is_active(&SubKey::new("tick")));

        while rx.try_recv().is_ok() {}
        let result = tokio::time::timeout(Duration::from_millis(50), rx.recv()).await;
        assert!(result.is_err(), "no ticks after cancel");
    }

    #[tokio::test]
    async fn test_same_key_replaces() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut subs = Subscriptions::new(tx);

        subs.interval("tick", Duration::from_secs(10), || TestAction::Tick);
        subs.interval("tick", Duration::from_secs(10), || TestAction::Tick);
        subs.stream("host", tokio_stream::pending::<TestAction>());
        assert_eq!(subs.len(), 2);

        subs.cancel_all();
        assert!(subs.is_empty());
    }
}
