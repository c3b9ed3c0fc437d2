//! Test helpers
//!
//! - [`key`] / [`char_key`] / [`ctrl_key`]: build key events from strings
//! - [`key_events`]: turn `"j j enter"` into a sequence of [`EventKind`]s
//! - [`TestHarness`]: captures actions emitted by handlers
//! - [`RenderHarness`]: renders into a `TestBackend` and returns plain text
//! - [`sample_record`]: a minimal [`ActionRecord`] fixture
//! - `assert_emitted!`, `assert_not_emitted!`, `count_emitted!`
//!
//! ```ignore
//! let mut render = RenderHarness::new(80, 10);
//! let output = render.render_to_string_plain(|frame| {
//!     table.render(frame, frame.area(), props);
//! });
//! assert!(output.contains("todos/add"));
//! ```

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::{Frame, Terminal};
use serde_json::{Map, Value};
use tokio::sync::mpsc;

use crate::event::EventKind;
use crate::inspect::buffer_to_text;
use crate::keybindings::parse_key_string;
use crate::record::{ActionRecord, DispatchedAction};
use crate::{Action, ActionCategory};

/// Parse a key string such as `"ctrl+s"` or `"shift+tab"`.
///
/// # Panics
///
/// Panics on strings [`parse_key_string`] rejects.
///
/// ```
/// use action_lens_core::testing::key;
/// use crossterm::event::{KeyCode, KeyModifiers};
///
/// let k = key("ctrl+s");
/// assert_eq!(k.code, KeyCode::Char('s'));
/// assert!(k.modifiers.contains(KeyModifiers::CONTROL));
/// ```
pub fn key(s: &str) -> KeyEvent {
    parse_key_string(s).unwrap_or_else(|| panic!("Invalid key string: {:?}", s))
}

fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    }
}

/// A plain character key.
pub fn char_key(c: char) -> KeyEvent {
    press(KeyCode::Char(c), KeyModifiers::empty())
}

pub fn ctrl_key(c: char) -> KeyEvent {
    press(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Whitespace-separated key strings as key events, in order.
///
/// ```
/// use action_lens_core::testing::key_events;
///
/// assert_eq!(key_events("j j enter").len(), 3);
/// ```
pub fn key_events(keys: &str) -> Vec<EventKind> {
    keys.split_whitespace()
        .map(|k| EventKind::Key(key(k)))
        .collect()
}

/// Typing `text` one character at a time.
pub fn typed(text: &str) -> Vec<EventKind> {
    text.chars().map(|c| EventKind::Key(char_key(c))).collect()
}

/// A record with empty snapshots and a `null` payload.
pub fn sample_record(id: i64, action_type: &str) -> ActionRecord {
    ActionRecord {
        id,
        time: format!("12:00:{:02}.000", id.rem_euclid(60)),
        took: "0.10ms".into(),
        action: Some(DispatchedAction::new(action_type, Value::Null)),
        before: Map::new(),
        after: Map::new(),
    }
}

/// State plus an action channel that handlers can send into.
pub struct TestHarness<S, A: Action> {
    pub state: S,
    tx: mpsc::UnboundedSender<A>,
    rx: mpsc::UnboundedReceiver<A>,
}

impl<S, A: Action> TestHarness<S, A> {
    pub fn new(state: S) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { state, tx, rx }
    }

    pub fn emit(&self, action: A) {
        let _ = self.tx.send(action);
    }

    /// Emit everything a `Component::handle_event` call returned.
    pub fn emit_all(&self, actions: impl IntoIterator<Item = A>) {
        for action in actions {
            self.emit(action);
        }
    }

    pub fn drain_emitted(&mut self) -> Vec<A> {
        let mut actions = Vec::new();
        while let Ok(action) = self.rx.try_recv() {
            actions.push(action);
        }
        actions
    }
}

impl<S: Default, A: Action> Default for TestHarness<S, A> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S, A: ActionCategory> TestHarness<S, A> {
    /// Drain the actions of one category; the rest stay queued.
    pub fn drain_category(&mut self, category: &str) -> Vec<A> {
        let (matching, rest): (Vec<A>, Vec<A>) = self
            .drain_emitted()
            .into_iter()
            .partition(|a| a.category() == Some(category));
        for action in rest {
            let _ = self.tx.send(action);
        }
        matching
    }
}

/// Renders closures into an in-memory terminal.
pub struct RenderHarness {
    terminal: Terminal<TestBackend>,
}

impl RenderHarness {
    /// # Panics
    ///
    /// Panics if the test terminal cannot be created.
    pub fn new(width: u16, height: u16) -> Self {
        let terminal = Terminal::new(TestBackend::new(width, height))
            .unwrap_or_else(|e| panic!("test terminal: {e}"));
        Self { terminal }
    }

    /// Render once and return the buffer as lines of text, styles dropped.
    pub fn render_to_string_plain(&mut self, render: impl FnOnce(&mut Frame)) -> String {
        let completed = self
            .terminal
            .draw(render)
            .unwrap_or_else(|e| panic!("test draw: {e}"));
        buffer_to_text(completed.buffer)
    }

    /// Render once and give access to the styled buffer.
    pub fn render_buffer(&mut self, render: impl FnOnce(&mut Frame)) -> ratatui::buffer::Buffer {
        let completed = self
            .terminal
            .draw(render)
            .unwrap_or_else(|e| panic!("test draw: {e}"));
        completed.buffer.clone()
    }
}

/// Assert that some action matches a pattern.
#[macro_export]
macro_rules! assert_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            $actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` to be emitted, but got: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

/// Assert that no action matches a pattern.
#[macro_export]
macro_rules! assert_not_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        assert!(
            !$actions.iter().any(|a| matches!(a, $pattern $(if $guard)?)),
            "Expected action matching `{}` NOT to be emitted, but it was: {:?}",
            stringify!($pattern),
            $actions
        );
    };
}

#[macro_export]
macro_rules! count_emitted {
    ($actions:expr, $pattern:pat $(if $guard:expr)?) => {
        $actions.iter().filter(|a| matches!(a, $pattern $(if $guard)?)).count()
    };
}
