//! Core runtime and inspection model for action-lens
//!
//! Two halves live here:
//!
//! - the application runtime: [`Action`], [`EffectStore`] with middleware,
//!   [`EffectRuntime`], [`Component`], [`Keybindings`], keyed
//!   [`Subscriptions`] and [`TaskManager`];
//! - the inspection model: [`ActionRecord`], the action-type tokenizer
//!   ([`inspect::tokenize`]), the state key filter
//!   ([`inspect::filter_snapshots`]), value trees and diffs, the synthetic
//!   action composer, panel flags and session persistence.
//!
//! # Example
//!
//! ```
//! use action_lens_core::inspect::{filter_snapshots, tokenize};
//! use serde_json::json;
//!
//! let tokens = tokenize("todos/add/fulfilled");
//! assert_eq!(tokens.segments().len(), 5);
//!
//! let before = json!({"todos": [], "user": null}).as_object().cloned().unwrap_or_default();
//! let after = json!({"todos": [1], "user": null}).as_object().cloned().unwrap_or_default();
//! let filtered = filter_snapshots(Some("TODO"), &before, &after);
//! assert_eq!(filtered.after.len(), 1);
//! ```

pub mod action;
pub mod component;
pub mod compose;
pub mod effect;
pub mod event;
pub mod inspect;
pub mod keybindings;
pub mod middleware;
pub mod panels;
pub mod record;
pub mod runtime;
pub mod session;
pub mod subscriptions;
pub mod tasks;
pub mod testing;

pub use action::{Action, ActionCategory, ActionSummary};
pub use component::Component;

pub use event::{process_raw_event, spawn_event_poller, EventKind, RawEvent};

pub use keybindings::{
    default_inspector_keybindings, format_key_for_display, parse_key_string, BindingContext,
    InspectorContext, Keybindings,
};

pub use middleware::{LoggingMiddleware, Middleware};

pub use effect::{DispatchResult, EffectReducer, EffectStore, EffectStoreWithMiddleware};
pub use runtime::{EffectContext, EffectRuntime, EffectStoreLike, EventOutcome};

pub use subscriptions::{SubKey, Subscriptions};
pub use tasks::{TaskKey, TaskManager};

pub use compose::{compose_dispatch, Composed, Notice, NoticeLevel, Notices};
pub use panels::{PanelFlags, PanelToggles};
pub use record::{ActionRecord, DispatchedAction};
pub use session::{FileSessionStore, SessionError, SessionSnapshot, SessionStore};

pub use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    Frame,
};

pub mod prelude {
    pub use crate::action::{Action, ActionCategory, ActionSummary};
    pub use crate::component::Component;
    pub use crate::effect::{DispatchResult, EffectStore, EffectStoreWithMiddleware};
    pub use crate::event::EventKind;
    pub use crate::keybindings::{BindingContext, InspectorContext, Keybindings};
    pub use crate::runtime::{EffectContext, EffectRuntime, EventOutcome};
    pub use crate::{Frame, Rect};
}
