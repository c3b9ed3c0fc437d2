//! Terminal inspector for actions dispatched by an instrumented application
//!
//! The host application connects over TCP and streams one JSON message per
//! line: `actionDispatched` for every action it handles and `actionInit` for
//! its initial state. Synthetic actions composed in the dispatch box travel
//! back over the same connection.

pub mod action;
pub mod components;
pub mod config;
pub mod effect;
pub mod reducer;
pub mod state;
pub mod transport;

pub use action::Action;
pub use components::Inspector;
pub use config::{Args, Config, ConfigError, Source};
pub use effect::Effect;
pub use reducer::reducer;
pub use state::AppState;
