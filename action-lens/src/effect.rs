//! Side effects declared by the reducer and run by the main loop

use action_lens_core::{DispatchedAction, SessionSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send a synthetic action to the connected host
    SendDispatch(DispatchedAction),
    /// Put text on the terminal clipboard (OSC 52)
    CopyToClipboard(String),
    /// Save records and selection
    PersistSession(SessionSnapshot),
}
