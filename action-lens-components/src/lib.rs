//! Reusable components for action-lens
//!
//! Components implement [`action_lens_core::Component`] and report user
//! intent through action constructors passed in their props.
//!
//! - [`RecordTable`]: the Time / Action / Duration table of dispatched actions
//! - [`TextInput`]: single-line input used for search, filter and dispatch fields
//! - [`render_modal`]: overlay with a dimmed background
//!
//! ```ignore
//! use action_lens_components::{RecordTable, RecordTableProps};
//!
//! table.render(frame, area, RecordTableProps {
//!     records: &visible,
//!     selected_id: state.selected_id,
//!     is_focused: state.focus == InspectorContext::Table,
//!     follow_tail: state.follow_tail(),
//!     empty_message: "Waiting for actions...",
//!     on_select: Action::TableSelect,
//! });
//! ```

mod modal;
mod record_table;
mod text_input;

pub use modal::{centered_rect, render_modal, ModalStyle};
pub use record_table::{RecordTable, RecordTableProps};
pub use text_input::{TextInput, TextInputProps};

pub mod prelude {
    pub use crate::{
        centered_rect, render_modal, ModalStyle, RecordTable, RecordTableProps, TextInput,
        TextInputProps,
    };
}
