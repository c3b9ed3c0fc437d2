//! Inspection utilities for action records
//!
//! - [`segments`]: action-type tokenizer and colorizer
//! - [`snapshot`]: top-level key filter for before/after state
//! - [`tree`]: flattened value trees and shallow diffs for display
//! - [`widgets`]: ratatui widgets for the inspector panels
//! - [`theme`]: colors and styles

pub mod segments;
pub mod snapshot;
pub mod theme;
pub mod tree;
pub mod widgets;

pub use segments::{tokenize, tokenize_with, Segment, SegmentKind, SegmentPalette, Tokenized};
pub use snapshot::{filter_snapshots, is_falsy, FilteredSnapshot, Snapshot};
pub use theme::{DiffStyles, InspectorStyle};
pub use tree::{diff_rows, snapshot_rows, value_rows, DiffKind, DiffRow, TreeRow};
pub use widgets::{
    buffer_to_text, dim_area, truncate, BannerItem, DiffWidget, HelpBanner, ValueTreeWidget,
};
