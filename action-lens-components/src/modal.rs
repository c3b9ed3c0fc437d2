//! Modal overlay over a dimmed background
//!
//! Used for the dispatch box: the table and sidebar stay visible (and keep
//! updating as actions arrive) underneath.

use action_lens_core::inspect::dim_area;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget, Frame};

/// How the overlay looks
#[derive(Debug, Clone, Copy)]
pub struct ModalStyle {
    /// 0.0 leaves the background as is, 1.0 turns it black
    pub dim_factor: f32,
    /// Fill for the modal area; `None` leaves it transparent
    pub bg_color: Option<Color>,
}

impl Default for ModalStyle {
    fn default() -> Self {
        Self {
            dim_factor: 0.5,
            bg_color: None,
        }
    }
}

impl ModalStyle {
    pub fn with_bg(bg_color: Color) -> Self {
        Self {
            bg_color: Some(bg_color),
            ..Default::default()
        }
    }

    pub fn dim(mut self, factor: f32) -> Self {
        self.dim_factor = factor;
        self
    }
}

/// Dim everything drawn so far and clear `area` for the modal content.
///
/// Call after the background has been rendered for this frame.
pub fn render_modal(frame: &mut Frame, area: Rect, style: &ModalStyle) {
    let full = frame.area();
    dim_area(frame.buffer_mut(), full, style.dim_factor);

    if let Some(bg) = style.bg_color {
        frame.render_widget(BgFill(bg), area);
    }
}

struct BgFill(Color);

impl Widget for BgFill {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for y in area.y..area.y.saturating_add(area.height) {
            for x in area.x..area.x.saturating_add(area.width) {
                buf[(x, y)].set_bg(self.0).set_symbol(" ");
            }
        }
    }
}

/// A `width` x `height` rectangle centered in `area`, kept one cell inside it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
