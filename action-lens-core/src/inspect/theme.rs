//! Inspector colors and styles

use ratatui::style::{Color, Modifier, Style};

/// Round-robin colors for normal action-type segments
pub const SEGMENT_COLORS: [Color; 4] = [
    Color::Rgb(0xec, 0x5f, 0x67),
    Color::Rgb(0xe0, 0xaf, 0x02),
    Color::Rgb(0x0c, 0x96, 0x9b),
    Color::Rgb(0x99, 0x4c, 0xc3),
];

/// Color of `/` separators and lifecycle suffixes
pub const MUTED_SEGMENT: Color = Color::Rgb(0xcc, 0xd1, 0xe4);

const ACCENT_PURPLE: Color = Color::Rgb(153, 76, 195);
const ACCENT_TEAL: Color = Color::Rgb(12, 150, 155);
const ACCENT_AMBER: Color = Color::Rgb(224, 175, 2);
const ACCENT_RED: Color = Color::Rgb(236, 95, 103);
const ACCENT_GREEN: Color = Color::Rgb(80, 220, 120);

const BG_DEEP: Color = Color::Rgb(12, 14, 22);
const BG_PANEL: Color = Color::Rgb(18, 21, 32);
const BG_SURFACE: Color = Color::Rgb(26, 30, 44);
const BG_HIGHLIGHT: Color = Color::Rgb(45, 50, 70);

const TEXT_PRIMARY: Color = Color::Rgb(240, 240, 245);
const TEXT_SECONDARY: Color = Color::Rgb(150, 150, 160);

/// Style configuration for the inspector UI
#[derive(Debug, Clone)]
pub struct InspectorStyle {
    /// Background of the help bar
    pub banner_bg: Style,
    /// Title style for the app label in the help bar
    pub title_style: Style,
    /// Key hint chips in the help bar
    pub key_style: Style,
    /// Panel border when focused
    pub focused_border: Style,
    /// Panel border when not focused
    pub border: Style,
    /// Label style (field names, column headers)
    pub label_style: Style,
    /// Value style
    pub value_style: Style,
    /// Diff row styles
    pub diff: DiffStyles,
    /// Success notice
    pub notice_success: Style,
    /// Error notice
    pub notice_error: Style,
    /// Dim factor applied behind modals (0.0-1.0)
    pub dim_factor: f32,
}

/// Styles for top-level diff rows
#[derive(Debug, Clone)]
pub struct DiffStyles {
    pub added: Style,
    pub removed: Style,
    pub changed: Style,
    pub unchanged: Style,
}

impl Default for DiffStyles {
    fn default() -> Self {
        Self {
            added: Style::default().fg(ACCENT_GREEN),
            removed: Style::default()
                .fg(ACCENT_RED)
                .add_modifier(Modifier::CROSSED_OUT),
            changed: Style::default().fg(ACCENT_AMBER),
            unchanged: Style::default().fg(TEXT_SECONDARY),
        }
    }
}

impl Default for InspectorStyle {
    fn default() -> Self {
        Self {
            banner_bg: Style::default().bg(BG_DEEP),
            title_style: Style::default()
                .fg(BG_DEEP)
                .bg(ACCENT_PURPLE)
                .add_modifier(Modifier::BOLD),
            key_style: Style::default()
                .fg(BG_DEEP)
                .bg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            focused_border: Style::default().fg(ACCENT_TEAL),
            border: Style::default().fg(BG_HIGHLIGHT),
            label_style: Style::default().fg(TEXT_SECONDARY),
            value_style: Style::default().fg(TEXT_PRIMARY),
            diff: DiffStyles::default(),
            notice_success: Style::default()
                .fg(BG_DEEP)
                .bg(ACCENT_GREEN)
                .add_modifier(Modifier::BOLD),
            notice_error: Style::default()
                .fg(TEXT_PRIMARY)
                .bg(ACCENT_RED)
                .add_modifier(Modifier::BOLD),
            dim_factor: 0.6,
        }
    }
}

impl InspectorStyle {
    pub const fn accent_purple() -> Color {
        ACCENT_PURPLE
    }
    pub const fn accent_teal() -> Color {
        ACCENT_TEAL
    }
    pub const fn accent_amber() -> Color {
        ACCENT_AMBER
    }
    pub const fn bg_deep() -> Color {
        BG_DEEP
    }
    pub const fn bg_panel() -> Color {
        BG_PANEL
    }
    pub const fn bg_surface() -> Color {
        BG_SURFACE
    }
    /// Background for selected rows
    pub const fn bg_highlight() -> Color {
        BG_HIGHLIGHT
    }
    pub const fn text_primary() -> Color {
        TEXT_PRIMARY
    }
    pub const fn text_secondary() -> Color {
        TEXT_SECONDARY
    }
}
