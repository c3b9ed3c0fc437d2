//! Rendering utilities and widgets for the inspector panels
//!
//! Widgets take already-computed rows ([`TreeRow`], [`DiffRow`]) and only
//! handle layout and styling.

use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, Widget};

use super::theme::{DiffStyles, InspectorStyle};
use super::tree::{DiffKind, DiffRow, TreeRow};

/// Convert a buffer to plain text
///
/// Trims trailing whitespace from each line.
pub fn buffer_to_text(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut out = String::new();

    for y in area.y..area.y.saturating_add(area.height) {
        let mut line = String::new();
        for x in area.x..area.x.saturating_add(area.width) {
            line.push_str(buffer[(x, y)].symbol());
        }
        out.push_str(line.trim_end_matches(' '));
        if y + 1 < area.y.saturating_add(area.height) {
            out.push('\n');
        }
    }

    out
}

/// Dim a region of a buffer by scaling colors towards black
///
/// `factor` ranges from 0.0 (no change) to 1.0 (black).
pub fn dim_area(buffer: &mut Buffer, area: Rect, factor: f32) {
    let scale = 1.0 - factor.clamp(0.0, 1.0);
    let area = area.intersection(buffer.area);

    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.fg = dim_color(cell.fg, scale);
                cell.bg = dim_color(cell.bg, scale);
            }
        }
    }
}

fn dim_color(color: Color, scale: f32) -> Color {
    let scaled = |r: u8, g: u8, b: u8| {
        Color::Rgb(
            ((r as f32) * scale) as u8,
            ((g as f32) * scale) as u8,
            ((b as f32) * scale) as u8,
        )
    };
    match color {
        Color::Rgb(r, g, b) => scaled(r, g, b),
        Color::Red | Color::LightRed => scaled(205, 0, 0),
        Color::Green | Color::LightGreen => scaled(0, 205, 0),
        Color::Yellow | Color::LightYellow => scaled(205, 205, 0),
        Color::Blue | Color::LightBlue => scaled(0, 0, 238),
        Color::Magenta | Color::LightMagenta => scaled(205, 0, 205),
        Color::Cyan | Color::LightCyan => scaled(0, 205, 205),
        Color::Gray | Color::White => scaled(229, 229, 229),
        Color::DarkGray => scaled(127, 127, 127),
        // Indexed colors, black and reset are left alone
        other => other,
    }
}

/// Truncate to `max` characters, appending `…` when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max - 1).collect();
    out.push('…');
    out
}

/// A key hint in the help banner
#[derive(Clone)]
pub struct BannerItem<'a> {
    pub key: &'a str,
    pub label: &'a str,
    pub key_style: Style,
}

impl<'a> BannerItem<'a> {
    pub fn new(key: &'a str, label: &'a str, key_style: Style) -> Self {
        Self {
            key,
            label,
            key_style,
        }
    }
}

/// A one-line help banner: title chip, key hints and an optional status
/// message on the right
///
/// ```ignore
/// let banner = HelpBanner::new()
///     .title("action-lens")
///     .item(BannerItem::new("/", "search", key_style))
///     .status(Span::styled("connected", ok_style));
/// f.render_widget(banner, area);
/// ```
pub struct HelpBanner<'a> {
    title: Option<&'a str>,
    title_style: Style,
    items: Vec<BannerItem<'a>>,
    status: Option<Span<'a>>,
    label_style: Style,
    background: Style,
}

impl Default for HelpBanner<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> HelpBanner<'a> {
    pub fn new() -> Self {
        Self {
            title: None,
            title_style: Style::default(),
            items: Vec::new(),
            status: None,
            label_style: Style::default(),
            background: Style::default(),
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn title_style(mut self, style: Style) -> Self {
        self.title_style = style;
        self
    }

    pub fn item(mut self, item: BannerItem<'a>) -> Self {
        self.items.push(item);
        self
    }

    /// Right-aligned status text
    pub fn status(mut self, status: Span<'a>) -> Self {
        self.status = Some(status);
        self
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }

    pub fn background(mut self, style: Style) -> Self {
        self.background = style;
        self
    }

    /// Apply title, label and background styles from the inspector theme
    pub fn themed(self, style: &InspectorStyle) -> Self {
        self.title_style(style.title_style)
            .label_style(style.label_style)
            .background(style.banner_bg)
    }
}

impl Widget for HelpBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        buf.set_style(area, self.background);

        let mut spans = Vec::new();
        if let Some(title) = self.title {
            spans.push(Span::styled(format!(" {title} "), self.title_style));
            spans.push(Span::raw(" "));
        }
        for item in &self.items {
            spans.push(Span::styled(format!(" {} ", item.key), item.key_style));
            spans.push(Span::styled(format!(" {} ", item.label), self.label_style));
        }
        Paragraph::new(Line::from(spans))
            .style(self.background)
            .render(area, buf);

        if let Some(status) = self.status {
            let width = (status.width() as u16).min(area.width);
            let status_area = Rect {
                x: area.x + area.width - width,
                width,
                ..area
            };
            Paragraph::new(Line::from(status)).render(status_area, buf);
        }
    }
}

/// Renders value tree rows with a scroll offset
pub struct ValueTreeWidget<'a> {
    rows: &'a [TreeRow],
    scroll_offset: usize,
    key_style: Style,
    value_style: Style,
}

impl<'a> ValueTreeWidget<'a> {
    pub fn new(rows: &'a [TreeRow]) -> Self {
        Self {
            rows,
            scroll_offset: 0,
            key_style: Style::default()
                .fg(InspectorStyle::accent_amber())
                .add_modifier(Modifier::BOLD),
            value_style: Style::default().fg(InspectorStyle::text_primary()),
        }
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn key_style(mut self, style: Style) -> Self {
        self.key_style = style;
        self
    }

    pub fn value_style(mut self, style: Style) -> Self {
        self.value_style = style;
        self
    }
}

impl Widget for ValueTreeWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let visible = area.height as usize;
        let max_offset = self.rows.len().saturating_sub(visible);
        let offset = self.scroll_offset.min(max_offset);

        let lines: Vec<Line> = self
            .rows
            .iter()
            .skip(offset)
            .take(visible)
            .map(|row| {
                let marker = if row.expanded { "▾ " } else { "  " };
                let mut spans = vec![Span::raw("  ".repeat(row.depth)), Span::raw(marker)];
                if let Some(key) = &row.key {
                    spans.push(Span::styled(key.clone(), self.key_style));
                    spans.push(Span::raw(": "));
                }
                spans.push(Span::styled(row.preview.clone(), self.value_style));
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).render(area, buf);
    }
}

/// Renders the top-level diff of two snapshots as a table
pub struct DiffWidget<'a> {
    rows: &'a [DiffRow],
    styles: DiffStyles,
    header: Style,
    scroll_offset: usize,
}

impl<'a> DiffWidget<'a> {
    pub fn new(rows: &'a [DiffRow]) -> Self {
        Self {
            rows,
            styles: DiffStyles::default(),
            header: Style::default()
                .fg(InspectorStyle::accent_teal())
                .add_modifier(Modifier::BOLD),
            scroll_offset: 0,
        }
    }

    pub fn styles(mut self, styles: DiffStyles) -> Self {
        self.styles = styles;
        self
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    fn style_for(&self, kind: DiffKind) -> Style {
        match kind {
            DiffKind::Added => self.styles.added,
            DiffKind::Removed => self.styles.removed,
            DiffKind::Changed => self.styles.changed,
            DiffKind::Unchanged => self.styles.unchanged,
        }
    }
}

impl Widget for DiffWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 || area.width < 12 {
            return;
        }

        let visible = area.height.saturating_sub(1) as usize;
        let max_offset = self.rows.len().saturating_sub(visible);
        let offset = self.scroll_offset.min(max_offset);

        let header = Row::new(vec![
            Cell::from(" "),
            Cell::from("Key").style(self.header),
            Cell::from("Before").style(self.header),
            Cell::from("After").style(self.header),
        ]);

        let rows: Vec<Row> = self
            .rows
            .iter()
            .skip(offset)
            .take(visible)
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.kind.marker()),
                    Cell::from(row.key.clone()),
                    Cell::from(row.before.clone().unwrap_or_default()),
                    Cell::from(row.after.clone().unwrap_or_default()),
                ])
                .style(self.style_for(row.kind))
            })
            .collect();

        let constraints = [
            Constraint::Length(1),
            Constraint::Percentage(30),
            Constraint::Percentage(35),
            Constraint::Percentage(35),
        ];
        Table::new(rows, constraints)
            .header(header)
            .column_spacing(1)
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::tree::{diff_rows, value_rows};
    use serde_json::json;

    fn render(widget: impl Widget, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        widget.render(area, &mut buffer);
        buffer
    }

    #[test]
    fn test_buffer_to_text() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 10, 3));
        buffer[(0, 0)].set_char('H');
        buffer[(1, 0)].set_char('i');
        buffer[(0, 1)].set_char('!');

        let text = buffer_to_text(&buffer);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Hi");
        assert_eq!(lines[1], "!");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("todos/fetch/pending", 8), "todos/f…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn test_dim_area() {
        let mut buffer = Buffer::empty(Rect::new(0, 0, 2, 1));
        buffer[(0, 0)].set_fg(Color::Rgb(200, 100, 50));
        buffer[(1, 0)].set_fg(Color::Rgb(200, 100, 50));

        dim_area(&mut buffer, Rect::new(0, 0, 1, 1), 0.5);
        assert_eq!(buffer[(0, 0)].fg, Color::Rgb(100, 50, 25));
        assert_eq!(buffer[(1, 0)].fg, Color::Rgb(200, 100, 50));
    }

    #[test]
    fn test_help_banner() {
        let banner = HelpBanner::new()
            .title("LENS")
            .item(BannerItem::new("/", "search", Style::default()))
            .status(Span::raw("connected"));

        let text = buffer_to_text(&render(banner, 50, 1));
        assert!(text.starts_with(" LENS"));
        assert!(text.contains("search"));
        assert!(text.ends_with("connected"));
    }

    #[test]
    fn test_value_tree_widget() {
        let rows = value_rows(&json!({"type": "a/b", "payload": 1}), 1);
        let text = buffer_to_text(&render(ValueTreeWidget::new(&rows), 30, 4));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "▾ {2 keys}");
        assert_eq!(lines[1], "    payload: 1");
        assert_eq!(lines[2], "    type: \"a/b\"");
    }

    #[test]
    fn test_diff_widget() {
        let before = json!({"count": 1}).as_object().cloned().unwrap();
        let after = json!({"count": 2, "todos": []}).as_object().cloned().unwrap();
        let rows = diff_rows(&before, &after);

        let text = buffer_to_text(&render(DiffWidget::new(&rows), 40, 4));
        assert!(text.contains("Key"));
        assert!(text.contains("~ count"));
        assert!(text.contains("+ todos"));
    }
}
