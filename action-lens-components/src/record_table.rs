//! Scrollable table of dispatched actions
//!
//! Columns are Time, Action (colorized by segment) and Duration. The record
//! id is not shown; it is what selection refers to, so the selection survives
//! filtering and appends.

use action_lens_core::inspect::{truncate, InspectorStyle};
use action_lens_core::{ActionRecord, Component, EventKind};
use crossterm::event::{MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, HighlightSpacing, Paragraph, Row, Table, TableState},
    Frame,
};

const TIME_WIDTH: u16 = 12;
const DURATION_WIDTH: u16 = 10;
const HIGHLIGHT_SYMBOL: &str = "▸ ";
/// Border plus header
const CHROME_ROWS: u16 = 3;

pub struct RecordTableProps<'a, A> {
    /// Rows to show, already filtered, in insertion order
    pub records: &'a [&'a ActionRecord],
    pub selected_id: Option<i64>,
    pub is_focused: bool,
    /// Keep the newest row in view, even if the selection scrolls away
    pub follow_tail: bool,
    /// Shown when `records` is empty
    pub empty_message: &'a str,
    pub on_select: fn(i64) -> A,
}

/// The action table
///
/// Keyboard navigation goes through keybindings in the app; this component
/// handles mouse clicks and the scroll wheel itself.
#[derive(Default)]
pub struct RecordTable {
    scroll_offset: usize,
    /// Where the data rows were drawn last frame, for mouse hit-testing
    body_area: Rect,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    fn ensure_visible(&mut self, index: usize, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }
        if index < self.scroll_offset {
            self.scroll_offset = index;
        } else if index >= self.scroll_offset + viewport_height {
            self.scroll_offset = index + 1 - viewport_height;
        }
    }

    fn selected_index(records: &[&ActionRecord], selected_id: Option<i64>) -> Option<usize> {
        let id = selected_id?;
        records.iter().position(|r| r.id == id)
    }

    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.body_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| self.scroll_offset + (row - area.y) as usize)
    }

    /// Id of the record a click or scroll selects, if it changes anything
    fn mouse_selection(
        &self,
        event: &EventKind,
        records: &[&ActionRecord],
        selected_id: Option<i64>,
    ) -> Option<i64> {
        let last = records.len().checked_sub(1)?;
        match event {
            EventKind::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let index = self.row_at(mouse.column, mouse.row)?;
                records.get(index).map(|r| r.id)
            }
            EventKind::Scroll { column, row, delta } => {
                self.row_at(*column, *row)?;
                let current = Self::selected_index(records, selected_id);
                let next = match current {
                    Some(i) if *delta > 0 => (i + 1).min(last),
                    Some(i) => i.saturating_sub(1),
                    None if *delta > 0 => 0,
                    None => last,
                };
                (Some(next) != current).then(|| records[next].id)
            }
            _ => None,
        }
    }
}

fn record_row(record: &ActionRecord, index: usize, action_width: usize) -> Row<'static> {
    let tokens = record.tokens();
    let action = if tokens.text().chars().count() > action_width {
        Line::from(Span::raw(truncate(record.type_name(), action_width)))
    } else {
        tokens.to_line()
    };

    let base = if index % 2 == 1 {
        Style::default().bg(InspectorStyle::bg_surface())
    } else {
        Style::default().bg(InspectorStyle::bg_panel())
    };

    Row::new(vec![
        Cell::from(record.time.clone())
            .style(Style::default().fg(InspectorStyle::text_secondary())),
        Cell::from(action),
        Cell::from(Line::from(record.took.clone()).right_aligned())
            .style(Style::default().fg(InspectorStyle::accent_amber())),
    ])
    .style(base)
}

impl<A> Component<A> for RecordTable {
    type Props<'a> = RecordTableProps<'a, A>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = A> {
        self.mouse_selection(event, props.records, props.selected_id)
            .map(props.on_select)
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let style = InspectorStyle::default();
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if props.is_focused {
                style.focused_border
            } else {
                style.border
            })
            .title(format!(" Actions ({}) ", props.records.len()))
            .title_style(style.label_style);

        let viewport_height = area.height.saturating_sub(CHROME_ROWS) as usize;
        let inner = block.inner(area);
        self.body_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };

        if props.records.is_empty() {
            self.scroll_offset = 0;
            frame.render_widget(
                Paragraph::new(props.empty_message)
                    .style(style.label_style)
                    .centered()
                    .block(block),
                area,
            );
            return;
        }

        let selected = Self::selected_index(props.records, props.selected_id);
        if props.follow_tail {
            self.scroll_offset = props.records.len().saturating_sub(viewport_height);
        } else if let Some(index) = selected {
            self.ensure_visible(index, viewport_height);
        }
        let max_offset = props.records.len().saturating_sub(viewport_height.max(1));
        self.scroll_offset = self.scroll_offset.min(max_offset);

        let action_width = inner
            .width
            .saturating_sub(TIME_WIDTH + DURATION_WIDTH + 2 + HIGHLIGHT_SYMBOL.chars().count() as u16)
            as usize;
        let rows: Vec<Row> = props
            .records
            .iter()
            .enumerate()
            .map(|(i, record)| record_row(record, i, action_width))
            .collect();

        let header = Row::new(vec![
            Cell::from("Time"),
            Cell::from("Action"),
            Cell::from(Line::from("Duration").right_aligned()),
        ])
        .style(
            Style::default()
                .fg(InspectorStyle::accent_teal())
                .add_modifier(Modifier::BOLD),
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(TIME_WIDTH),
                Constraint::Min(8),
                Constraint::Length(DURATION_WIDTH),
            ],
        )
        .header(header)
        .block(block)
        .column_spacing(1)
        .row_highlight_style(
            Style::default()
                .bg(InspectorStyle::bg_highlight())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(HIGHLIGHT_SYMBOL)
        .highlight_spacing(HighlightSpacing::Always);

        // a selection outside the viewport would make the table scroll back to it
        let visible = self.scroll_offset..self.scroll_offset + viewport_height.max(1);
        let highlighted = selected.filter(|i| visible.contains(i));
        let mut state = TableState::default()
            .with_selected(highlighted)
            .with_offset(self.scroll_offset);
        frame.render_stateful_widget(table, area, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_lens_core::testing::{sample_record, RenderHarness};
    use crossterm::event::{KeyModifiers, MouseEvent};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Select(i64),
    }

    fn records(n: i64) -> Vec<ActionRecord> {
        (1..=n)
            .map(|id| sample_record(id, &format!("todos/add/{id}")))
            .collect()
    }

    fn props<'a>(
        rows: &'a [&'a ActionRecord],
        selected_id: Option<i64>,
    ) -> RecordTableProps<'a, TestAction> {
        RecordTableProps {
            records: rows,
            selected_id,
            is_focused: true,
            follow_tail: false,
            empty_message: "No actions yet",
            on_select: TestAction::Select,
        }
    }

    #[test]
    fn test_render_columns() {
        let all = records(2);
        let rows: Vec<&ActionRecord> = all.iter().collect();
        let mut render = RenderHarness::new(60, 8);
        let mut table = RecordTable::new();

        let output = render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, Some(2)));
        });

        assert!(output.contains("Actions (2)"));
        assert!(output.contains("Time"));
        assert!(output.contains("Duration"));
        assert!(output.contains("todos / add / 1"));
        assert!(output.contains("0.10ms"));
    }

    #[test]
    fn test_render_empty_message() {
        let rows: Vec<&ActionRecord> = Vec::new();
        let mut render = RenderHarness::new(40, 6);
        let mut table = RecordTable::new();

        let output = render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, None));
        });

        assert!(output.contains("No actions yet"));
    }

    #[test]
    fn test_follow_tail_scrolls_to_newest() {
        let all = records(20);
        let rows: Vec<&ActionRecord> = all.iter().collect();
        let mut render = RenderHarness::new(60, 8);
        let mut table = RecordTable::new();

        let output = render.render_to_string_plain(|frame| {
            let props = RecordTableProps {
                follow_tail: true,
                ..props(&rows, Some(1))
            };
            table.render(frame, frame.area(), props);
        });

        assert_eq!(table.scroll_offset(), 15);
        assert!(output.contains("todos / add / 20"));
    }

    #[test]
    fn test_selection_stays_visible() {
        let all = records(20);
        let rows: Vec<&ActionRecord> = all.iter().collect();
        let mut render = RenderHarness::new(60, 8);
        let mut table = RecordTable::new();

        render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, Some(3)));
        });
        assert_eq!(table.scroll_offset(), 0);

        render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, Some(12)));
        });
        assert_eq!(table.scroll_offset(), 7);
    }

    #[test]
    fn test_click_selects_row() {
        let all = records(3);
        let rows: Vec<&ActionRecord> = all.iter().collect();
        let mut render = RenderHarness::new(60, 8);
        let mut table = RecordTable::new();
        render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, None));
        });

        // border, header, then rows from y = 2
        let click = EventKind::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 5,
            row: 3,
            modifiers: KeyModifiers::NONE,
        });
        let actions: Vec<_> = table
            .handle_event(&click, props(&rows, None))
            .into_iter()
            .collect();
        assert_eq!(actions, vec![TestAction::Select(2)]);
    }

    #[test]
    fn test_scroll_moves_selection() {
        let all = records(3);
        let rows: Vec<&ActionRecord> = all.iter().collect();
        let mut render = RenderHarness::new(60, 8);
        let mut table = RecordTable::new();
        render.render_to_string_plain(|frame| {
            table.render(frame, frame.area(), props(&rows, Some(1)));
        });

        let down = EventKind::Scroll {
            column: 5,
            row: 3,
            delta: 1,
        };
        let actions: Vec<_> = table
            .handle_event(&down, props(&rows, Some(1)))
            .into_iter()
            .collect();
        assert_eq!(actions, vec![TestAction::Select(2)]);

        let actions: Vec<_> = table
            .handle_event(&down, props(&rows, Some(3)))
            .into_iter()
            .collect();
        assert!(actions.is_empty());
    }
}
