//! Detail sidebar for the selected record
//!
//! Top: the Action panel (`{type, payload}` tree, root expanded).
//! Below: the state key filter and the State panel with the Diff and State
//! Tree tabs. Without tabs only the state tree of `after` is shown.

use action_lens_components::{TextInput, TextInputProps};
use action_lens_core::inspect::tree::DEFAULT_EXPAND_DEPTH;
use action_lens_core::inspect::{
    diff_rows, filter_snapshots, snapshot_rows, value_rows, DiffWidget, InspectorStyle,
    ValueTreeWidget,
};
use action_lens_core::{ActionRecord, EventKind, InspectorContext};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::state::StateTab;

/// Action panel never takes more than this share of the sidebar
const ACTION_PANEL_PERCENT: usize = 40;

pub struct SidebarProps<'a> {
    pub record: Option<&'a ActionRecord>,
    pub state_filter: &'a str,
    pub active_tab: StateTab,
    pub show_tabs: bool,
    pub scroll: usize,
    pub is_focused: bool,
    pub filter_focused: bool,
}

#[derive(Default)]
pub struct Sidebar {
    filter: TextInput,
    area: Rect,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when the filter gains focus
    pub fn focus_filter(&mut self, value: &str) {
        self.filter.move_to_end(value);
    }

    fn filter_props<'a>(value: &'a str, is_focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value,
            placeholder: "Filter state keys...",
            is_focused,
            title: Some("Filter"),
            show_border: true,
            bg_color: None,
            padding_x: 1,
            on_change: Action::StateFilterChange,
            on_submit: |_| Action::FocusSet(InspectorContext::Sidebar),
        }
    }

    fn contains(&self, column: u16, row: u16) -> bool {
        let area = self.area;
        column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height
    }

    fn render_action_panel(
        frame: &mut Frame,
        area: Rect,
        record: &ActionRecord,
        style: &InspectorStyle,
    ) {
        let rows = value_rows(&record.payload_view(), DEFAULT_EXPAND_DEPTH);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(style.border)
            .title(" Action ")
            .title_style(style.label_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(ValueTreeWidget::new(&rows), inner);
    }

    fn render_state_panel(
        frame: &mut Frame,
        area: Rect,
        record: &ActionRecord,
        props: &SidebarProps<'_>,
        style: &InspectorStyle,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if props.is_focused {
                style.focused_border
            } else {
                style.border
            })
            .title(" State ")
            .title_style(style.label_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let filtered = filter_snapshots(Some(props.state_filter), &record.before, &record.after);

        let (tab, body) = if props.show_tabs {
            let [header, body] =
                Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
            let selected = match props.active_tab {
                StateTab::Diff => 0,
                StateTab::StateTree => 1,
            };
            let tabs = Tabs::new([StateTab::Diff.label(), StateTab::StateTree.label()])
                .select(selected)
                .style(style.label_style)
                .highlight_style(
                    Style::default()
                        .fg(InspectorStyle::accent_teal())
                        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                );
            frame.render_widget(tabs, header);
            (props.active_tab, body)
        } else {
            (StateTab::StateTree, inner)
        };

        match tab {
            StateTab::Diff => {
                let rows = diff_rows(&filtered.before, &filtered.after);
                frame.render_widget(
                    DiffWidget::new(&rows)
                        .styles(style.diff.clone())
                        .scroll_offset(props.scroll),
                    body,
                );
            }
            StateTab::StateTree => {
                let rows = snapshot_rows(&filtered.after, DEFAULT_EXPAND_DEPTH);
                frame.render_widget(ValueTreeWidget::new(&rows).scroll_offset(props.scroll), body);
            }
        }
    }
}

impl Component<Action> for Sidebar {
    type Props<'a> = SidebarProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        match event {
            EventKind::Scroll { column, row, delta } if self.contains(*column, *row) => {
                vec![Action::SidebarScroll(*delta)]
            }
            EventKind::Key(_) if props.filter_focused => self
                .filter
                .handle_event(event, Self::filter_props(props.state_filter, true))
                .into_iter()
                .collect(),
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.area = area;
        let style = InspectorStyle::default();

        let Some(record) = props.record else {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(style.border)
                .title(" Details ")
                .title_style(style.label_style);
            frame.render_widget(
                Paragraph::new("Select an action to inspect it")
                    .style(style.label_style)
                    .centered()
                    .block(block),
                area,
            );
            return;
        };

        let action_rows = value_rows(&record.payload_view(), DEFAULT_EXPAND_DEPTH).len();
        let max_height = (area.height as usize * ACTION_PANEL_PERCENT / 100) as u16;
        let action_height = u16::try_from(action_rows + 2)
            .unwrap_or(u16::MAX)
            .min(max_height)
            .max(3);
        let [action_area, filter_area, state_area] = Layout::vertical([
            Constraint::Length(action_height),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .areas(area);

        Self::render_action_panel(frame, action_area, record, &style);
        self.filter.render(
            frame,
            filter_area,
            Self::filter_props(props.state_filter, props.filter_focused),
        );
        Self::render_state_panel(frame, state_area, record, &props, &style);
    }
}
