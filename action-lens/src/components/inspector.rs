//! The inspector screen: layout, rendering and event routing
//!
//! ```text
//! ┌ Search ─────────────────────┐┌ Action ───────────┐
//! ├ Actions (n) ────────────────┤├ Filter ───────────┤
//! │ Time   Action      Duration ││ State  Diff|Tree  │
//! │ ...                         ││ ...               │
//! └─────────────────────────────┘└───────────────────┘
//!  action-lens  keys...                      ● peer
//! ```
//!
//! Keys go through [`Keybindings`] for the focused context. Contexts that
//! hold a text input only take global commands that carry a modifier, so
//! typing `q` into the search bar does not quit.

use action_lens_components::{RecordTable, RecordTableProps, TextInput, TextInputProps};
use action_lens_core::inspect::InspectorStyle;
use action_lens_core::{
    format_key_for_display, EventKind, EventOutcome, InspectorContext, Keybindings, Notice,
    NoticeLevel, PanelFlags,
};
use crossterm::event::{KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use super::{
    Component, DispatchBox, DispatchBoxProps, HelpBar, HelpBarProps, Sidebar, SidebarProps,
};
use crate::action::Action;
use crate::state::AppState;

/// Sidebar width as a share of the screen
const SIDEBAR_PERCENT: u16 = 42;

#[derive(Debug, Clone, Copy, Default)]
struct Areas {
    search: Rect,
    table: Rect,
    sidebar: Rect,
}

pub struct Inspector {
    keybindings: Keybindings<InspectorContext>,
    /// Shown in the help bar while no host is connected
    idle_label: String,
    table: RecordTable,
    search: TextInput,
    sidebar: Sidebar,
    dispatch: DispatchBox,
    areas: Areas,
    last_focus: InspectorContext,
}

impl Inspector {
    pub fn new(keybindings: Keybindings<InspectorContext>, idle_label: impl Into<String>) -> Self {
        Self {
            keybindings,
            idle_label: idle_label.into(),
            table: RecordTable::new(),
            search: TextInput::new(),
            sidebar: Sidebar::new(),
            dispatch: DispatchBox::new(),
            areas: Areas::default(),
            last_focus: InspectorContext::Table,
        }
    }

    pub fn keybindings(&self) -> &Keybindings<InspectorContext> {
        &self.keybindings
    }

    fn search_props<'a>(query: &'a str, is_focused: bool) -> TextInputProps<'a, Action> {
        TextInputProps {
            value: query,
            placeholder: "Search time, action or duration...",
            is_focused,
            title: Some("Search"),
            show_border: true,
            bg_color: None,
            padding_x: 1,
            on_change: Action::SearchQueryChange,
            on_submit: |_| Action::FocusSet(InspectorContext::Table),
        }
    }

    fn sidebar_props<'a>(state: &'a AppState) -> SidebarProps<'a> {
        SidebarProps {
            record: state.selected(),
            state_filter: &state.state_filter,
            active_tab: state.active_tab,
            show_tabs: state.panels.contains(PanelFlags::STATE_TABS),
            scroll: state.sidebar_scroll,
            is_focused: state.focus == InspectorContext::Sidebar,
            filter_focused: state.focus == InspectorContext::StateFilter,
        }
    }

    fn dispatch_props<'a>(state: &'a AppState, send_hint: &'a str) -> DispatchBoxProps<'a> {
        DispatchBoxProps {
            action_type: &state.dispatch_type,
            payload: &state.dispatch_payload,
            field: state.dispatch_field,
            is_connected: state.is_connected(),
            send_hint,
        }
    }

    fn send_hint(&self) -> String {
        self.keybindings
            .get_first_keybinding("dispatch.send", InspectorContext::Dispatch)
            .map(|key| format_key_for_display(&key))
            .unwrap_or_default()
    }

    /// Cursor placement when a text input gains focus
    fn sync_focus(&mut self, state: &AppState) {
        if state.focus == self.last_focus {
            return;
        }
        match state.focus {
            InspectorContext::Search => self.search.move_to_end(&state.search_query),
            InspectorContext::StateFilter => self.sidebar.focus_filter(&state.state_filter),
            InspectorContext::Dispatch => {
                self.dispatch
                    .open(&state.dispatch_type, &state.dispatch_payload)
            }
            InspectorContext::Table | InspectorContext::Sidebar => {}
        }
        self.last_focus = state.focus;
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        self.sync_focus(state);
        let style = InspectorStyle::default();
        frame.render_widget(Block::default().style(style.banner_bg), area);

        let [main, help] =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
        let [left, right] = Layout::horizontal([
            Constraint::Percentage(100 - SIDEBAR_PERCENT),
            Constraint::Percentage(SIDEBAR_PERCENT),
        ])
        .areas(main);

        let (search_area, table_area) = if state.panels.contains(PanelFlags::SEARCH_BAR) {
            let [search, table] =
                Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(left);
            (search, table)
        } else {
            (Rect::default(), left)
        };
        self.areas = Areas {
            search: search_area,
            table: table_area,
            sidebar: right,
        };

        if !search_area.is_empty() {
            self.search.render(
                frame,
                search_area,
                Self::search_props(&state.search_query, state.focus == InspectorContext::Search),
            );
        }

        let visible = state.visible_records();
        let empty_message = if state.records.is_empty() {
            "Waiting for actions..."
        } else {
            "No actions match the search"
        };
        self.table.render(
            frame,
            table_area,
            RecordTableProps {
                records: &visible,
                selected_id: state.selected_id,
                is_focused: state.focus == InspectorContext::Table,
                follow_tail: state.follow_tail(),
                empty_message,
                on_select: Action::TableSelect,
            },
        );

        self.sidebar.render(frame, right, Self::sidebar_props(state));

        HelpBar.render(
            frame,
            help,
            HelpBarProps {
                focus: state.focus,
                keybindings: &self.keybindings,
                panels: state.panels,
                host: state.host.as_deref(),
                idle_label: &self.idle_label,
                following: state.follow_tail(),
            },
        );

        if state.focus == InspectorContext::Dispatch {
            let hint = self.send_hint();
            let props = Self::dispatch_props(state, &hint);
            self.dispatch.render(frame, area, props);
        }

        render_notices(frame, main, state.notices.iter());
    }

    pub fn map_event(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        self.sync_focus(state);
        match event {
            EventKind::Resize(_, _) => EventOutcome::needs_render(),
            EventKind::Key(key) => {
                let context = state.focus;
                if context.captures_text() {
                    let command = self
                        .keybindings
                        .get_context_command(*key, context)
                        .or_else(|| {
                            key.modifiers
                                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                                .then(|| self.keybindings.get_global_command(*key))
                                .flatten()
                        });
                    if let Some(command) = command {
                        return self.command(&command, state).into();
                    }
                    return self.text_input(event, state);
                }

                match self.keybindings.get_command(*key, context) {
                    Some(command) => self.command(&command, state).into(),
                    None => EventOutcome::ignored(),
                }
            }
            EventKind::Mouse(mouse) if state.focus != InspectorContext::Dispatch => {
                if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
                    return EventOutcome::ignored();
                }
                let (column, row) = (mouse.column, mouse.row);
                if contains(self.areas.table, column, row) {
                    let mut actions = vec![Action::FocusSet(InspectorContext::Table)];
                    actions.extend(self.table_event(event, state));
                    return EventOutcome::from_actions(actions);
                }
                if contains(self.areas.search, column, row) {
                    return Action::FocusSet(InspectorContext::Search).into();
                }
                if contains(self.areas.sidebar, column, row) {
                    return Action::FocusSet(InspectorContext::Sidebar).into();
                }
                EventOutcome::ignored()
            }
            EventKind::Scroll { column, row, .. } if state.focus != InspectorContext::Dispatch => {
                if contains(self.areas.table, *column, *row) {
                    return EventOutcome::from_actions(self.table_event(event, state));
                }
                EventOutcome::from_actions(
                    self.sidebar.handle_event(event, Self::sidebar_props(state)),
                )
            }
            _ => EventOutcome::ignored(),
        }
    }

    fn table_event(&mut self, event: &EventKind, state: &AppState) -> Vec<Action> {
        let visible = state.visible_records();
        self.table
            .handle_event(
                event,
                RecordTableProps {
                    records: &visible,
                    selected_id: state.selected_id,
                    is_focused: state.focus == InspectorContext::Table,
                    follow_tail: state.follow_tail(),
                    empty_message: "",
                    on_select: Action::TableSelect,
                },
            )
            .into_iter()
            .collect()
    }

    fn text_input(&mut self, event: &EventKind, state: &AppState) -> EventOutcome<Action> {
        match state.focus {
            InspectorContext::Search => EventOutcome::from_actions(
                self.search
                    .handle_event(event, Self::search_props(&state.search_query, true)),
            ),
            InspectorContext::StateFilter => EventOutcome::from_actions(
                self.sidebar.handle_event(event, Self::sidebar_props(state)),
            ),
            InspectorContext::Dispatch => {
                let hint = self.send_hint();
                let props = Self::dispatch_props(state, &hint);
                EventOutcome::from_actions(self.dispatch.handle_event(event, props))
            }
            InspectorContext::Table | InspectorContext::Sidebar => EventOutcome::ignored(),
        }
    }

    /// Action for a keybinding command
    fn command(&self, command: &str, state: &AppState) -> Option<Action> {
        let action = match command {
            "quit" => Action::Quit,
            "focus.next" => Action::FocusNext,
            "focus.prev" => Action::FocusPrev,
            "copy" => Action::CopySelected,
            "clear" => Action::TableClear,
            "dispatch.open" => Action::FocusSet(InspectorContext::Dispatch),

            "table.next" => Action::TableNext,
            "table.prev" => Action::TablePrev,
            "table.top" => Action::TableTop,
            "table.bottom" => Action::TableBottom,
            "table.follow" => Action::TableFollowToggle,

            "search.open" => Action::FocusSet(InspectorContext::Search),
            "search.close" => Action::FocusSet(InspectorContext::Table),
            "search.clear" => Action::SearchQueryChange(String::new()),

            "sidebar.down" => Action::SidebarScroll(1),
            "sidebar.up" => Action::SidebarScroll(-1),
            "sidebar.tab" => Action::StateTabToggle,
            "filter.open" => Action::FocusSet(InspectorContext::StateFilter),
            "filter.close" => Action::FocusSet(InspectorContext::Sidebar),
            "filter.clear" => Action::StateFilterChange(String::new()),

            "dispatch.send" => Action::DispatchSubmit,
            "dispatch.field" => Action::DispatchFieldToggle,
            "dispatch.close" => Action::FocusSet(state.dispatch_return),

            unknown => {
                tracing::debug!(command = unknown, "Unbound command");
                return None;
            }
        };
        Some(action)
    }
}

fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// Stack notices in the top-right corner, newest last
fn render_notices<'a>(frame: &mut Frame, area: Rect, notices: impl Iterator<Item = &'a Notice>) {
    let style = InspectorStyle::default();
    for (index, notice) in notices.enumerate() {
        let text = format!(" {} ", notice.message);
        let width = (text.chars().count() as u16).min(area.width);
        let y = area.y + 1 + index as u16;
        if y >= area.y + area.height {
            break;
        }
        let rect = Rect::new(area.x + area.width - width, y, width, 1);
        let notice_style = match notice.level {
            NoticeLevel::Success => style.notice_success,
            NoticeLevel::Error => style.notice_error,
        };
        frame.render_widget(Clear, rect);
        frame.render_widget(Paragraph::new(Line::from(text)).style(notice_style), rect);
    }
}
