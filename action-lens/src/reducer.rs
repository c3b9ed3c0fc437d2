//! Reducer: `(state, action) -> DispatchResult<Effect>`
//!
//! All state transitions happen here. Work that leaves the process (sending
//! to the host, the clipboard, the session file) is returned as an [`Effect`].

use std::time::Instant;

use action_lens_core::compose::{compose_dispatch, dispatch_failed, DISPATCHED};
use action_lens_core::inspect::{diff_rows, filter_snapshots, snapshot_rows};
use action_lens_core::inspect::tree::DEFAULT_EXPAND_DEPTH;
use action_lens_core::{DispatchResult, InspectorContext, Notice, PanelFlags};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, StateTab};

pub const COPIED: &str = "Copied to clipboard";

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Host =====
        Action::HostDidConnect(peer) => {
            state.host = Some(peer);
            DispatchResult::changed()
        }

        Action::HostDidDisconnect => {
            let changed = state.host.take().is_some();
            changed.into()
        }

        Action::RecordDispatched(record) => {
            // lifecycle pings without an action are not shown
            if record.action.is_none() {
                return DispatchResult::unchanged();
            }
            state.records.push(*record);
            persist(state)
        }

        Action::RecordInit(record) => {
            state.selected_id = Some(record.id);
            state.records = vec![*record];
            state.follow = state.panels.contains(PanelFlags::AUTO_SCROLL);
            state.sidebar_scroll = 0;
            persist(state)
        }

        // ===== Table =====
        Action::TableSelect(id) => {
            if state.selected_id == Some(id) {
                return DispatchResult::unchanged();
            }
            state.follow = false;
            select(state, Some(id))
        }

        Action::TableNext | Action::TablePrev | Action::TableTop | Action::TableBottom => {
            let target = {
                let visible = state.visible_records();
                let last = match visible.len().checked_sub(1) {
                    Some(last) => last,
                    None => return DispatchResult::unchanged(),
                };
                let current = state
                    .selected_id
                    .and_then(|id| visible.iter().position(|r| r.id == id));
                let index = match (&action, current) {
                    (Action::TableNext, Some(i)) => (i + 1).min(last),
                    (Action::TableNext, None) => 0,
                    (Action::TablePrev, Some(i)) => i.saturating_sub(1),
                    (Action::TablePrev, None) => last,
                    (Action::TableTop, _) => 0,
                    _ => last,
                };
                visible[index].id
            };

            let follow = matches!(action, Action::TableBottom)
                && state.panels.contains(PanelFlags::AUTO_SCROLL);
            let follow_changed = state.follow != follow;
            state.follow = follow;
            if state.selected_id == Some(target) {
                return follow_changed.into();
            }
            select(state, Some(target))
        }

        Action::TableClear => {
            if state.records.is_empty() && state.selected_id.is_none() {
                return DispatchResult::unchanged();
            }
            state.records.clear();
            state.selected_id = None;
            state.sidebar_scroll = 0;
            state.follow = state.panels.contains(PanelFlags::AUTO_SCROLL);
            persist(state)
        }

        Action::TableFollowToggle => {
            if !state.panels.contains(PanelFlags::AUTO_SCROLL) {
                return DispatchResult::unchanged();
            }
            state.follow = !state.follow;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            if state.search_query == query {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            DispatchResult::changed()
        }

        // ===== Sidebar =====
        Action::SidebarScroll(delta) => {
            let max = state_rows(state).saturating_sub(1);
            let next = state.sidebar_scroll.saturating_add_signed(delta).min(max);
            if next == state.sidebar_scroll {
                return DispatchResult::unchanged();
            }
            state.sidebar_scroll = next;
            DispatchResult::changed()
        }

        Action::StateFilterChange(filter) => {
            if state.state_filter == filter {
                return DispatchResult::unchanged();
            }
            state.state_filter = filter;
            state.sidebar_scroll = 0;
            DispatchResult::changed()
        }

        Action::StateTabToggle => {
            if !state.panels.contains(PanelFlags::STATE_TABS) {
                return DispatchResult::unchanged();
            }
            state.active_tab = state.active_tab.toggle();
            state.sidebar_scroll = 0;
            DispatchResult::changed()
        }

        // ===== Dispatch box =====
        Action::DispatchTypeChange(text) => {
            state.dispatch_type = text;
            DispatchResult::changed()
        }

        Action::DispatchPayloadChange(text) => {
            state.dispatch_payload = text;
            DispatchResult::changed()
        }

        Action::DispatchFieldToggle => {
            state.dispatch_field = state.dispatch_field.toggle();
            DispatchResult::changed()
        }

        Action::DispatchSubmit => {
            if !state.dispatch_enabled() {
                return DispatchResult::unchanged();
            }
            if !state.is_connected() {
                tracing::debug!("Dispatch ignored, no host connected");
                return DispatchResult::unchanged();
            }
            let composed = compose_dispatch(&state.dispatch_type, &state.dispatch_payload);
            let changed = composed.notice.is_some();
            if let Some(notice) = composed.notice {
                state.notices.push(notice);
            }
            DispatchResult::from(changed).with(Effect::SendDispatch(composed.action))
        }

        Action::DispatchDidSucceed => {
            state.notices.push(Notice::success(DISPATCHED));
            DispatchResult::changed()
        }

        Action::DispatchDidFail(error) => {
            state.notices.push(Notice::error(dispatch_failed(&error)));
            DispatchResult::changed()
        }

        // ===== Focus =====
        Action::FocusSet(context) => focus(state, context),

        Action::FocusNext | Action::FocusPrev => {
            let next = match state.focus {
                InspectorContext::Table | InspectorContext::Search => InspectorContext::Sidebar,
                InspectorContext::Sidebar | InspectorContext::StateFilter => {
                    InspectorContext::Table
                }
                // the dispatch box binds tab to its own fields
                InspectorContext::Dispatch => return DispatchResult::unchanged(),
            };
            focus(state, next)
        }

        // ===== Clipboard =====
        Action::CopySelected => {
            let Some(record) = state.selected() else {
                return DispatchResult::unchanged();
            };
            match serde_json::to_string_pretty(record) {
                Ok(text) => DispatchResult::effect(Effect::CopyToClipboard(text)),
                Err(err) => {
                    state.notices.push(Notice::error(format!("Copy failed: {err}")));
                    DispatchResult::changed()
                }
            }
        }

        Action::CopyDidSucceed => {
            state.notices.push(Notice::success(COPIED));
            DispatchResult::changed()
        }

        Action::CopyDidFail(error) => {
            state.notices.push(Notice::error(format!("Copy failed: {error}")));
            DispatchResult::changed()
        }

        // ===== Session =====
        Action::SessionFlush => {
            if !state.session_dirty {
                return DispatchResult::unchanged();
            }
            state.session_dirty = false;
            DispatchResult::effect(Effect::PersistSession(state.session_snapshot()))
        }

        Action::SessionDidSave => DispatchResult::unchanged(),

        Action::SessionDidFail(error) => {
            state
                .notices
                .push(Notice::error(format!("Session not saved: {error}")));
            DispatchResult::changed()
        }

        // ===== Global =====
        Action::Tick => state.notices.expire(Instant::now()).into(),

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn select(state: &mut AppState, id: Option<i64>) -> DispatchResult<Effect> {
    state.selected_id = id;
    state.sidebar_scroll = 0;
    persist(state)
}

fn focus(state: &mut AppState, context: InspectorContext) -> DispatchResult<Effect> {
    let allowed = match context {
        InspectorContext::Dispatch => state.dispatch_enabled(),
        InspectorContext::Search => state.panels.contains(PanelFlags::SEARCH_BAR),
        _ => true,
    };
    if !allowed || state.focus == context {
        return DispatchResult::unchanged();
    }
    if context == InspectorContext::Dispatch {
        state.dispatch_return = state.focus;
    }
    state.focus = context;
    DispatchResult::changed()
}

/// Mark records or selection as changed; saved on the next flush
fn persist(state: &mut AppState) -> DispatchResult<Effect> {
    if state.persist {
        state.session_dirty = true;
    }
    DispatchResult::changed()
}

/// Rows in the State panel for the selected record, as the sidebar lays them out
pub fn state_rows(state: &AppState) -> usize {
    let Some(record) = state.selected() else {
        return 0;
    };
    let filtered = filter_snapshots(Some(&state.state_filter), &record.before, &record.after);
    let tab = if state.panels.contains(PanelFlags::STATE_TABS) {
        state.active_tab
    } else {
        StateTab::StateTree
    };
    match tab {
        StateTab::Diff => diff_rows(&filtered.before, &filtered.after).len(),
        StateTab::StateTree => snapshot_rows(&filtered.after, DEFAULT_EXPAND_DEPTH).len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use action_lens_core::compose::INVALID_PAYLOAD;
    use action_lens_core::testing::sample_record;
    use action_lens_core::{ActionRecord, DispatchedAction, NoticeLevel};
    use serde_json::json;

    fn record(id: i64, action_type: &str) -> Box<ActionRecord> {
        Box::new(sample_record(id, action_type))
    }

    fn with_records(n: i64) -> AppState {
        let mut state = AppState::default();
        for id in 1..=n {
            reducer(&mut state, Action::RecordDispatched(record(id, "todos/add")));
        }
        state
    }

    fn connected() -> AppState {
        let mut state = AppState::default();
        reducer(&mut state, Action::HostDidConnect("127.0.0.1:5000".into()));
        state
    }

    fn last_notice(state: &AppState) -> (NoticeLevel, String) {
        let notice = state.notices.iter().last().expect("notice");
        (notice.level, notice.message.clone())
    }

    #[test]
    fn test_record_dispatched_appends() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::RecordDispatched(record(1, "a/b")));
        assert!(result.changed);
        assert!(result.effects.is_empty());
        reducer(&mut state, Action::RecordDispatched(record(2, "c")));

        let ids: Vec<i64> = state.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_record_without_action_is_dropped() {
        let mut state = AppState::default();
        let mut bare = sample_record(1, "x");
        bare.action = None;

        let result = reducer(&mut state, Action::RecordDispatched(Box::new(bare)));
        assert!(!result.changed);
        assert!(state.records.is_empty());
    }

    #[test]
    fn test_record_init_replaces_and_selects() {
        let mut state = with_records(3);
        state.follow = false;

        reducer(&mut state, Action::RecordInit(record(10, "@@INIT")));
        assert_eq!(state.records.len(), 1);
        assert_eq!(state.selected_id, Some(10));
        assert!(state.follow);
    }

    #[test]
    fn test_select_stops_following() {
        let mut state = with_records(3);
        assert!(state.follow_tail());

        let result = reducer(&mut state, Action::TableSelect(2));
        assert!(result.changed);
        assert_eq!(state.selected_id, Some(2));
        assert!(!state.follow_tail());

        assert!(!reducer(&mut state, Action::TableSelect(2)).changed);
    }

    #[test]
    fn test_navigation_over_visible_records() {
        let mut state = AppState::default();
        for (id, t) in [(1, "todos/add"), (2, "user/login"), (3, "todos/remove")] {
            reducer(&mut state, Action::RecordDispatched(record(id, t)));
        }
        reducer(&mut state, Action::SearchQueryChange("todos".into()));

        reducer(&mut state, Action::TableNext);
        assert_eq!(state.selected_id, Some(1));
        reducer(&mut state, Action::TableNext);
        assert_eq!(state.selected_id, Some(3));
        reducer(&mut state, Action::TableNext);
        assert_eq!(state.selected_id, Some(3));
        reducer(&mut state, Action::TablePrev);
        assert_eq!(state.selected_id, Some(1));
        reducer(&mut state, Action::TableBottom);
        assert_eq!(state.selected_id, Some(3));
        assert!(state.follow);
        reducer(&mut state, Action::TableTop);
        assert_eq!(state.selected_id, Some(1));
        assert!(!state.follow);
    }

    #[test]
    fn test_navigation_on_empty_table() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::TableNext).changed);
        assert_eq!(state.selected_id, None);
    }

    #[test]
    fn test_clear() {
        let mut state = with_records(2);
        reducer(&mut state, Action::TableSelect(1));

        assert!(reducer(&mut state, Action::TableClear).changed);
        assert!(state.records.is_empty());
        assert_eq!(state.selected_id, None);
        assert!(state.follow);
        assert!(!reducer(&mut state, Action::TableClear).changed);
    }

    #[test]
    fn test_follow_toggle() {
        let mut state = with_records(1);
        reducer(&mut state, Action::TableFollowToggle);
        assert!(!state.follow);
        reducer(&mut state, Action::TableFollowToggle);
        assert!(state.follow);

        state.panels.remove(PanelFlags::AUTO_SCROLL);
        assert!(!reducer(&mut state, Action::TableFollowToggle).changed);
    }

    #[test]
    fn test_dispatch_requires_connection() {
        let mut state = AppState::default();
        state.dispatch_type = "todos/add".into();

        let result = reducer(&mut state, Action::DispatchSubmit);
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(state.notices.is_empty());
    }

    #[test]
    fn test_dispatch_requires_panel() {
        let mut state = connected();
        state.panels.remove(PanelFlags::DISPATCH_BOX);
        assert!(reducer(&mut state, Action::DispatchSubmit).effects.is_empty());
    }

    #[test]
    fn test_dispatch_sends_parsed_payload() {
        let mut state = connected();
        reducer(&mut state, Action::DispatchTypeChange("todos/add".into()));
        reducer(&mut state, Action::DispatchPayloadChange(r#"{"text":"milk"}"#.into()));

        let result = reducer(&mut state, Action::DispatchSubmit);
        assert_eq!(
            result.effects,
            vec![Effect::SendDispatch(DispatchedAction::new(
                "todos/add",
                json!({"text": "milk"})
            ))]
        );
        assert!(state.notices.is_empty());
    }

    #[test]
    fn test_dispatch_blank_payload() {
        let mut state = connected();
        state.dispatch_type = "todos/clear".into();

        let result = reducer(&mut state, Action::DispatchSubmit);
        assert_eq!(
            result.effects,
            vec![Effect::SendDispatch(DispatchedAction::new("todos/clear", json!([])))]
        );
    }

    #[test]
    fn test_dispatch_invalid_json_sends_raw_text() {
        let mut state = connected();
        state.dispatch_type = "todos/add".into();
        state.dispatch_payload = "milk".into();

        let result = reducer(&mut state, Action::DispatchSubmit);
        assert!(result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::SendDispatch(DispatchedAction::new("todos/add", json!("milk")))]
        );
        assert_eq!(
            last_notice(&state),
            (NoticeLevel::Error, INVALID_PAYLOAD.to_string())
        );
    }

    #[test]
    fn test_dispatch_result_notices() {
        let mut state = connected();
        reducer(&mut state, Action::DispatchDidSucceed);
        assert_eq!(
            last_notice(&state),
            (NoticeLevel::Success, "The action is dispatched".to_string())
        );

        reducer(&mut state, Action::DispatchDidFail("broken pipe".into()));
        assert_eq!(
            last_notice(&state),
            (
                NoticeLevel::Error,
                "Failed to get response from client broken pipe".to_string()
            )
        );
    }

    #[test]
    fn test_disconnect() {
        let mut state = connected();
        assert!(state.is_connected());
        assert!(reducer(&mut state, Action::HostDidDisconnect).changed);
        assert!(!state.is_connected());
        assert!(!reducer(&mut state, Action::HostDidDisconnect).changed);
    }

    #[test]
    fn test_focus_cycle_and_dispatch_return() {
        let mut state = AppState::default();
        reducer(&mut state, Action::FocusNext);
        assert_eq!(state.focus, InspectorContext::Sidebar);
        reducer(&mut state, Action::FocusPrev);
        assert_eq!(state.focus, InspectorContext::Table);

        reducer(&mut state, Action::FocusSet(InspectorContext::Sidebar));
        reducer(&mut state, Action::FocusSet(InspectorContext::Dispatch));
        assert_eq!(state.focus, InspectorContext::Dispatch);
        assert_eq!(state.dispatch_return, InspectorContext::Sidebar);
        assert!(!reducer(&mut state, Action::FocusNext).changed);
    }

    #[test]
    fn test_focus_respects_panels() {
        let mut state = AppState::default();
        state.panels.remove(PanelFlags::DISPATCH_BOX | PanelFlags::SEARCH_BAR);
        assert!(!reducer(&mut state, Action::FocusSet(InspectorContext::Dispatch)).changed);
        assert!(!reducer(&mut state, Action::FocusSet(InspectorContext::Search)).changed);
        assert_eq!(state.focus, InspectorContext::Table);
    }

    #[test]
    fn test_state_tab_toggle() {
        let mut state = AppState::default();
        reducer(&mut state, Action::StateTabToggle);
        assert_eq!(state.active_tab, StateTab::StateTree);

        state.panels.remove(PanelFlags::STATE_TABS);
        assert!(!reducer(&mut state, Action::StateTabToggle).changed);
    }

    #[test]
    fn test_sidebar_scroll_clamped_to_rows() {
        let mut state = AppState::default();
        let mut rec = sample_record(1, "a");
        rec.after = json!({"a": 1, "b": 2, "c": 3}).as_object().cloned().unwrap();
        reducer(&mut state, Action::RecordDispatched(Box::new(rec)));
        reducer(&mut state, Action::TableSelect(1));

        reducer(&mut state, Action::SidebarScroll(10));
        assert_eq!(state.sidebar_scroll, 2);
        reducer(&mut state, Action::SidebarScroll(-1));
        assert_eq!(state.sidebar_scroll, 1);
        reducer(&mut state, Action::SidebarScroll(-5));
        assert_eq!(state.sidebar_scroll, 0);

        reducer(&mut state, Action::SidebarScroll(1));
        reducer(&mut state, Action::StateFilterChange("a".into()));
        assert_eq!(state.sidebar_scroll, 0);
        assert_eq!(state_rows(&state), 1);
    }

    #[test]
    fn test_copy_selected() {
        let mut state = with_records(1);
        assert!(reducer(&mut state, Action::CopySelected).effects.is_empty());

        reducer(&mut state, Action::TableSelect(1));
        let result = reducer(&mut state, Action::CopySelected);
        match result.effects.as_slice() {
            [Effect::CopyToClipboard(text)] => {
                let value: serde_json::Value = serde_json::from_str(text).unwrap();
                assert_eq!(value["id"], json!(1));
                assert_eq!(value["action"]["type"], json!("todos/add"));
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_session_flush_only_when_enabled() {
        let mut state = AppState::default();
        reducer(&mut state, Action::RecordDispatched(record(1, "a")));
        assert!(!state.session_dirty);
        assert!(reducer(&mut state, Action::SessionFlush).effects.is_empty());

        state.persist = true;
        let result = reducer(&mut state, Action::TableSelect(1));
        assert!(result.effects.is_empty());
        assert!(state.session_dirty);

        let result = reducer(&mut state, Action::SessionFlush);
        match result.effects.as_slice() {
            [Effect::PersistSession(snapshot)] => {
                assert_eq!(snapshot.selected_id, Some(1));
                assert_eq!(snapshot.actions.len(), 1);
            }
            other => panic!("unexpected effects: {other:?}"),
        }
        assert!(!state.session_dirty);
        assert!(reducer(&mut state, Action::SessionFlush).effects.is_empty());
    }

    #[test]
    fn test_steady_stream_saves_once_per_flush() {
        let mut state = AppState::default();
        state.persist = true;

        for id in 1..=50 {
            let result = reducer(&mut state, Action::RecordDispatched(record(id, "tick/step")));
            assert!(result.effects.is_empty());
        }
        let result = reducer(&mut state, Action::SessionFlush);
        match result.effects.as_slice() {
            [Effect::PersistSession(snapshot)] => assert_eq!(snapshot.actions.len(), 50),
            other => panic!("unexpected effects: {other:?}"),
        }

        reducer(&mut state, Action::RecordDispatched(record(51, "tick/step")));
        match reducer(&mut state, Action::SessionFlush).effects.as_slice() {
            [Effect::PersistSession(snapshot)] => assert_eq!(snapshot.actions.len(), 51),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn test_tick_expires_nothing_fresh() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::Tick).changed);
        state.notices.push(Notice::success("hi"));
        assert!(!reducer(&mut state, Action::Tick).changed);
        assert_eq!(state.notices.len(), 1);
    }
}
