//! Inspector actions
//!
//! Naming follows the framework convention: the prefix is the category
//! (`Table*` -> "table"), and `Did` marks the result of async work.

use action_lens_core::{ActionCategory, ActionRecord, ActionSummary, InspectorContext};

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    // ===== Host connection =====
    /// A client connected; carries the peer address
    HostDidConnect(String),
    HostDidDisconnect,
    /// `actionDispatched` from the host
    RecordDispatched(Box<ActionRecord>),
    /// `actionInit` from the host: restart the session with this record
    RecordInit(Box<ActionRecord>),

    // ===== Table =====
    TableSelect(i64),
    TableNext,
    TablePrev,
    TableTop,
    TableBottom,
    TableClear,
    /// Toggle following the newest action
    TableFollowToggle,

    // ===== Search =====
    SearchQueryChange(String),

    // ===== Sidebar =====
    SidebarScroll(isize),
    StateFilterChange(String),
    StateTabToggle,

    // ===== Dispatch box =====
    DispatchTypeChange(String),
    DispatchPayloadChange(String),
    DispatchFieldToggle,
    DispatchSubmit,
    DispatchDidSucceed,
    DispatchDidFail(String),

    // ===== Focus =====
    FocusSet(InspectorContext),
    FocusNext,
    FocusPrev,

    // ===== Clipboard =====
    CopySelected,
    CopyDidSucceed,
    CopyDidFail(String),

    // ===== Session =====
    /// Periodic: save records and selection if they changed
    SessionFlush,
    SessionDidSave,
    SessionDidFail(String),

    // ===== Global =====
    Tick,
    Quit,
}

impl action_lens_core::Action for Action {
    fn name(&self) -> &'static str {
        match self {
            Action::HostDidConnect(_) => "HostDidConnect",
            Action::HostDidDisconnect => "HostDidDisconnect",
            Action::RecordDispatched(_) => "RecordDispatched",
            Action::RecordInit(_) => "RecordInit",
            Action::TableSelect(_) => "TableSelect",
            Action::TableNext => "TableNext",
            Action::TablePrev => "TablePrev",
            Action::TableTop => "TableTop",
            Action::TableBottom => "TableBottom",
            Action::TableClear => "TableClear",
            Action::TableFollowToggle => "TableFollowToggle",
            Action::SearchQueryChange(_) => "SearchQueryChange",
            Action::SidebarScroll(_) => "SidebarScroll",
            Action::StateFilterChange(_) => "StateFilterChange",
            Action::StateTabToggle => "StateTabToggle",
            Action::DispatchTypeChange(_) => "DispatchTypeChange",
            Action::DispatchPayloadChange(_) => "DispatchPayloadChange",
            Action::DispatchFieldToggle => "DispatchFieldToggle",
            Action::DispatchSubmit => "DispatchSubmit",
            Action::DispatchDidSucceed => "DispatchDidSucceed",
            Action::DispatchDidFail(_) => "DispatchDidFail",
            Action::FocusSet(_) => "FocusSet",
            Action::FocusNext => "FocusNext",
            Action::FocusPrev => "FocusPrev",
            Action::CopySelected => "CopySelected",
            Action::CopyDidSucceed => "CopyDidSucceed",
            Action::CopyDidFail(_) => "CopyDidFail",
            Action::SessionFlush => "SessionFlush",
            Action::SessionDidSave => "SessionDidSave",
            Action::SessionDidFail(_) => "SessionDidFail",
            Action::Tick => "Tick",
            Action::Quit => "Quit",
        }
    }
}

impl ActionCategory for Action {
    fn category(&self) -> Option<&'static str> {
        use action_lens_core::Action as _;

        const PREFIXES: &[(&str, &str)] = &[
            ("Host", "host"),
            ("Record", "host"),
            ("Table", "table"),
            ("Search", "table"),
            ("Sidebar", "sidebar"),
            ("State", "sidebar"),
            ("Dispatch", "dispatch"),
            ("Focus", "focus"),
            ("Copy", "clipboard"),
            ("Session", "session"),
        ];
        let name = self.name();
        PREFIXES
            .iter()
            .find(|(prefix, _)| name.starts_with(prefix))
            .map(|(_, category)| *category)
    }
}

/// Records carry whole state snapshots; log the id and type only
impl ActionSummary for Action {
    fn summary(&self) -> String {
        match self {
            Action::RecordDispatched(record) => {
                format!(
                    "RecordDispatched {{ id: {}, type: {:?} }}",
                    record.id,
                    record.type_name()
                )
            }
            Action::RecordInit(record) => {
                format!(
                    "RecordInit {{ id: {}, type: {:?} }}",
                    record.id,
                    record.type_name()
                )
            }
            Action::DispatchPayloadChange(text) if text.len() > 40 => {
                let head: String = text.chars().take(37).collect();
                format!("DispatchPayloadChange({head:?}...)")
            }
            _ => format!("{:?}", self),
        }
    }
}
