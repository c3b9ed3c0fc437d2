//! Inspector state
//!
//! Components read `&AppState` through props; only the reducer mutates it.

use action_lens_core::{
    ActionRecord, InspectorContext, Notices, PanelFlags, SessionError, SessionSnapshot,
    SessionStore,
};

/// Notices are expired on this tick
pub const TICK_MS: u64 = 250;

/// Which view the State panel shows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StateTab {
    #[default]
    Diff,
    StateTree,
}

impl StateTab {
    pub fn toggle(self) -> Self {
        match self {
            StateTab::Diff => StateTab::StateTree,
            StateTab::StateTree => StateTab::Diff,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StateTab::Diff => "Diff",
            StateTab::StateTree => "State Tree",
        }
    }
}

/// Focused field of the dispatch box
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DispatchField {
    #[default]
    Type,
    Payload,
}

impl DispatchField {
    pub fn toggle(self) -> Self {
        match self {
            DispatchField::Type => DispatchField::Payload,
            DispatchField::Payload => DispatchField::Type,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AppState {
    /// Every record received this session, in arrival order
    pub records: Vec<ActionRecord>,
    pub selected_id: Option<i64>,
    pub search_query: String,
    pub state_filter: String,
    pub active_tab: StateTab,
    pub sidebar_scroll: usize,

    pub dispatch_type: String,
    pub dispatch_payload: String,
    pub dispatch_field: DispatchField,
    /// Focus before the dispatch box was opened
    pub dispatch_return: InspectorContext,

    pub focus: InspectorContext,
    /// Peer address while a host is connected
    pub host: Option<String>,
    pub notices: Notices,
    pub panels: PanelFlags,
    /// Keep the newest record in view; cleared when the user moves the selection
    pub follow: bool,
    /// Records and selection are saved; set when a session file is configured
    pub persist: bool,
    /// Records or selection changed since the last save
    pub session_dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(PanelFlags::default())
    }
}

impl AppState {
    pub fn new(panels: PanelFlags) -> Self {
        Self {
            records: Vec::new(),
            selected_id: None,
            search_query: String::new(),
            state_filter: String::new(),
            active_tab: StateTab::default(),
            sidebar_scroll: 0,
            dispatch_type: String::new(),
            dispatch_payload: String::new(),
            dispatch_field: DispatchField::default(),
            dispatch_return: InspectorContext::Table,
            focus: InspectorContext::Table,
            host: None,
            notices: Notices::default(),
            follow: panels.contains(PanelFlags::AUTO_SCROLL),
            panels,
            persist: false,
            session_dirty: false,
        }
    }

    /// Restore records and selection from a saved session
    pub fn from_session(panels: PanelFlags, session: SessionSnapshot) -> Self {
        let mut state = Self::new(panels);
        state.selected_id = session
            .selected_id
            .filter(|id| session.actions.iter().any(|r| r.id == *id));
        state.records = session.actions;
        state
    }

    pub fn is_connected(&self) -> bool {
        self.host.is_some()
    }

    /// Records matching the search query, in arrival order
    pub fn visible_records(&self) -> Vec<&ActionRecord> {
        let query = if self.panels.contains(PanelFlags::SEARCH_BAR) {
            self.search_query.as_str()
        } else {
            ""
        };
        self.records
            .iter()
            .filter(|r| r.matches_query(query))
            .collect()
    }

    pub fn selected(&self) -> Option<&ActionRecord> {
        let id = self.selected_id?;
        self.records.iter().find(|r| r.id == id)
    }

    /// Whether the table should pin its newest row
    pub fn follow_tail(&self) -> bool {
        self.follow && self.panels.contains(PanelFlags::AUTO_SCROLL)
    }

    pub fn dispatch_enabled(&self) -> bool {
        self.panels.contains(PanelFlags::DISPATCH_BOX)
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            selected_id: self.selected_id,
            actions: self.records.clone(),
        }
    }

    /// Write the session right away, regardless of pending saves
    pub fn save_session(&self, store: &impl SessionStore) -> Result<(), SessionError> {
        if !self.persist {
            return Ok(());
        }
        store.save(&self.session_snapshot())
    }
}
