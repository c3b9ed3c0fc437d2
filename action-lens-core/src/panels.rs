//! Optional inspector panels
//!
//! The inspector is one component whose optional areas are switched on and
//! off by [`PanelFlags`]. Panels can be addressed by name so they can be
//! configured from the command line or a config file:
//!
//! ```
//! use action_lens_core::panels::{PanelFlags, PanelToggles};
//!
//! let mut panels = PanelFlags::default();
//! assert!(panels.contains(PanelFlags::DISPATCH_BOX));
//!
//! panels.disable("dispatch_box");
//! assert_eq!(panels.is_enabled("dispatch_box"), Some(false));
//! assert_eq!(panels.is_enabled("nope"), None);
//! ```

use std::collections::HashMap;

use bitflags::bitflags;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PanelFlags: u8 {
        /// Compose and send a synthetic action
        const DISPATCH_BOX = 1 << 0;
        /// Diff / State Tree tabs in the sidebar (state tree only when off)
        const STATE_TABS = 1 << 1;
        /// Search bar above the action table
        const SEARCH_BAR = 1 << 2;
        /// Follow the newest action
        const AUTO_SCROLL = 1 << 3;
    }
}

impl Default for PanelFlags {
    fn default() -> Self {
        Self::all()
    }
}

const PANEL_NAMES: &[(&str, PanelFlags)] = &[
    ("dispatch_box", PanelFlags::DISPATCH_BOX),
    ("state_tabs", PanelFlags::STATE_TABS),
    ("search_bar", PanelFlags::SEARCH_BAR),
    ("auto_scroll", PanelFlags::AUTO_SCROLL),
];

fn flag_for(name: &str) -> Option<PanelFlags> {
    PANEL_NAMES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, flag)| *flag)
}

/// Name-based access to toggles
pub trait PanelToggles {
    /// `None` if no toggle has this name
    fn is_enabled(&self, name: &str) -> Option<bool>;

    /// Returns `false` if no toggle has this name
    fn set_panel(&mut self, name: &str, enabled: bool) -> bool;

    fn all_flags() -> &'static [&'static str]
    where
        Self: Sized;

    fn enable(&mut self, name: &str) -> bool {
        self.set_panel(name, true)
    }

    fn disable(&mut self, name: &str) -> bool {
        self.set_panel(name, false)
    }

    /// Returns the new state, or `None` if no toggle has this name
    fn toggle_panel(&mut self, name: &str) -> Option<bool> {
        let new_state = !self.is_enabled(name)?;
        self.set_panel(name, new_state);
        Some(new_state)
    }

    /// Apply a name -> enabled map; unknown names are skipped.
    ///
    /// Returns the number of toggles that were set.
    fn load_from_map(&mut self, map: &HashMap<String, bool>) -> usize {
        map.iter()
            .filter(|(name, enabled)| self.set_panel(name, **enabled))
            .count()
    }
}

impl PanelToggles for PanelFlags {
    fn is_enabled(&self, name: &str) -> Option<bool> {
        flag_for(name).map(|flag| self.contains(flag))
    }

    fn set_panel(&mut self, name: &str, enabled: bool) -> bool {
        match flag_for(name) {
            Some(flag) => {
                self.set(flag, enabled);
                true
            }
            None => {
                tracing::warn!(panel = name, "Unknown panel name");
                false
            }
        }
    }

    fn all_flags() -> &'static [&'static str] {
        &["dispatch_box", "state_tabs", "search_bar", "auto_scroll"]
    }
}
