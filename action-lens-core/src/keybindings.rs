//! Keybindings with context-aware lookup
//!
//! Bindings map command names (`"table.next"`) to key strings (`"down"`,
//! `"ctrl+c"`). They serialize as JSON objects keyed by context name so users
//! can override any subset:
//!
//! ```json
//! { "global": { "quit": ["ctrl+q"] }, "table": { "table.next": ["n"] } }
//! ```

use std::collections::HashMap;
use std::hash::Hash;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A named context that has its own bindings
pub trait BindingContext: Clone + Copy + Eq + Hash {
    /// Name used as the key in config files
    fn name(&self) -> &'static str;

    fn from_name(name: &str) -> Option<Self>;

    fn all() -> &'static [Self];
}

/// Where keyboard focus currently is in the inspector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InspectorContext {
    Table,
    Search,
    Sidebar,
    StateFilter,
    Dispatch,
}

impl InspectorContext {
    /// Contexts backed by a text input; unmodified keys are typed, not matched
    pub fn captures_text(self) -> bool {
        matches!(
            self,
            InspectorContext::Search | InspectorContext::StateFilter | InspectorContext::Dispatch
        )
    }
}

impl BindingContext for InspectorContext {
    fn name(&self) -> &'static str {
        match self {
            InspectorContext::Table => "table",
            InspectorContext::Search => "search",
            InspectorContext::Sidebar => "sidebar",
            InspectorContext::StateFilter => "state_filter",
            InspectorContext::Dispatch => "dispatch",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    fn all() -> &'static [Self] {
        &[
            InspectorContext::Table,
            InspectorContext::Search,
            InspectorContext::Sidebar,
            InspectorContext::StateFilter,
            InspectorContext::Dispatch,
        ]
    }
}

type Bindings = HashMap<String, Vec<String>>;

/// Keybindings configuration, global plus per-context
#[derive(Debug, Clone)]
pub struct Keybindings<C: BindingContext> {
    /// Checked after the context bindings
    global: Bindings,
    contexts: HashMap<C, Bindings>,
}

impl<C: BindingContext> Default for Keybindings<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: BindingContext> Serialize for Keybindings<C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(1 + self.contexts.len()))?;
        map.serialize_entry("global", &self.global)?;
        for (context, bindings) in &self.contexts {
            map.serialize_entry(context.name(), bindings)?;
        }
        map.end()
    }
}

impl<'de, C: BindingContext> Deserialize<'de> for Keybindings<C> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: HashMap<String, Bindings> = HashMap::deserialize(deserializer)?;

        let mut keybindings = Keybindings::new();
        for (context_name, bindings) in raw {
            if context_name == "global" {
                keybindings.global = bindings;
            } else if let Some(context) = C::from_name(&context_name) {
                keybindings.contexts.insert(context, bindings);
            } else {
                tracing::warn!(context = %context_name, "Ignoring unknown keybinding context");
            }
        }
        Ok(keybindings)
    }
}

impl<C: BindingContext> Keybindings<C> {
    pub fn new() -> Self {
        Self {
            global: HashMap::new(),
            contexts: HashMap::new(),
        }
    }

    pub fn add_global(&mut self, command: impl Into<String>, keys: Vec<String>) {
        self.global.insert(command.into(), keys);
    }

    pub fn add(&mut self, context: C, command: impl Into<String>, keys: Vec<String>) {
        self.contexts
            .entry(context)
            .or_default()
            .insert(command.into(), keys);
    }

    pub fn global_bindings(&self) -> &Bindings {
        &self.global
    }

    /// Command for a key: context bindings first, then global
    pub fn get_command(&self, key: KeyEvent, context: C) -> Option<String> {
        self.get_context_command(key, context)
            .or_else(|| match_key(key, &self.global))
    }

    /// Command for a key from the context bindings only
    pub fn get_context_command(&self, key: KeyEvent, context: C) -> Option<String> {
        self.contexts
            .get(&context)
            .and_then(|bindings| match_key(key, bindings))
    }

    /// Command for a key from the global bindings only
    pub fn get_global_command(&self, key: KeyEvent) -> Option<String> {
        match_key(key, &self.global)
    }

    /// First key string bound to a command (for help text)
    pub fn get_first_keybinding(&self, command: &str, context: C) -> Option<String> {
        self.contexts
            .get(&context)
            .and_then(|bindings| bindings.get(command))
            .or_else(|| self.global.get(command))
            .and_then(|keys| keys.first().cloned())
    }

    /// Merge user config onto defaults; user entries replace default entries
    pub fn merge(mut defaults: Self, user: Self) -> Self {
        defaults.global.extend(user.global);
        for (context, bindings) in user.contexts {
            defaults.contexts.entry(context).or_default().extend(bindings);
        }
        defaults
    }
}

fn match_key(key: KeyEvent, bindings: &Bindings) -> Option<String> {
    bindings
        .iter()
        .find(|(_, keys)| {
            keys.iter()
                .filter_map(|k| parse_key_string(k))
                .any(|parsed| key_matches(&parsed, &key))
        })
        .map(|(command, _)| command.clone())
}

/// Character keys compare case-insensitively and ignore SHIFT, since
/// terminals report `G` as `Char('G')` with SHIFT set.
fn key_matches(binding: &KeyEvent, key: &KeyEvent) -> bool {
    match (binding.code, key.code) {
        (KeyCode::Char(a), KeyCode::Char(b)) => {
            a.to_lowercase().eq(b.to_lowercase())
                && binding.modifiers - KeyModifiers::SHIFT == key.modifiers - KeyModifiers::SHIFT
        }
        (a, b) => a == b && binding.modifiers == key.modifiers,
    }
}

/// Parse a key string like "q", "esc", "ctrl+p", "shift+tab" into a KeyEvent
pub fn parse_key_string(key_str: &str) -> Option<KeyEvent> {
    let key_str = key_str.trim().to_lowercase();
    if key_str.is_empty() {
        return None;
    }

    let press = |code, modifiers| KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        state: KeyEventState::empty(),
    };

    if key_str == "shift+tab" || key_str == "backtab" {
        return Some(press(KeyCode::BackTab, KeyModifiers::SHIFT));
    }
    // a lone "+" is a key, not a separator
    if key_str == "+" {
        return Some(press(KeyCode::Char('+'), KeyModifiers::NONE));
    }

    let parts: Vec<&str> = key_str.split('+').map(str::trim).collect();
    let (key_part, modifier_parts) = parts.split_last()?;

    let mut modifiers = KeyModifiers::empty();
    for part in modifier_parts {
        match *part {
            "ctrl" | "control" => modifiers |= KeyModifiers::CONTROL,
            "shift" => modifiers |= KeyModifiers::SHIFT,
            "alt" => modifiers |= KeyModifiers::ALT,
            _ => return None,
        }
    }

    let code = match *key_part {
        "esc" | "escape" => KeyCode::Esc,
        "enter" | "return" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "home" => KeyCode::Home,
        "end" => KeyCode::End,
        "pageup" => KeyCode::PageUp,
        "pagedown" => KeyCode::PageDown,
        "delete" => KeyCode::Delete,
        "insert" => KeyCode::Insert,
        "space" => KeyCode::Char(' '),
        f if f.len() > 1 && f.starts_with('f') => {
            let n: u8 = f[1..].parse().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
        c if c.chars().count() == 1 => KeyCode::Char(c.chars().next()?),
        _ => return None,
    };

    Some(press(code, modifiers))
}

/// Format a key string for display ("ctrl+p" -> "^P", "tab" -> "Tab")
pub fn format_key_for_display(key_str: &str) -> String {
    let key_str = key_str.trim().to_lowercase();
    if key_str == "shift+tab" || key_str == "backtab" {
        return "S-Tab".to_string();
    }

    let parts: Vec<&str> = key_str.split('+').collect();
    let (key_part, modifier_parts) = match parts.split_last() {
        Some((last, rest)) if !last.is_empty() => (*last, rest),
        _ => (key_str.as_str(), &[][..]),
    };

    let prefix: String = modifier_parts
        .iter()
        .map(|m| match m.trim() {
            "ctrl" | "control" => "^",
            "shift" => "S-",
            "alt" => "M-",
            _ => "",
        })
        .collect();

    let key_display = match key_part {
        "esc" | "escape" => "Esc".to_string(),
        "enter" | "return" => "Enter".to_string(),
        "tab" => "Tab".to_string(),
        "backspace" => "Bksp".to_string(),
        "up" => "↑".to_string(),
        "down" => "↓".to_string(),
        "left" => "←".to_string(),
        "right" => "→".to_string(),
        "home" => "Home".to_string(),
        "end" => "End".to_string(),
        "pageup" => "PgUp".to_string(),
        "pagedown" => "PgDn".to_string(),
        "delete" => "Del".to_string(),
        "space" => "Space".to_string(),
        f if f.len() > 1 && f.starts_with('f') && f[1..].parse::<u8>().is_ok() => {
            f.to_uppercase()
        }
        // Letters are shown upper-case only behind a modifier
        c if !prefix.is_empty() => c.to_uppercase(),
        c => c.to_string(),
    };

    format!("{prefix}{key_display}")
}

fn keys(list: &[&str]) -> Vec<String> {
    list.iter().map(|k| (*k).to_string()).collect()
}

/// Default inspector keybindings
///
/// Global:
/// - `quit`: Ctrl+C, q
/// - `focus.next` / `focus.prev`: Tab / Shift+Tab
/// - `copy`: y
/// - `clear`: Ctrl+L
///
/// Contexts bind the navigation and editing commands for their panel.
pub fn default_inspector_keybindings() -> Keybindings<InspectorContext> {
    use InspectorContext::*;

    let mut kb = Keybindings::new();
    kb.add_global("quit", keys(&["ctrl+c", "q"]));
    kb.add_global("focus.next", keys(&["tab"]));
    kb.add_global("focus.prev", keys(&["shift+tab"]));
    kb.add_global("copy", keys(&["y"]));
    kb.add_global("clear", keys(&["ctrl+l"]));
    kb.add_global("dispatch.open", keys(&["d"]));

    kb.add(Table, "table.next", keys(&["down", "j"]));
    kb.add(Table, "table.prev", keys(&["up", "k"]));
    kb.add(Table, "table.top", keys(&["home", "g"]));
    kb.add(Table, "table.bottom", keys(&["end"]));
    kb.add(Table, "search.open", keys(&["/"]));
    kb.add(Table, "table.follow", keys(&["a"]));

    kb.add(Search, "search.close", keys(&["esc", "enter"]));
    kb.add(Search, "search.clear", keys(&["ctrl+u"]));

    kb.add(Sidebar, "sidebar.down", keys(&["down", "j"]));
    kb.add(Sidebar, "sidebar.up", keys(&["up", "k"]));
    kb.add(Sidebar, "sidebar.tab", keys(&["t"]));
    kb.add(Sidebar, "filter.open", keys(&["f", "/"]));

    kb.add(StateFilter, "filter.close", keys(&["esc", "enter"]));
    kb.add(StateFilter, "filter.clear", keys(&["ctrl+u"]));

    kb.add(Dispatch, "dispatch.send", keys(&["ctrl+s", "ctrl+d"]));
    kb.add(Dispatch, "dispatch.field", keys(&["tab", "shift+tab"]));
    kb.add(Dispatch, "dispatch.close", keys(&["esc"]));
    kb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::empty(),
        }
    }

    #[test]
    fn test_parse_simple_and_named_keys() {
        let q = parse_key_string("q").unwrap();
        assert_eq!(q.code, KeyCode::Char('q'));
        assert_eq!(q.modifiers, KeyModifiers::empty());

        assert_eq!(parse_key_string("esc").unwrap().code, KeyCode::Esc);
        assert_eq!(parse_key_string("Down").unwrap().code, KeyCode::Down);
        assert_eq!(parse_key_string("f5").unwrap().code, KeyCode::F(5));
        assert_eq!(parse_key_string("+").unwrap().code, KeyCode::Char('+'));
    }

    #[test]
    fn test_parse_modifiers() {
        let ctrl_s = parse_key_string("ctrl+s").unwrap();
        assert_eq!(ctrl_s.code, KeyCode::Char('s'));
        assert!(ctrl_s.modifiers.contains(KeyModifiers::CONTROL));

        let back = parse_key_string("shift+tab").unwrap();
        assert_eq!(back.code, KeyCode::BackTab);
        assert!(back.modifiers.contains(KeyModifiers::SHIFT));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_key_string("").is_none());
        assert!(parse_key_string("hyper+x").is_none());
        assert!(parse_key_string("f13").is_none());
        assert!(parse_key_string("banana").is_none());
    }

    #[test]
    fn test_get_command_context_then_global() {
        let kb = default_inspector_keybindings();

        let down = key(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(
            kb.get_command(down, InspectorContext::Table).as_deref(),
            Some("table.next")
        );
        assert_eq!(
            kb.get_command(down, InspectorContext::Sidebar).as_deref(),
            Some("sidebar.down")
        );

        let ctrl_c = key(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(
            kb.get_command(ctrl_c, InspectorContext::Dispatch).as_deref(),
            Some("quit")
        );
    }

    #[test]
    fn test_context_only_lookup() {
        let kb = default_inspector_keybindings();
        let q = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(kb.get_context_command(q, InspectorContext::Search), None);
        assert_eq!(kb.get_global_command(q).as_deref(), Some("quit"));
        assert!(InspectorContext::Search.captures_text());
        assert!(!InspectorContext::Table.captures_text());
    }

    #[test]
    fn test_char_keys_ignore_shift() {
        let mut kb: Keybindings<InspectorContext> = Keybindings::new();
        kb.add(InspectorContext::Table, "table.bottom", keys(&["G"]));

        let shifted = key(KeyCode::Char('G'), KeyModifiers::SHIFT);
        assert_eq!(
            kb.get_command(shifted, InspectorContext::Table).as_deref(),
            Some("table.bottom")
        );
    }

    #[test]
    fn test_merge_and_deserialize() {
        let user: Keybindings<InspectorContext> = serde_json::from_str(
            r#"{"global": {"quit": ["ctrl+q"]}, "table": {"table.next": ["n"]}, "bogus": {}}"#,
        )
        .unwrap();
        let merged = Keybindings::merge(default_inspector_keybindings(), user);

        assert_eq!(
            merged.global_bindings().get("quit"),
            Some(&vec!["ctrl+q".to_string()])
        );
        assert_eq!(
            merged.get_first_keybinding("table.next", InspectorContext::Table),
            Some("n".to_string())
        );
        assert_eq!(
            merged.get_first_keybinding("table.prev", InspectorContext::Table),
            Some("up".to_string())
        );
        assert_eq!(
            merged.get_first_keybinding("copy", InspectorContext::Sidebar),
            Some("y".to_string())
        );
    }

    #[test]
    fn test_serialize_uses_context_names() {
        let value = serde_json::to_value(default_inspector_keybindings()).unwrap();
        assert!(value.get("global").is_some());
        assert!(value.get("table").is_some());
        assert!(value.get("state_filter").is_some());
    }

    #[test]
    fn test_format_key_for_display() {
        assert_eq!(format_key_for_display("q"), "q");
        assert_eq!(format_key_for_display("ctrl+s"), "^S");
        assert_eq!(format_key_for_display("esc"), "Esc");
        assert_eq!(format_key_for_display("shift+tab"), "S-Tab");
        assert_eq!(format_key_for_display("f12"), "F12");
        assert_eq!(format_key_for_display("down"), "↓");
    }
}
