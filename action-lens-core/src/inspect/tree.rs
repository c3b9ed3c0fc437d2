//! Flattened JSON value trees and shallow snapshot diffs

use std::collections::BTreeSet;

use serde_json::Value;

use super::snapshot::Snapshot;

/// Levels expanded by default: the root's own entries are listed, nested
/// containers stay collapsed.
pub const DEFAULT_EXPAND_DEPTH: usize = 1;

/// One display row of a value tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub depth: usize,
    /// Object key or array index, `None` for the root
    pub key: Option<String>,
    pub preview: String,
    /// Container rows whose children are listed below them
    pub expanded: bool,
}

impl TreeRow {
    /// `key: preview` text, indented two columns per level
    pub fn display(&self) -> String {
        let indent = "  ".repeat(self.depth);
        match &self.key {
            Some(key) => format!("{indent}{key}: {}", self.preview),
            None => format!("{indent}{}", self.preview),
        }
    }
}

/// One-line preview of a value
pub fn preview(value: &Value) -> String {
    match value {
        Value::Object(map) if map.is_empty() => "{}".to_string(),
        Value::Object(map) => match map.len() {
            1 => "{1 key}".to_string(),
            n => format!("{{{n} keys}}"),
        },
        Value::Array(items) if items.is_empty() => "[]".to_string(),
        Value::Array(items) => match items.len() {
            1 => "[1 item]".to_string(),
            n => format!("[{n} items]"),
        },
        scalar => scalar.to_string(),
    }
}

/// Flatten `value` into rows, expanding containers up to `expand_depth`.
///
/// With `expand_depth == 0` only the root row is produced.
pub fn value_rows(value: &Value, expand_depth: usize) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    push_rows(&mut rows, None, value, 0, expand_depth);
    rows
}

/// Rows for a snapshot without a root row; top-level keys sit at depth 0
pub fn snapshot_rows(snapshot: &Snapshot, expand_depth: usize) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    for (key, value) in snapshot {
        push_rows(&mut rows, Some(key.clone()), value, 0, expand_depth.saturating_sub(1));
    }
    rows
}

fn push_rows(
    rows: &mut Vec<TreeRow>,
    key: Option<String>,
    value: &Value,
    depth: usize,
    expand_depth: usize,
) {
    let has_children = match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    };
    let expanded = has_children && depth < expand_depth;

    rows.push(TreeRow {
        depth,
        key,
        preview: preview(value),
        expanded,
    });

    if !expanded {
        return;
    }

    match value {
        Value::Object(map) => {
            for (child_key, child) in map {
                push_rows(rows, Some(child_key.clone()), child, depth + 1, expand_depth);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                push_rows(rows, Some(index.to_string()), child, depth + 1, expand_depth);
            }
        }
        _ => {}
    }
}

/// How a top-level key changed between two snapshots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Added,
    Removed,
    Changed,
    Unchanged,
}

impl DiffKind {
    /// Gutter marker
    pub fn marker(self) -> &'static str {
        match self {
            DiffKind::Added => "+",
            DiffKind::Removed => "-",
            DiffKind::Changed => "~",
            DiffKind::Unchanged => " ",
        }
    }
}

/// One top-level key in the Diff tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRow {
    pub key: String,
    pub kind: DiffKind,
    pub before: Option<String>,
    pub after: Option<String>,
}

/// Shallow diff of the top-level keys, sorted by key
pub fn diff_rows(before: &Snapshot, after: &Snapshot) -> Vec<DiffRow> {
    let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();

    keys.into_iter()
        .map(|key| {
            let old = before.get(key);
            let new = after.get(key);
            let kind = match (old, new) {
                (None, Some(_)) => DiffKind::Added,
                (Some(_), None) => DiffKind::Removed,
                (Some(a), Some(b)) if a == b => DiffKind::Unchanged,
                _ => DiffKind::Changed,
            };
            DiffRow {
                key: key.clone(),
                kind,
                before: old.map(preview),
                after: new.map(preview),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> Snapshot {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_preview() {
        assert_eq!(preview(&json!({})), "{}");
        assert_eq!(preview(&json!({"a": 1})), "{1 key}");
        assert_eq!(preview(&json!({"a": 1, "b": 2})), "{2 keys}");
        assert_eq!(preview(&json!([1, 2, 3])), "[3 items]");
        assert_eq!(preview(&json!("milk")), "\"milk\"");
        assert_eq!(preview(&json!(null)), "null");
    }

    #[test]
    fn test_value_rows_expand_root_only() {
        let value = json!({"type": "todos/add", "payload": {"text": "milk", "done": false}});
        let rows = value_rows(&value, 1);

        let displayed: Vec<_> = rows.iter().map(TreeRow::display).collect();
        assert_eq!(
            displayed,
            vec!["{2 keys}", "  payload: {2 keys}", "  type: \"todos/add\""]
        );
        assert!(rows[0].expanded);
        assert!(!rows[1].expanded);
    }

    #[test]
    fn test_value_rows_depth() {
        let value = json!({"list": [1, {"x": true}]});
        assert_eq!(value_rows(&value, 0).len(), 1);
        let rows = value_rows(&value, 3);
        let displayed: Vec<_> = rows.iter().map(TreeRow::display).collect();
        assert_eq!(
            displayed,
            vec![
                "{1 key}",
                "  list: [2 items]",
                "    0: 1",
                "    1: {1 key}",
                "      x: true",
            ]
        );
    }

    #[test]
    fn test_snapshot_rows() {
        let state = snapshot(json!({"count": 2, "todos": [{"id": 1}]}));
        let rows = snapshot_rows(&state, 1);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].display(), "count: 2");
        assert_eq!(rows[1].display(), "todos: [1 item]");
        assert!(!rows[1].expanded);

        let rows = snapshot_rows(&state, 2);
        assert_eq!(rows[2].display(), "  0: {1 key}");
    }

    #[test]
    fn test_diff_rows() {
        let before = snapshot(json!({"count": 1, "gone": true, "same": "x"}));
        let after = snapshot(json!({"count": 2, "new": [], "same": "x"}));

        let rows = diff_rows(&before, &after);
        let kinds: Vec<_> = rows.iter().map(|r| (r.key.as_str(), r.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("count", DiffKind::Changed),
                ("gone", DiffKind::Removed),
                ("new", DiffKind::Added),
                ("same", DiffKind::Unchanged),
            ]
        );
        assert_eq!(rows[0].before.as_deref(), Some("1"));
        assert_eq!(rows[0].after.as_deref(), Some("2"));
        assert_eq!(rows[1].after, None);
    }
}
