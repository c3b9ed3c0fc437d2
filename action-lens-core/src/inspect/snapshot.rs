//! Top-level key filter for before/after state snapshots

use std::borrow::Cow;

use serde_json::{Map, Value};

/// A keyed state snapshot
pub type Snapshot = Map<String, Value>;

/// Before/after snapshots after applying a key filter.
///
/// Borrowed when no filter was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredSnapshot<'a> {
    pub before: Cow<'a, Snapshot>,
    pub after: Cow<'a, Snapshot>,
}

impl FilteredSnapshot<'_> {
    /// Whether the snapshots are the unfiltered source
    pub fn is_passthrough(&self) -> bool {
        matches!(
            (&self.before, &self.after),
            (Cow::Borrowed(_), Cow::Borrowed(_))
        )
    }
}

/// JavaScript truthiness for JSON values.
///
/// `null`, `false`, `0` and `""` are falsy. Arrays and objects are truthy
/// even when empty.
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Keep only the top-level keys that contain `filter`, ignoring case.
///
/// An empty or absent filter returns both snapshots untouched. The two sides
/// are filtered independently. In `after`, a kept key whose value is falsy is
/// shown as an empty object; `before` values are never rewritten.
pub fn filter_snapshots<'a>(
    filter: Option<&str>,
    before: &'a Snapshot,
    after: &'a Snapshot,
) -> FilteredSnapshot<'a> {
    let needle = match filter {
        Some(f) if !f.is_empty() => f.to_lowercase(),
        _ => {
            return FilteredSnapshot {
                before: Cow::Borrowed(before),
                after: Cow::Borrowed(after),
            }
        }
    };

    let matches = |key: &str| key.to_lowercase().contains(&needle);

    let filtered_after = after
        .iter()
        .filter(|(key, _)| matches(key))
        .map(|(key, value)| {
            let value = if is_falsy(value) {
                Value::Object(Map::new())
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect();

    let filtered_before = before
        .iter()
        .filter(|(key, _)| matches(key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    FilteredSnapshot {
        before: Cow::Owned(filtered_before),
        after: Cow::Owned(filtered_after),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn snapshot(value: Value) -> Snapshot {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_empty_filter_passes_through() {
        let before = snapshot(json!({"a": 1}));
        let after = snapshot(json!({"b": 2}));

        for filter in [None, Some("")] {
            let filtered = filter_snapshots(filter, &before, &after);
            assert!(filtered.is_passthrough());
            assert!(std::ptr::eq(filtered.before.as_ref(), &before));
            assert!(std::ptr::eq(filtered.after.as_ref(), &after));
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let before = snapshot(json!({"userId": 1, "name": "x"}));
        let after = snapshot(json!({"userId": 2, "other": 0}));

        let filtered = filter_snapshots(Some("user"), &before, &after);
        assert_eq!(*filtered.before, snapshot(json!({"userId": 1})));
        assert_eq!(*filtered.after, snapshot(json!({"userId": 2})));

        let filtered = filter_snapshots(Some("USERID"), &before, &after);
        assert_eq!(filtered.before.len(), 1);
        assert_eq!(filtered.after.len(), 1);
    }

    #[test]
    fn test_falsy_after_values_become_empty_objects() {
        let before = Snapshot::new();
        let after = snapshot(json!({"x": 0}));

        let filtered = filter_snapshots(Some("x"), &before, &after);
        assert!(filtered.before.is_empty());
        assert_eq!(*filtered.after, snapshot(json!({"x": {}})));
    }

    #[test]
    fn test_before_values_are_never_rewritten() {
        let before = snapshot(json!({"flag": false, "count": 0, "label": ""}));
        let after = snapshot(json!({"flag": false, "count": 3, "label": ""}));

        let filtered = filter_snapshots(Some("a"), &before, &after);
        assert_eq!(*filtered.before, snapshot(json!({"flag": false, "label": ""})));
        assert_eq!(*filtered.after, snapshot(json!({"flag": {}, "label": {}})));
    }

    #[test]
    fn test_sides_filtered_independently() {
        let before = snapshot(json!({"todoList": [1]}));
        let after = snapshot(json!({"todos": [1, 2], "visibility": "all"}));

        let filtered = filter_snapshots(Some("todos"), &before, &after);
        assert!(filtered.before.is_empty());
        assert_eq!(filtered.after.keys().collect::<Vec<_>>(), vec!["todos"]);
        assert!(!filtered.is_passthrough());
    }

    #[test]
    fn test_is_falsy() {
        assert!(is_falsy(&json!(null)));
        assert!(is_falsy(&json!(false)));
        assert!(is_falsy(&json!(0)));
        assert!(is_falsy(&json!(0.0)));
        assert!(is_falsy(&json!("")));

        assert!(!is_falsy(&json!(true)));
        assert!(!is_falsy(&json!(-1)));
        assert!(!is_falsy(&json!("0")));
        assert!(!is_falsy(&json!([])));
        assert!(!is_falsy(&json!({})));
    }
}
