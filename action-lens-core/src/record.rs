//! Action records streamed from the instrumented application

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::inspect::segments::{tokenize, Tokenized};
use crate::inspect::snapshot::Snapshot;

/// An action as dispatched in the observed application
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawDispatchedAction")]
pub struct DispatchedAction {
    #[serde(rename = "type")]
    pub action_type: String,
    pub payload: Value,
    /// Other top-level fields (`meta`, `error`, ...)
    #[serde(flatten, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct RawDispatchedAction {
    #[serde(rename = "type", default)]
    action_type: String,
    #[serde(default, deserialize_with = "present")]
    payload: Option<Value>,
    #[serde(flatten)]
    rest: Map<String, Value>,
}

/// Keeps an explicit `"payload": null` distinct from a missing key
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl From<RawDispatchedAction> for DispatchedAction {
    fn from(raw: RawDispatchedAction) -> Self {
        match raw.payload {
            Some(payload) => Self {
                action_type: raw.action_type,
                payload,
                extra: raw.rest,
            },
            // Flux-style actions without a `payload` key carry their data inline
            None if !raw.rest.is_empty() => Self {
                action_type: raw.action_type,
                payload: Value::Object(raw.rest),
                extra: Map::new(),
            },
            None => Self::new(raw.action_type, Value::Null),
        }
    }
}

impl DispatchedAction {
    pub fn new(action_type: impl Into<String>, payload: Value) -> Self {
        Self {
            action_type: action_type.into(),
            payload,
            extra: Map::new(),
        }
    }
}

/// One observed dispatch, with timing and state snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub id: i64,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub took: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<DispatchedAction>,
    #[serde(default, deserialize_with = "snapshot_or_null")]
    pub before: Snapshot,
    #[serde(default, deserialize_with = "snapshot_or_null")]
    pub after: Snapshot,
}

/// `null` snapshots arrive before the host has any state
fn snapshot_or_null<'de, D>(deserializer: D) -> Result<Snapshot, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Snapshot>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl ActionRecord {
    /// Action type, empty when the record carries no action
    pub fn type_name(&self) -> &str {
        self.action
            .as_ref()
            .map(|a| a.action_type.as_str())
            .unwrap_or_default()
    }

    /// Colorized action type
    pub fn tokens(&self) -> Tokenized {
        tokenize(self.type_name())
    }

    /// `{type, payload}` view shown in the Action panel
    pub fn payload_view(&self) -> Value {
        let Some(action) = &self.action else {
            return Value::Null;
        };
        let mut view = Map::new();
        view.insert("type".into(), json!(action.action_type));
        view.insert("payload".into(), action.payload.clone());
        for (key, value) in &action.extra {
            view.insert(key.clone(), value.clone());
        }
        Value::Object(view)
    }

    /// Case-insensitive match on the visible columns
    pub fn matches_query(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let query = query.to_lowercase();
        [self.time.as_str(), self.type_name(), self.took.as_str()]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(value: Value) -> ActionRecord {
        serde_json::from_value(value).expect("valid record")
    }

    #[test]
    fn test_deserialize_full_record() {
        let record = parse(json!({
            "id": 4,
            "time": "12:01:33.120",
            "took": "0.41 ms",
            "action": {"type": "todos/add", "payload": {"text": "milk"}},
            "before": {"todos": []},
            "after": {"todos": [{"text": "milk"}]}
        }));

        assert_eq!(record.id, 4);
        assert_eq!(record.type_name(), "todos/add");
        assert_eq!(record.took, "0.41 ms");
        assert_eq!(record.after["todos"], json!([{"text": "milk"}]));
        assert_eq!(
            record.payload_view(),
            json!({"type": "todos/add", "payload": {"text": "milk"}})
        );
    }

    #[test]
    fn test_inline_fields_become_payload() {
        let record = parse(json!({
            "id": 1,
            "action": {"type": "SET_FILTER", "filter": "done"}
        }));
        let action = record.action.as_ref().unwrap();
        assert_eq!(action.payload, json!({"filter": "done"}));
        assert!(action.extra.is_empty());
        assert!(record.before.is_empty());
    }

    #[test]
    fn test_extra_fields_next_to_payload() {
        let record = parse(json!({
            "id": 2,
            "action": {"type": "x/pending", "payload": null, "meta": {"requestId": "a1"}}
        }));
        assert_eq!(
            record.payload_view(),
            json!({"type": "x/pending", "payload": null, "meta": {"requestId": "a1"}})
        );
    }

    #[test]
    fn test_null_snapshots_are_empty() {
        let record = parse(json!({
            "id": 0,
            "action": {"type": "@@INIT"},
            "before": null,
            "after": {"ready": true}
        }));
        assert!(record.before.is_empty());
        assert_eq!(record.after["ready"], json!(true));

        let record = parse(json!({"id": 1, "before": null, "after": null}));
        assert!(record.after.is_empty());
    }

    #[test]
    fn test_missing_action() {
        let record = parse(json!({"id": 9, "time": "t"}));
        assert!(record.action.is_none());
        assert_eq!(record.type_name(), "");
        assert_eq!(record.payload_view(), Value::Null);
    }

    #[test]
    fn test_serialize_roundtrip_shape() {
        let action = DispatchedAction::new("counter/increment", json!(1));
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "counter/increment", "payload": 1})
        );
    }

    #[test]
    fn test_matches_query() {
        let record = parse(json!({
            "id": 3,
            "time": "10:00:00",
            "took": "2 ms",
            "action": {"type": "Todos/Toggle", "payload": 3}
        }));
        assert!(record.matches_query(""));
        assert!(record.matches_query("toggle"));
        assert!(record.matches_query("10:00"));
        assert!(record.matches_query("2 MS"));
        assert!(!record.matches_query("remove"));
    }
}
