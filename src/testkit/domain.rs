//! Builders for backend records used across tests.
//!
//! Produce the JSON the API answers with, so tests exercise the same
//! decoding path as production.

use serde_json::{json, Value};

pub fn project(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

/// A device of `kind` placed in `room`, with optional attached rules.
pub fn device(id: &str, kind: &str, room: &str, rules: (Option<&str>, Option<&str>)) -> Value {
    let (warning, error) = rules;
    json!({
        "id": id,
        "name": format!("{kind} {id}"),
        "collection_id": room,
        "data": {
            "type": kind,
            "meta": { "warningRule": warning, "errorRule": error }
        }
    })
}

pub fn rule(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "active": true })
}

pub fn room(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name })
}

/// One page of alerts as the event list endpoint returns it.
pub fn alert_page(page: u32, total: u64, alerts: &[Value]) -> Value {
    json!({ "page": page, "total": total, "data": alerts })
}

pub fn alert(id: &str, title: &str, accepted: bool) -> Value {
    json!({
        "id": id,
        "title": title,
        "body": "",
        "type": 1,
        "accepted_at": if accepted { Some("2024-05-01T00:00:00Z") } else { None },
        "created_at": "2024-05-01T00:00:00Z"
    })
}
