//! Alerts raised by rules, shown in the event list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(rename = "type", default)]
    pub severity: u8,
    #[serde(default)]
    pub accepted_at: Option<String>,
    #[serde(default)]
    pub accepted_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Alert {
    pub fn new(id: impl Into<RecordId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: String::new(),
            severity: 0,
            accepted_at: None,
            accepted_by: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    /// The backend reports unaccepted alerts with a null or empty timestamp.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        self.accepted_at.as_deref().is_some_and(|at| !at.is_empty())
    }

    /// Lowercased, comma-joined field values used for free-text filtering.
    #[must_use]
    pub fn search_text(&self) -> String {
        let value = serde_json::to_value(self).unwrap_or(Value::Null);
        let Value::Object(fields) = value else {
            return String::new();
        };
        fields
            .values()
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Null => String::new(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",")
            .to_lowercase()
    }
}

impl Record for Alert {
    const KIND: &'static str = "alert";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.title
    }
}

/// One page of the alert list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlertPage {
    #[serde(default)]
    pub data: Vec<Alert>,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_timestamp_is_not_accepted() {
        let mut alert = Alert::new("a1", "Overvoltage");
        assert!(!alert.is_accepted());
        alert.accepted_at = Some(String::new());
        assert!(!alert.is_accepted());
        alert.accepted_at = Some("2024-05-01T10:00:00Z".into());
        assert!(alert.is_accepted());
    }

    #[test]
    fn search_text_covers_all_fields() {
        let mut alert = Alert::new("a1", "Overvoltage");
        alert.body = "Inverter West".into();
        let text = alert.search_text();
        assert!(text.contains("overvoltage"));
        assert!(text.contains("inverter west"));
    }
}
