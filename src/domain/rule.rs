//! Automation rules evaluated by the backend.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

/// Wall-clock time of day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: u8,
    pub minutes: u8,
}

/// A window during which a rule is active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleItem {
    #[serde(rename = "timeFrom")]
    pub time_from: TimeOfDay,
    #[serde(rename = "timeTo")]
    pub time_to: TimeOfDay,
    /// IANA zone name, e.g. `Europe/Berlin`.
    pub timezone: String,
    /// Index 0 is Sunday.
    #[serde(rename = "activeDays")]
    pub active_days: Vec<bool>,
}

/// Comparison of a measurement against a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub and_or: bool,
    pub target: f64,
    pub variable: String,
    pub condition: String,
}

/// What a rule does when it fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "params", rename_all = "lowercase")]
pub enum RuleAction {
    Webhook {
        url: String,
        method: String,
        #[serde(default)]
        body: String,
        #[serde(default)]
        headers: Map<String, Value>,
    },
    Email {
        recipients: Vec<String>,
        subject: String,
        body: String,
    },
    Alert {
        #[serde(rename = "type")]
        severity: u8,
        body: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub actions: Vec<RuleAction>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub schedule: Vec<ScheduleItem>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Rule {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            active: true,
            actions: Vec::new(),
            conditions: Vec::new(),
            schedule: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Record for Rule {
    const KIND: &'static str = "rule";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
