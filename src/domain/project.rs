//! Project records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

/// Usage counters reported by the backend for a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectStats {
    pub collections: u32,
    pub devices: u32,
    pub errors: u32,
    pub members: u32,
    pub warnings: u32,
}

/// Plan limits of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectLimits {
    pub collections: u32,
    pub devices: u32,
    pub members: u32,
}

/// A monitored site.
///
/// Fields the console does not interpret are kept in `extra` so that a
/// project written back with `update` carries everything the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub meta: Value,
    #[serde(default)]
    pub stats: ProjectStats,
    #[serde(default)]
    pub limits: ProjectLimits,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Project {
    /// Minimal project with only an id and a name.
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            created_at: None,
            lat: None,
            lon: None,
            owner_id: None,
            meta: Value::Null,
            stats: ProjectStats::default(),
            limits: ProjectLimits::default(),
            extra: Map::new(),
        }
    }
}

impl Record for Project {
    const KIND: &'static str = "project";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_unknown_fields() {
        let raw = json!({
            "id": "p1",
            "name": "Plant",
            "secret": "s3cr3t",
            "connectivity": { "enabled": true },
            "stats": { "devices": 4 }
        });
        let project: Project = serde_json::from_value(raw).unwrap();
        assert_eq!(project.stats.devices, 4);
        assert_eq!(project.extra.get("secret"), Some(&json!("s3cr3t")));

        let back = serde_json::to_value(&project).unwrap();
        assert_eq!(back["connectivity"]["enabled"], json!(true));
    }
}
