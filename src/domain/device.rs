//! Device and MPC controller records.
//!
//! Devices and controllers share the same envelope: a name, a favorite flag,
//! the room (`collection_id`) they are placed in, and a typed `data` payload
//! whose schema depends on `data.type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

/// Rule references stored in a device's metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceMeta {
    #[serde(rename = "warningRule", default, skip_serializing_if = "Option::is_none")]
    pub warning_rule: Option<RecordId>,
    #[serde(rename = "errorRule", default, skip_serializing_if = "Option::is_none")]
    pub error_rule: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceMeta {
    /// Rules that must be removed together with the device.
    pub fn attached_rules(&self) -> impl Iterator<Item = &RecordId> {
        self.warning_rule
            .iter()
            .chain(self.error_rule.iter())
            .filter(|id| !id.as_str().is_empty())
    }
}

/// Typed payload of a device or controller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceData {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub meta: DeviceMeta,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DeviceData {
    pub fn of_kind(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Self::default()
        }
    }
}

/// A device or chart placed in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: DeviceData,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, data: DeviceData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            favorite: false,
            collection_id: None,
            project_id: None,
            created_at: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn in_room(mut self, room: impl Into<RecordId>) -> Self {
        self.collection_id = Some(room.into());
        self
    }
}

impl Record for Device {
    const KIND: &'static str = "device";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}

/// An MPC / EMS controller instance. The optimization itself runs in the
/// backend; the console only stores the instance configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub data: DeviceData,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<RecordId>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Controller {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, data: DeviceData) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            data,
            favorite: false,
            collection_id: None,
            extra: Map::new(),
        }
    }
}

impl Record for Controller {
    const KIND: &'static str = "controller";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
