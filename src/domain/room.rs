//! Rooms (called "collections" by the backend) group devices into areas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub meta: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Room {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            meta: Value::Null,
            extra: Map::new(),
        }
    }
}

impl Record for Room {
    const KIND: &'static str = "room";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
