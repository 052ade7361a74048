//! Hardware modules together with their variable mappings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleRecord {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<RecordId>,
    #[serde(default)]
    pub mappings: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModuleRecord {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: kind.into(),
            collection_id: None,
            mappings: Map::new(),
            extra: Map::new(),
        }
    }
}

impl Record for ModuleRecord {
    const KIND: &'static str = "module";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        &self.name
    }
}
