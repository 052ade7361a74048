//! The record abstraction shared by every domain collection.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::id::RecordId;

/// A record that can live in a domain collection.
///
/// The collection key is always taken from [`Record::id`], so a record can
/// never be filed under a key other than its own identifier.
pub trait Record: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Human-readable kind used in logs and reports (e.g. `"device"`).
    const KIND: &'static str;

    /// The identifier embedded in the record.
    fn id(&self) -> &RecordId;

    /// Display name used in success reports.
    fn label(&self) -> &str {
        self.id().as_str()
    }
}
