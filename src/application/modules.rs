//! Module store: data-mapping modules with their mappings.

use async_trait::async_trait;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{ModuleRecord, RecordId};

/// Modules of the selected project. The list is loaded with mappings
/// included; single modules are written back at the plain collection path.
pub struct ModuleStore {
    store: DomainStore<ModuleRecord>,
}

impl ModuleStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(
                Endpoint::project("modules").with_list_suffix("/list?includeMappings=true"),
                deps,
            ),
        }
    }

    pub fn store(&self) -> &DomainStore<ModuleRecord> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Modules placed in `room`.
    #[must_use]
    pub fn by_room(&self, room: &RecordId) -> Vec<ModuleRecord> {
        let mut modules = self
            .store
            .filter(|m| m.collection_id.as_ref() == Some(room));
        modules.sort_by(|a, b| a.name.cmp(&b.name));
        modules
    }

    pub async fn update(&self, module: &ModuleRecord) -> Option<ModuleRecord> {
        self.store.update(module).await
    }
}

#[async_trait]
impl Bindable for ModuleStore {
    type Record = ModuleRecord;

    async fn load(&self) -> LoadOutcome {
        ModuleStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<ModuleRecord> {
        &self.store
    }
}
