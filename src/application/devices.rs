//! Device store.
//!
//! The devices endpoint returns devices and charts in one list; they are
//! told apart by `data.type`. Types listed in the console configuration are
//! devices, everything else is a chart.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::{debug, info};

use crate::application::rules::RuleStore;
use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, Projection, StoreDeps};
use crate::domain::{Device, RecordId, Report};
use crate::error::{ConsoleError, Result};
use crate::port::ApiRequest;

/// Devices and charts split by type.
#[derive(Debug, Default)]
pub struct DeviceSplit {
    pub devices: Vec<Device>,
    pub charts: Vec<Device>,
}

/// Devices and charts of the selected project.
pub struct DeviceStore {
    store: DomainStore<Device>,
    rules: Arc<RuleStore>,
    split: Projection<Device, DeviceSplit>,
}

impl DeviceStore {
    pub fn new(deps: StoreDeps, rules: Arc<RuleStore>, device_types: &[String]) -> Self {
        let known: HashSet<String> = device_types.iter().cloned().collect();
        let split = Projection::new(move |records: &[&Device]| {
            let (devices, charts): (Vec<Device>, Vec<Device>) = records
                .iter()
                .map(|d| (*d).clone())
                .partition(|d| known.contains(&d.data.kind));
            DeviceSplit { devices, charts }
        });
        Self {
            store: DomainStore::new(Endpoint::project("devices"), deps),
            rules,
            split,
        }
    }

    pub fn store(&self) -> &DomainStore<Device> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Records whose type is a known device type.
    #[must_use]
    pub fn devices(&self) -> Vec<Device> {
        self.split.get(self.store.collection()).devices.clone()
    }

    /// Records of any other type.
    #[must_use]
    pub fn charts(&self) -> Vec<Device> {
        self.split.get(self.store.collection()).charts.clone()
    }

    /// Devices and charts placed in `room`.
    #[must_use]
    pub fn by_room(&self, room: &RecordId) -> Vec<Device> {
        sorted(
            self.store
                .filter(|d| d.collection_id.as_ref() == Some(room)),
        )
    }

    /// Favorite devices and charts.
    #[must_use]
    pub fn favorites(&self) -> Vec<Device> {
        sorted(self.store.filter(|d| d.favorite))
    }

    pub async fn create(&self, device: &Device) -> Option<Device> {
        self.store.create(device).await
    }

    pub async fn update(&self, device: &Device) -> Option<Device> {
        self.store.update(device).await
    }

    pub async fn add_favorite(&self, id: &RecordId) -> bool {
        self.set_favorite(id, true).await
    }

    pub async fn remove_favorite(&self, id: &RecordId) -> bool {
        self.set_favorite(id, false).await
    }

    async fn set_favorite(&self, id: &RecordId, favorite: bool) -> bool {
        match self.try_set_favorite(id, favorite).await {
            Ok(()) => {
                let name = self
                    .store
                    .get(id)
                    .map_or_else(|| id.to_string(), |d| d.name);
                let message = if favorite {
                    format!("'{name}' added to favorites")
                } else {
                    format!("'{name}' removed from favorites")
                };
                self.store.report(Report::success(message));
                true
            }
            Err(err) => {
                self.store.report_failure("favorite", &err);
                false
            }
        }
    }

    async fn try_set_favorite(&self, id: &RecordId, favorite: bool) -> Result<()> {
        let project = self
            .store
            .scope()
            .current()
            .ok_or(ConsoleError::NoProjectSelected)?;
        let path = format!("/projects/{project}/favorites/{id}");
        let request = if favorite {
            ApiRequest::put_empty(path)
        } else {
            ApiRequest::delete(path)
        };
        self.store.send::<serde_json::Value>(request).await?;

        if let Some(mut device) = self.store.get(id) {
            device.favorite = favorite;
            self.store.upsert(device);
        }
        Ok(())
    }

    /// Delete a device together with the warning and error rules attached
    /// to it.
    ///
    /// Rules are deleted first. If any rule deletion fails, the device is
    /// kept and a single error is reported.
    pub async fn delete_device(&self, id: &RecordId) -> bool {
        match self.try_delete_device(id).await {
            Ok(device) => {
                info!(device = %id, "Device deleted");
                self.store
                    .report(Report::success(format!("Device '{}' deleted", device.name)));
                true
            }
            Err(err) => {
                self.store.report_failure("delete", &err);
                false
            }
        }
    }

    async fn try_delete_device(&self, id: &RecordId) -> Result<Device> {
        let device = self.store.get(id).ok_or_else(|| ConsoleError::UnknownRecord {
            kind: "device",
            id: id.to_string(),
        })?;

        let rule_ids: Vec<RecordId> = device.data.meta.attached_rules().cloned().collect();
        if !rule_ids.is_empty() {
            debug!(device = %id, rules = rule_ids.len(), "Deleting attached rules");
            try_join_all(rule_ids.iter().map(|rule| self.rules.try_delete_rule(rule))).await?;
        }

        self.store.try_delete(id).await?;
        Ok(device)
    }
}

fn sorted(mut devices: Vec<Device>) -> Vec<Device> {
    devices.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
    devices
}

#[async_trait]
impl Bindable for DeviceStore {
    type Record = Device;

    async fn load(&self) -> LoadOutcome {
        DeviceStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Device> {
        &self.store
    }
}
