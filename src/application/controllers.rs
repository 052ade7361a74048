//! MPC controller store.
//!
//! Controllers are optimization instances (EMS, setpoint optimizers,
//! forecasting services) configured per project. Deployments without MPC
//! support disable the store in config; its loads are then skipped.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::try_join_all;
use serde_json::Value;
use tracing::debug;

use crate::application::rules::RuleStore;
use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{Controller, DeviceMeta, RecordId, Report};
use crate::error::{ConsoleError, Result};
use crate::infrastructure::config::ConsoleConfig;
use crate::port::ApiRequest;

/// Controllers of the selected project.
pub struct ControllerStore {
    store: DomainStore<Controller>,
    rules: Arc<RuleStore>,
    enabled: bool,
    ml_model_types: Vec<String>,
    offered_types: HashSet<String>,
}

impl ControllerStore {
    pub fn new(deps: StoreDeps, rules: Arc<RuleStore>, config: &ConsoleConfig) -> Self {
        Self {
            store: DomainStore::new(Endpoint::project("controllers"), deps),
            rules,
            enabled: config.load_mpc,
            ml_model_types: config.ml_model_types.clone(),
            offered_types: config.mpc_device_list.iter().cloned().collect(),
        }
    }

    pub fn store(&self) -> &DomainStore<Controller> {
        &self.store
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn load(&self) -> LoadOutcome {
        if !self.enabled {
            debug!("MPC loading disabled, skipping controllers");
            return LoadOutcome::Skipped;
        }
        self.store.load().await
    }

    /// Controllers whose type is a known ML model type.
    #[must_use]
    pub fn ml_models(&self) -> Vec<Controller> {
        let mut models = self
            .store
            .filter(|c| self.ml_model_types.iter().any(|t| *t == c.data.kind));
        models.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        models
    }

    #[must_use]
    pub fn favorites(&self) -> Vec<Controller> {
        let mut favorites = self.store.filter(|c| c.favorite);
        favorites.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        favorites
    }

    /// ML model types this deployment offers for new controllers, in the
    /// order they are known.
    #[must_use]
    pub fn available_types(&self) -> Vec<String> {
        self.ml_model_types
            .iter()
            .filter(|t| self.offered_types.contains(*t))
            .cloned()
            .collect()
    }

    /// Full controller document. Not cached.
    pub async fn fetch_data(&self, id: &RecordId) -> Option<Value> {
        let result = match self.store.endpoint().item(self.store.scope(), id) {
            Ok(path) => self.store.send(ApiRequest::get(path)).await,
            Err(err) => Err(err.into()),
        };
        match result {
            Ok(data) => Some(data),
            Err(err) => {
                self.store.report_failure("load", &err);
                None
            }
        }
    }

    pub async fn create(&self, controller: &Controller) -> Option<Controller> {
        self.store.create(controller).await
    }

    pub async fn update(&self, controller: &Controller) -> Option<Controller> {
        self.store.update(controller).await
    }

    pub async fn add_favorite(&self, id: &RecordId) -> bool {
        self.set_favorite(id, true).await
    }

    pub async fn remove_favorite(&self, id: &RecordId) -> bool {
        self.set_favorite(id, false).await
    }

    async fn set_favorite(&self, id: &RecordId, favorite: bool) -> bool {
        let result = async {
            let path = format!("{}/favorites", self.store.endpoint().item(self.store.scope(), id)?);
            let request = if favorite {
                ApiRequest::put_empty(path)
            } else {
                ApiRequest::delete(path)
            };
            self.store.send::<Value>(request).await?;
            if let Some(mut controller) = self.store.get(id) {
                controller.favorite = favorite;
                self.store.upsert(controller);
            }
            Ok::<_, crate::error::Error>(())
        }
        .await;

        match result {
            Ok(()) => {
                let verb = if favorite { "added to" } else { "removed from" };
                self.store
                    .report(Report::success(format!("Controller {verb} favorites")));
                true
            }
            Err(err) => {
                self.store.report_failure("favorite", &err);
                false
            }
        }
    }

    /// Delete a controller and every rule it created.
    pub async fn delete_controller(&self, id: &RecordId) -> bool {
        match self.try_delete_controller(id).await {
            Ok(controller) => {
                self.store.report(Report::success(format!(
                    "Controller '{}' deleted",
                    controller.name
                )));
                true
            }
            Err(err) => {
                self.store.report_failure("delete", &err);
                false
            }
        }
    }

    async fn try_delete_controller(&self, id: &RecordId) -> Result<Controller> {
        let controller = self.store.get(id).ok_or_else(|| ConsoleError::UnknownRecord {
            kind: "controller",
            id: id.to_string(),
        })?;

        let rule_ids = controller_rules(&controller.data.meta);
        debug!(controller = %id, rules = rule_ids.len(), "Deleting controller rules");
        try_join_all(rule_ids.iter().map(|rule| self.rules.try_delete_rule(rule))).await?;

        self.store.try_delete(id).await?;
        Ok(controller)
    }
}

/// Rules owned by a controller: its own warning/error rules, the rules of
/// each controlled system under `meta.rules`, and `meta.addional_rules`.
fn controller_rules(meta: &DeviceMeta) -> Vec<RecordId> {
    let mut rules: Vec<RecordId> = meta.attached_rules().cloned().collect();

    if let Some(Value::Object(systems)) = meta.extra.get("rules") {
        for system in systems.values() {
            for key in ["errorRule", "warningRule"] {
                if let Some(Value::String(id)) = system.get(key) {
                    rules.push(RecordId::new(id.as_str()));
                }
            }
        }
    }
    // Backend field name, misspelling included.
    if let Some(Value::Array(extra)) = meta.extra.get("addional_rules") {
        rules.extend(
            extra
                .iter()
                .filter_map(Value::as_str)
                .map(RecordId::new),
        );
    }

    rules.retain(|id| !id.as_str().is_empty());
    rules.sort();
    rules.dedup();
    rules
}

#[async_trait]
impl Bindable for ControllerStore {
    type Record = Controller;

    async fn load(&self) -> LoadOutcome {
        ControllerStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Controller> {
        &self.store
    }
}
