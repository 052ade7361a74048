//! Project store: the project list, the selected project and its settings.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::info;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{Project, RecordId, Report};
use crate::error::{ConsoleError, Result};
use crate::port::ApiRequest;

/// Projects visible to the user plus the project selection.
///
/// Selecting a project moves the shared [`ProjectScope`] that every
/// project-scoped store resolves its paths against.
///
/// [`ProjectScope`]: crate::application::store::ProjectScope
pub struct ProjectStore {
    store: DomainStore<Project>,
    documents: RwLock<Vec<Value>>,
}

impl ProjectStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(Endpoint::global("projects"), deps),
            documents: RwLock::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &DomainStore<Project> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Make `id` the selected project. Project-scoped loads still in flight
    /// for the previous selection are discarded when they return.
    pub fn select(&self, id: RecordId) {
        info!(project = %id, "Selecting project");
        self.store.scope().select(id);
    }

    #[must_use]
    pub fn selected_id(&self) -> Option<RecordId> {
        self.store.scope().current()
    }

    /// The selected project, if it is known locally.
    #[must_use]
    pub fn selected(&self) -> Option<Project> {
        self.selected_id().and_then(|id| self.store.get(&id))
    }

    /// Fetch a single project, store it and select it.
    pub async fn load_project(&self, id: &RecordId) -> Option<Project> {
        match self.store.try_fetch_one(id).await {
            Ok(project) => {
                self.select(project.id.clone());
                Some(project)
            }
            Err(err) => {
                self.store.report_failure("load", &err);
                None
            }
        }
    }

    /// Projects whose name contains `text`, ignoring case, sorted by name.
    #[must_use]
    pub fn filter_by_name(&self, text: &str) -> Vec<Project> {
        let needle = text.to_lowercase();
        let mut projects = self
            .store
            .filter(|p| p.name.to_lowercase().contains(&needle));
        projects.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        projects
    }

    pub async fn create(&self, project: &Project) -> Option<Project> {
        self.store.create(project).await
    }

    pub async fn update(&self, project: &Project) -> Option<Project> {
        self.store.update(project).await
    }

    pub async fn delete(&self, id: &RecordId) -> bool {
        self.store.delete(id).await
    }

    /// Operating hours of the selected project, as stored by the backend.
    pub async fn operating_hours(&self) -> Option<Value> {
        let result = self.get_setting("operating-hours").await;
        self.reported(result)
    }

    /// Save operating hours, then reload the project so its settings are
    /// current.
    pub async fn post_operating_hours(&self, body: &Value) -> Option<Value> {
        let result = self.post_setting("operating-hours", body).await;
        self.reported(result)
    }

    pub async fn holidays(&self) -> Option<Value> {
        let result = self.get_setting("holidays").await;
        self.reported(result)
    }

    /// Save holidays, then reload the project.
    pub async fn post_holidays(&self, body: &Value) -> bool {
        let result = self.post_setting("holidays", body).await;
        self.reported(result).is_some()
    }

    /// Documents of the selected project. The list is kept until the session
    /// is cleared.
    pub async fn documents(&self) -> Vec<Value> {
        let result = self.get_setting("documents").await.map(|value| match value {
            Value::Array(items) => items,
            Value::Null => Vec::new(),
            other => vec![other],
        });
        match result {
            Ok(documents) => {
                self.documents.write().clone_from(&documents);
                documents
            }
            Err(err) => {
                self.store.report_failure("load documents", &err);
                Vec::new()
            }
        }
    }

    /// Documents from the last successful [`ProjectStore::documents`] call.
    #[must_use]
    pub fn cached_documents(&self) -> Vec<Value> {
        self.documents.read().clone()
    }

    /// Forget everything tied to the selected project.
    pub fn clear_selection(&self) {
        self.documents.write().clear();
    }

    fn selected_path(&self, segment: &str) -> Result<String> {
        let project = self.selected_id().ok_or(ConsoleError::NoProjectSelected)?;
        Ok(format!("/projects/{project}/{segment}"))
    }

    async fn get_setting(&self, segment: &str) -> Result<Value> {
        let path = self.selected_path(segment)?;
        self.store.send(ApiRequest::get(path)).await
    }

    async fn post_setting(&self, segment: &str, body: &Value) -> Result<Value> {
        let path = self.selected_path(segment)?;
        let response: Value = self.store.send(ApiRequest::post(path, body)?).await?;
        if let Some(project) = self.selected_id() {
            self.store.try_fetch_one(&project).await?;
        }
        Ok(response)
    }

    fn reported<T>(&self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.store.report_failure("settings", &err);
                None
            }
        }
    }

    pub fn report(&self, report: Report) {
        self.store.report(report);
    }
}

#[async_trait]
impl Bindable for ProjectStore {
    type Record = Project;

    async fn load(&self) -> LoadOutcome {
        ProjectStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Project> {
        &self.store
    }
}
