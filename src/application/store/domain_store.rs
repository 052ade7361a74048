//! Generic store for one domain collection.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::collection::{Collection, CollectionChange};
use super::endpoint::Endpoint;
use super::gate::{LoadGate, LoadKey};
use super::outcome::LoadOutcome;
use super::scope::ProjectScope;
use crate::domain::{LoadState, Record, RecordId, Report};
use crate::error::{ApiError, Error, Result};
use crate::port::{fetch_json, ApiRequest, Event, Notifier, RemoteFetch};

/// Collaborators shared by every store of a context.
#[derive(Clone)]
pub struct StoreDeps {
    pub scope: Arc<ProjectScope>,
    pub fetch: Arc<dyn RemoteFetch>,
    pub notifier: Arc<dyn Notifier>,
}

/// Single source of truth for one domain collection.
///
/// Reads are served from the local [`Collection`]. `load()` replaces it from
/// the backend; the write actions (`create`, `update`, `delete`) perform the
/// remote write first and then patch the local mapping, so local state only
/// ever reflects what the backend accepted.
///
/// Every action reports its failure through the notifier and returns a
/// neutral value instead of an error. The `try_*` variants are silent and
/// return the error; they exist for composite actions that report once.
pub struct DomainStore<R: Record> {
    collection: Collection<R>,
    gate: LoadGate,
    endpoint: Endpoint,
    deps: StoreDeps,
}

impl<R: Record> DomainStore<R> {
    pub fn new(endpoint: Endpoint, deps: StoreDeps) -> Self {
        Self {
            collection: Collection::new(),
            gate: LoadGate::new(),
            endpoint,
            deps,
        }
    }

    /// Load the full collection from the backend.
    ///
    /// Concurrent calls for the same path and project share one request. On
    /// failure the collection and its load state are left exactly as they
    /// were, and one error report is emitted.
    pub async fn load(&self) -> LoadOutcome {
        self.load_with(|value| serde_json::from_value::<Vec<R>>(value)).await
    }

    /// Load with a custom response decoder, for endpoints that wrap the
    /// record list (e.g. paginated responses).
    pub async fn load_with<D>(&self, decode: D) -> LoadOutcome
    where
        D: FnOnce(Value) -> serde_json::Result<Vec<R>>,
    {
        let path = match self.endpoint.list(&self.deps.scope) {
            Ok(path) => path,
            Err(err) => return self.fail_load(err.into()),
        };
        self.load_from(path, decode).await
    }

    /// Load from an explicit path (list path plus query parameters).
    pub(crate) async fn load_from<D>(&self, (path, epoch): (String, u64), decode: D) -> LoadOutcome
    where
        D: FnOnce(Value) -> serde_json::Result<Vec<R>>,
    {
        let key = LoadKey::new(path.as_str(), epoch);
        self.gate
            .run(key, || async move {
                match self.replace_from(&path, epoch, decode).await {
                    Ok(Some(count)) => LoadOutcome::Loaded { count },
                    Ok(None) => LoadOutcome::Stale,
                    Err(err) => self.fail_load(err),
                }
            })
            .await
    }

    async fn replace_from<D>(&self, path: &str, epoch: u64, decode: D) -> Result<Option<usize>>
    where
        D: FnOnce(Value) -> serde_json::Result<Vec<R>>,
    {
        let previous = self.collection.begin_load();
        debug!(collection = R::KIND, path, "Loading collection");

        let records = self
            .deps
            .fetch
            .fetch(ApiRequest::get(path))
            .await
            .and_then(|value| decode(value).map_err(|e| ApiError::Decode(e.to_string())));

        let records = match records {
            Ok(records) => records,
            Err(err) => {
                self.collection.abort_load(previous);
                return Err(err.into());
            }
        };

        if self.deps.scope.epoch() != epoch {
            self.collection.abort_load(previous);
            debug!(collection = R::KIND, path, "Discarding response for deselected project");
            return Ok(None);
        }

        let count = self.collection.replace(records);
        self.deps.notifier.notify(Event::CollectionLoaded {
            kind: R::KIND,
            count,
        });
        Ok(Some(count))
    }

    fn fail_load(&self, err: Error) -> LoadOutcome {
        self.report_failure("load", &err);
        LoadOutcome::Failed {
            reason: err.to_string(),
        }
    }

    /// Fetch a single record and upsert it.
    ///
    /// # Errors
    ///
    /// Transport, decode or scope errors. Nothing is reported.
    pub async fn try_fetch_one(&self, id: &RecordId) -> Result<R> {
        let path = self.endpoint.item(&self.deps.scope, id)?;
        let record: R = fetch_json(self.deps.fetch.as_ref(), ApiRequest::get(path)).await?;
        self.collection.upsert(record.clone());
        Ok(record)
    }

    /// Create a record from `body` and add the backend's answer.
    ///
    /// # Errors
    ///
    /// Transport, decode or scope errors. Nothing is reported.
    pub async fn try_create<B: Serialize + ?Sized>(&self, body: &B) -> Result<R> {
        let (path, _) = self.endpoint.base(&self.deps.scope)?;
        let record: R = fetch_json(self.deps.fetch.as_ref(), ApiRequest::post(path, body)?).await?;
        self.collection.upsert(record.clone());
        Ok(record)
    }

    /// Write `record` back and store the backend's answer.
    ///
    /// # Errors
    ///
    /// Transport, decode or scope errors. Nothing is reported.
    pub async fn try_update(&self, record: &R) -> Result<R> {
        let path = self.endpoint.item(&self.deps.scope, record.id())?;
        let updated: R = fetch_json(self.deps.fetch.as_ref(), ApiRequest::put(path, record)?).await?;
        self.collection.upsert(updated.clone());
        Ok(updated)
    }

    /// Delete a record remotely, then locally.
    ///
    /// # Errors
    ///
    /// Transport or scope errors. Nothing is reported.
    pub async fn try_delete(&self, id: &RecordId) -> Result<Option<R>> {
        let path = self.endpoint.item(&self.deps.scope, id)?;
        self.deps.fetch.fetch(ApiRequest::delete(path)).await?;
        Ok(self.collection.remove(id))
    }

    /// Create a record and report the result.
    pub async fn create<B: Serialize + ?Sized>(&self, body: &B) -> Option<R> {
        match self.try_create(body).await {
            Ok(record) => {
                self.report_success("created", &record);
                Some(record)
            }
            Err(err) => {
                self.report_failure("create", &err);
                None
            }
        }
    }

    /// Update a record and report the result.
    pub async fn update(&self, record: &R) -> Option<R> {
        match self.try_update(record).await {
            Ok(record) => {
                self.report_success("updated", &record);
                Some(record)
            }
            Err(err) => {
                self.report_failure("update", &err);
                None
            }
        }
    }

    /// Delete a record and report the result. Returns whether the backend
    /// accepted the deletion.
    pub async fn delete(&self, id: &RecordId) -> bool {
        match self.try_delete(id).await {
            Ok(removed) => {
                let name = removed.as_ref().map_or(id.as_str(), |r| r.label());
                self.report(Report::success(format!("{} '{name}' deleted", title(R::KIND))));
                true
            }
            Err(err) => {
                self.report_failure("delete", &err);
                false
            }
        }
    }

    /// Issue an arbitrary API call and decode the answer.
    ///
    /// # Errors
    ///
    /// Transport or decode errors. Nothing is reported.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        Ok(fetch_json(self.deps.fetch.as_ref(), request).await?)
    }

    /// Base path of the collection under the current scope.
    ///
    /// # Errors
    ///
    /// [`crate::error::ConsoleError::NoProjectSelected`] for project-scoped
    /// collections without a selection.
    pub fn base_path(&self) -> Result<String> {
        Ok(self.endpoint.base(&self.deps.scope)?.0)
    }

    pub fn report(&self, report: Report) {
        self.deps.notifier.notify(Event::Report(report));
    }

    pub(crate) fn report_success(&self, action: &str, record: &R) {
        self.report(Report::success(format!(
            "{} '{}' {action}",
            title(R::KIND),
            record.label()
        )));
    }

    pub(crate) fn report_failure(&self, action: &str, err: &Error) {
        warn!(collection = R::KIND, action, error = %err, "Store action failed");
        self.report(Report::error(err.to_string()));
    }

    pub fn scope(&self) -> &ProjectScope {
        &self.deps.scope
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn collection(&self) -> &Collection<R> {
        &self.collection
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<R> {
        self.collection.get(id)
    }

    #[must_use]
    pub fn all(&self) -> Vec<R> {
        self.collection.all()
    }

    pub fn filter(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.collection.filter(predicate)
    }

    pub fn upsert(&self, record: R) -> Option<R> {
        self.collection.upsert(record)
    }

    pub fn remove(&self, id: &RecordId) -> Option<R> {
        self.collection.remove(id)
    }

    pub fn clear(&self) {
        self.collection.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.collection.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.collection.load_state()
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.collection.revision()
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChange> {
        self.collection.subscribe()
    }

    /// Number of loads that actually reached the backend.
    #[must_use]
    pub fn loads_completed(&self) -> u64 {
        self.gate.completed()
    }
}

fn title(kind: &str) -> String {
    let mut chars = kind.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
