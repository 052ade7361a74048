//! Event list store: one page of project alerts at a time.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{Alert, AlertPage, RecordId, Report};
use crate::error::{Error, Result};
use crate::port::ApiRequest;

/// Which page of the event list is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertQuery {
    pub page: u32,
    pub accepted: bool,
}

impl Default for AlertQuery {
    fn default() -> Self {
        Self {
            page: 1,
            accepted: false,
        }
    }
}

/// Alerts of the selected project.
///
/// The backend pages alerts; a load replaces the collection with one page.
/// Page loads queue on the gate of the underlying store. Callers asking for
/// the page already in flight share its request; any other page is fetched
/// once the running load is done. [`AlertStore::query`] always names the
/// page the collection holds.
pub struct AlertStore {
    store: DomainStore<Alert>,
    query: RwLock<AlertQuery>,
    total: RwLock<u64>,
    filter: RwLock<String>,
}

impl AlertStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(Endpoint::project("alerts"), deps),
            query: RwLock::new(AlertQuery::default()),
            total: RwLock::new(0),
            filter: RwLock::new(String::new()),
        }
    }

    pub fn store(&self) -> &DomainStore<Alert> {
        &self.store
    }

    /// Reload the current page.
    pub async fn load(&self) -> LoadOutcome {
        let query = *self.query.read();
        self.load_page(query.page, query.accepted).await
    }

    /// Load one page of alerts, filtered by acceptance on the backend.
    pub async fn load_page(&self, page: u32, accepted: bool) -> LoadOutcome {
        let (base, epoch) = match self.store.endpoint().base(self.store.scope()) {
            Ok(resolved) => resolved,
            Err(err) => {
                let err = Error::from(err);
                self.store.report_failure("load", &err);
                return LoadOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };
        let path = format!("{base}?page={page}&accepted={accepted}");

        let mut reported_total = None;
        let outcome = self
            .store
            .load_from((path, epoch), |value| {
                let page: AlertPage = serde_json::from_value(value)?;
                reported_total = Some(page.total);
                Ok(page.data)
            })
            .await;

        if let (LoadOutcome::Loaded { .. }, Some(total)) = (&outcome, reported_total) {
            *self.query.write() = AlertQuery { page, accepted };
            *self.total.write() = total;
        }
        outcome
    }

    #[must_use]
    pub fn query(&self) -> AlertQuery {
        *self.query.read()
    }

    /// Total number of alerts across all pages, as last reported.
    #[must_use]
    pub fn total(&self) -> u64 {
        *self.total.read()
    }

    pub fn set_filter(&self, text: &str) {
        *self.filter.write() = text.to_lowercase();
    }

    /// Alerts of the loaded page matching the filter text, newest first.
    #[must_use]
    pub fn filtered(&self) -> Vec<Alert> {
        let filter = self.filter.read().clone();
        let mut alerts = if filter.is_empty() {
            self.store.all()
        } else {
            self.store.filter(|a| a.search_text().contains(&filter))
        };
        alerts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        alerts
    }

    /// Whether the loaded page holds any alert that is not yet accepted.
    #[must_use]
    pub fn has_unaccepted(&self) -> bool {
        !self.store.filter(|a| !a.is_accepted()).is_empty()
    }

    /// Accept one alert and store the backend's updated version.
    pub async fn accept(&self, id: &RecordId) -> Option<Alert> {
        match self.try_accept(id).await {
            Ok(alert) => {
                self.store
                    .report(Report::success(format!("Alert '{}' accepted", alert.title)));
                Some(alert)
            }
            Err(err) => {
                self.store.report_failure("accept", &err);
                None
            }
        }
    }

    async fn try_accept(&self, id: &RecordId) -> Result<Alert> {
        let path = self.store.endpoint().item(self.store.scope(), id)?;
        let alert: Alert = self.store.send(ApiRequest::put_empty(path)).await?;
        self.store.upsert(alert.clone());
        Ok(alert)
    }

    /// Accept every alert of the project, then reload the current page.
    pub async fn accept_all(&self) -> bool {
        let result = async {
            let path = self.store.base_path()?;
            self.store.send::<Value>(ApiRequest::put_empty(path)).await
        }
        .await;

        match result {
            Ok(_) => {
                self.store.report(Report::success("All alerts accepted"));
                self.load().await;
                true
            }
            Err(err) => {
                self.store.report_failure("accept", &err);
                false
            }
        }
    }

    pub fn clear(&self) {
        self.store.clear();
        *self.query.write() = AlertQuery::default();
        *self.total.write() = 0;
        self.filter.write().clear();
    }
}

#[async_trait]
impl Bindable for AlertStore {
    type Record = Alert;

    async fn load(&self) -> LoadOutcome {
        AlertStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Alert> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::ProjectScope;
    use crate::testkit::fetch::ScriptedFetch;
    use crate::testkit::notifier::RecordingNotifier;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (AlertStore, Arc<ScriptedFetch>, RecordingNotifier) {
        let scope = Arc::new(ProjectScope::new());
        scope.select("p1".into());
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let deps = StoreDeps {
            scope,
            fetch: fetch.clone(),
            notifier: Arc::new(notifier.clone()),
        };
        (AlertStore::new(deps), fetch, notifier)
    }

    fn page() -> Value {
        json!({
            "page": 2,
            "total": 41,
            "data": [
                { "id": "a1", "title": "Overvoltage", "body": "Inverter West", "type": 2,
                  "accepted_at": null, "created_at": "2024-05-01T10:00:00Z" },
                { "id": "a2", "title": "Battery low", "body": "Storage", "type": 1,
                  "accepted_at": "2024-05-02T08:00:00Z", "created_at": "2024-05-02T07:00:00Z" }
            ]
        })
    }

    #[tokio::test]
    async fn loads_one_page_and_remembers_total() {
        let (alerts, fetch, _) = setup();
        fetch.respond("GET /projects/p1/alerts?page=2&accepted=false", page());

        assert_eq!(alerts.load_page(2, false).await.count(), Some(2));
        assert_eq!(alerts.total(), 41);
        assert_eq!(alerts.query(), AlertQuery { page: 2, accepted: false });
        assert!(alerts.has_unaccepted());
        assert_eq!(alerts.filtered()[0].id, RecordId::new("a2"));
    }

    #[tokio::test]
    async fn filter_matches_any_field() {
        let (alerts, fetch, _) = setup();
        fetch.respond("GET /projects/p1/alerts?page=1&accepted=false", page());
        alerts.load().await;

        alerts.set_filter("WEST");
        let ids: Vec<_> = alerts.filtered().into_iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![RecordId::new("a1")]);
    }

    #[tokio::test]
    async fn accept_replaces_alert_in_place() {
        let (alerts, fetch, _) = setup();
        fetch.respond("GET /projects/p1/alerts?page=1&accepted=false", page());
        fetch.respond(
            "PUT /projects/p1/alerts/a1",
            json!({ "id": "a1", "title": "Overvoltage", "accepted_at": "2024-05-03T09:00:00Z",
                    "accepted_by": "Operator" }),
        );
        alerts.load().await;

        let accepted = alerts.accept(&"a1".into()).await.expect("accepted");

        assert!(accepted.is_accepted());
        assert!(!alerts.has_unaccepted());
        assert_eq!(alerts.store().len(), 2);
    }

    #[tokio::test]
    async fn accept_all_reloads_current_page() {
        let (alerts, fetch, _) = setup();
        fetch.respond("GET /projects/p1/alerts?page=1&accepted=false", page());
        fetch.respond("PUT /projects/p1/alerts", Value::Null);
        alerts.load().await;

        assert!(alerts.accept_all().await);
        assert_eq!(fetch.calls("GET /projects/p1/alerts?page=1&accepted=false"), 2);
    }

    #[tokio::test]
    async fn failed_page_load_keeps_the_loaded_page() {
        let (alerts, fetch, notifier) = setup();
        fetch.respond("GET /projects/p1/alerts?page=1&accepted=false", page());
        alerts.load().await;

        assert!(alerts.load_page(3, false).await.is_failed());

        assert_eq!(alerts.query(), AlertQuery { page: 1, accepted: false });
        assert_eq!(alerts.total(), 41);
        assert_eq!(alerts.store().len(), 2);
        assert_eq!(notifier.error_count(), 1);
    }
}
