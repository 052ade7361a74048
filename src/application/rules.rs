//! Rule store.

use async_trait::async_trait;
use tracing::debug;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{RecordId, Report, Rule};
use crate::error::Result;
use crate::port::ApiRequest;

/// Alerting and automation rules of the selected project.
pub struct RuleStore {
    store: DomainStore<Rule>,
}

impl RuleStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(Endpoint::project("rules"), deps),
        }
    }

    pub fn store(&self) -> &DomainStore<Rule> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Rules whose name contains `text`, ignoring case, sorted by name.
    #[must_use]
    pub fn filter_by_name(&self, text: &str) -> Vec<Rule> {
        let needle = text.to_lowercase();
        let mut rules = self
            .store
            .filter(|r| r.name.to_lowercase().contains(&needle));
        rules.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rules
    }

    pub async fn add_rule(&self, rule: &Rule) -> Option<Rule> {
        self.store.create(rule).await
    }

    /// Create several rules with one request.
    ///
    /// # Errors
    ///
    /// Transport, decode or scope errors. Nothing is reported.
    pub async fn try_add_rules(&self, rules: &[Rule]) -> Result<Vec<Rule>> {
        let path = self.store.base_path()?;
        let created: Vec<Rule> = self.store.send(ApiRequest::post(path, rules)?).await?;
        for rule in &created {
            self.store.upsert(rule.clone());
        }
        debug!(count = created.len(), "Rules created");
        Ok(created)
    }

    /// Create several rules with one request and report the result.
    pub async fn add_rules(&self, rules: &[Rule]) -> Vec<Rule> {
        match self.try_add_rules(rules).await {
            Ok(created) => {
                self.store
                    .report(Report::success(format!("{} rules created", created.len())));
                created
            }
            Err(err) => {
                self.store.report_failure("create", &err);
                Vec::new()
            }
        }
    }

    pub async fn update_rule(&self, rule: &Rule) -> Option<Rule> {
        self.store.update(rule).await
    }

    /// Delete a rule without reporting, for composite actions.
    ///
    /// # Errors
    ///
    /// Transport or scope errors.
    pub async fn try_delete_rule(&self, id: &RecordId) -> Result<Option<Rule>> {
        self.store.try_delete(id).await
    }

    pub async fn delete_rule(&self, id: &RecordId) -> bool {
        self.store.delete(id).await
    }
}

#[async_trait]
impl Bindable for RuleStore {
    type Record = Rule;

    async fn load(&self) -> LoadOutcome {
        RuleStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Rule> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::ProjectScope;
    use crate::error::ApiError;
    use crate::testkit::fetch::ScriptedFetch;
    use crate::testkit::notifier::RecordingNotifier;
    use serde_json::json;
    use std::sync::Arc;

    fn setup() -> (RuleStore, Arc<ScriptedFetch>, RecordingNotifier) {
        let scope = Arc::new(ProjectScope::new());
        scope.select("p1".into());
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let deps = StoreDeps {
            scope,
            fetch: fetch.clone(),
            notifier: Arc::new(notifier.clone()),
        };
        (RuleStore::new(deps), fetch, notifier)
    }

    #[tokio::test]
    async fn add_rules_upserts_every_created_rule() {
        let (rules, fetch, notifier) = setup();
        fetch.respond(
            "POST /projects/p1/rules",
            json!([{ "id": "r1", "name": "warn" }, { "id": "r2", "name": "error" }]),
        );

        let created = rules
            .add_rules(&[Rule::new("", "warn"), Rule::new("", "error")])
            .await;

        assert_eq!(created.len(), 2);
        assert_eq!(rules.store().len(), 2);
        assert_eq!(notifier.success_count(), 1);
    }

    #[tokio::test]
    async fn failed_delete_keeps_the_rule() {
        let (rules, fetch, notifier) = setup();
        rules.store().upsert(Rule::new("r1", "warn"));
        fetch.fail(
            "DELETE /projects/p1/rules/r1",
            ApiError::from_status(500, String::new()),
        );

        assert!(!rules.delete_rule(&"r1".into()).await);
        assert!(rules.store().get(&"r1".into()).is_some());
        assert_eq!(notifier.error_count(), 1);
    }
}
