//! Member store: who belongs to the selected project, and in which role.

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::debug;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{Member, RecordId};
use crate::error::Result;
use crate::port::ApiRequest;

/// Role given to users added to a project.
pub const DEFAULT_ROLE: &str = "projectUser";

/// Members of the selected project, plus the member record of the signed-in
/// user with its permissions.
pub struct MemberStore {
    store: DomainStore<Member>,
    current: RwLock<Option<Member>>,
}

impl MemberStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(Endpoint::project("members"), deps),
            current: RwLock::new(None),
        }
    }

    pub fn store(&self) -> &DomainStore<Member> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Members sorted by name, then id.
    #[must_use]
    pub fn members(&self) -> Vec<Member> {
        let mut members = self.store.all();
        members.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        members
    }

    /// Add the user `user_id` to the project with the default role.
    pub async fn add_member(&self, user_id: &RecordId) -> Option<Member> {
        self.store
            .create(&json!({ "id": user_id, "role": DEFAULT_ROLE }))
            .await
    }

    /// Change a member's role. Only the role is sent; the local record is
    /// replaced by `member` once the backend accepts it.
    pub async fn update_member(&self, member: &Member) -> bool {
        match self.try_update_role(member).await {
            Ok(()) => {
                self.store.upsert(member.clone());
                self.store.report_success("updated", member);
                true
            }
            Err(err) => {
                self.store.report_failure("update", &err);
                false
            }
        }
    }

    async fn try_update_role(&self, member: &Member) -> Result<()> {
        let path = self.store.endpoint().item(self.store.scope(), &member.id)?;
        self.store
            .send::<Value>(ApiRequest::put(path, &json!({ "role": member.role }))?)
            .await?;
        Ok(())
    }

    pub async fn remove_member(&self, id: &RecordId) -> bool {
        self.store.delete(id).await
    }

    /// Fetch the member record of the signed-in user, permissions included.
    /// It is kept apart from the member list.
    pub async fn fetch_current(&self, user_id: &RecordId) -> Option<Member> {
        let result = async {
            let path = self.store.endpoint().item(self.store.scope(), user_id)?;
            self.store.send::<Member>(ApiRequest::get(path)).await
        }
        .await;

        match result {
            Ok(member) => {
                debug!(
                    member = %member.id,
                    permissions = member.permissions.len(),
                    "Current member loaded"
                );
                *self.current.write() = Some(member.clone());
                Some(member)
            }
            Err(err) => {
                self.store.report_failure("load", &err);
                None
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<Member> {
        self.current.read().clone()
    }

    /// Whether the signed-in user holds `permission` in this project.
    /// `false` until [`MemberStore::fetch_current`] succeeded.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|m| m.has_permission(permission))
    }

    #[must_use]
    pub fn has_scoped_permission(&self, permission: &str, scope_id: &str) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|m| m.has_scoped_permission(permission, scope_id))
    }

    pub fn clear(&self) {
        self.store.clear();
        *self.current.write() = None;
    }
}

#[async_trait]
impl Bindable for MemberStore {
    type Record = Member;

    async fn load(&self) -> LoadOutcome {
        MemberStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Member> {
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
    use std::sync::Arc;

    fn setup() -> (MemberStore, Arc<ScriptedFetch>, RecordingNotifier) {
        let scope = Arc::new(ProjectScope::new());
        scope.select("p1".into());
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let deps = StoreDeps {
            scope,
            fetch: fetch.clone(),
            notifier: Arc::new(notifier.clone()),
        };
        (MemberStore::new(deps), fetch, notifier)
    }

    #[tokio::test]
    async fn add_member_posts_default_role() {
        let (members, fetch, notifier) = setup();
        fetch.respond(
            "POST /projects/p1/members",
            json!({ "id": "u7", "name": "Ada", "role": "projectUser" }),
        );

        let member = members.add_member(&"u7".into()).await;

        assert_eq!(member.map(|m| m.name), Some("Ada".to_string()));
        let body = fetch.requests()[0].body.clone().unwrap_or_default();
        assert_eq!(body, json!({ "id": "u7", "role": "projectUser" }));
        assert_eq!(members.members().len(), 1);
        assert_eq!(notifier.success_count(), 1);
    }

    #[tokio::test]
    async fn update_sends_only_the_role() {
        let (members, fetch, _) = setup();
        members.store().upsert(Member::new("u7", "projectUser"));
        fetch.respond("PUT /projects/p1/members/u7", Value::Null);

        let promoted = Member::new("u7", "projectAdmin");
        assert!(members.update_member(&promoted).await);

        let body = fetch.requests()[0].body.clone().unwrap_or_default();
        assert_eq!(body, json!({ "role": "projectAdmin" }));
        assert_eq!(
            members.store().get(&"u7".into()).map(|m| m.role),
            Some("projectAdmin".to_string())
        );
    }

    #[tokio::test]
    async fn failed_update_keeps_the_old_role() {
        let (members, fetch, notifier) = setup();
        members.store().upsert(Member::new("u7", "projectUser"));
        fetch.fail(
            "PUT /projects/p1/members/u7",
            ApiError::from_status(400, String::new()),
        );

        assert!(!members.update_member(&Member::new("u7", "projectAdmin")).await);

        assert_eq!(
            members.store().get(&"u7".into()).map(|m| m.role),
            Some("projectUser".to_string())
        );
        assert_eq!(notifier.error_count(), 1);
    }

    #[tokio::test]
    async fn current_member_answers_permission_checks() {
        let (members, fetch, _) = setup();
        assert!(!members.has_permission("readRule"));
        fetch.respond(
            "GET /projects/p1/members/u1",
            json!({
                "id": "u1",
                "role": "projectUser",
                "permissions": [
                    { "id": "readRule", "scope": "*" },
                    { "id": "readDevice", "scope_reference": "d1" }
                ]
            }),
        );

        members.fetch_current(&"u1".into()).await;

        assert!(members.has_permission("readRule"));
        assert!(members.has_scoped_permission("readDevice", "d1"));
        assert!(!members.has_scoped_permission("readDevice", "d2"));
        assert!(members.store().is_empty());

        members.clear();
        assert!(members.current().is_none());
    }
}
