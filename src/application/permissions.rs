//! Permission store: the permission catalog, grants per project member and
//! the platform permissions of the signed-in user.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{json, Value};
use tracing::debug;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{Permission, PermissionGrant, RecordId};
use crate::error::{Error, Result};
use crate::port::ApiRequest;

const PLATFORM_PATH: &str = "/users/me/permissions";
const GROUPS_PATH: &str = "/permissions/groups";

/// Every permission the platform knows (`/permissions`) plus the derived
/// state around it.
///
/// The catalog, the groups and the platform permissions are not bound to a
/// project and survive [`PermissionStore::clear`]. Member grants and
/// possible scopes belong to the selected project.
pub struct PermissionStore {
    catalog: DomainStore<Permission>,
    groups: RwLock<Vec<String>>,
    platform: RwLock<Option<Vec<Permission>>>,
    by_member: RwLock<HashMap<RecordId, Vec<Permission>>>,
    scopes: RwLock<Vec<Value>>,
}

impl PermissionStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            catalog: DomainStore::new(Endpoint::global("permissions"), deps),
            groups: RwLock::new(Vec::new()),
            platform: RwLock::new(None),
            by_member: RwLock::new(HashMap::new()),
            scopes: RwLock::new(Vec::new()),
        }
    }

    pub fn store(&self) -> &DomainStore<Permission> {
        &self.catalog
    }

    /// Load the permission catalog.
    pub async fn load(&self) -> LoadOutcome {
        self.catalog.load().await
    }

    /// Catalog entries sorted by id.
    #[must_use]
    pub fn permissions(&self) -> Vec<Permission> {
        let mut permissions = self.catalog.all();
        permissions.sort_by(|a, b| a.id.cmp(&b.id));
        permissions
    }

    pub async fn load_groups(&self) -> bool {
        match self
            .catalog
            .send::<Vec<String>>(ApiRequest::get(GROUPS_PATH))
            .await
        {
            Ok(groups) => {
                *self.groups.write() = groups;
                true
            }
            Err(err) => {
                self.catalog.report_failure("load", &err);
                false
            }
        }
    }

    #[must_use]
    pub fn groups(&self) -> Vec<String> {
        self.groups.read().clone()
    }

    /// Load the platform permissions of the signed-in user.
    pub async fn load_platform(&self) -> LoadOutcome {
        match self
            .catalog
            .send::<Vec<Permission>>(ApiRequest::get(PLATFORM_PATH))
            .await
        {
            Ok(permissions) => {
                let count = permissions.len();
                debug!(count, "Platform permissions loaded");
                *self.platform.write() = Some(permissions);
                LoadOutcome::Loaded { count }
            }
            Err(err) => {
                self.catalog.report_failure("load", &err);
                LoadOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }

    /// `false` until the platform permissions were loaded.
    #[must_use]
    pub fn has_platform_permission(&self, permission: &str) -> bool {
        self.platform
            .read()
            .as_ref()
            .is_some_and(|granted| granted.iter().any(|p| p.id.as_str() == permission))
    }

    /// Ids of the platform permissions, empty until loaded.
    #[must_use]
    pub fn platform_ids(&self) -> Vec<String> {
        self.platform
            .read()
            .iter()
            .flatten()
            .map(|p| p.id.to_string())
            .collect()
    }

    fn member_path(&self, member: &RecordId) -> Result<String> {
        let (base, _) = Endpoint::project("members").base(self.catalog.scope())?;
        Ok(format!("{base}/{member}/permissions"))
    }

    pub async fn load_for_member(&self, member: &RecordId) -> bool {
        match self.try_load_for_member(member).await {
            Ok(_) => true,
            Err(err) => {
                self.catalog.report_failure("load", &err);
                false
            }
        }
    }

    async fn try_load_for_member(&self, member: &RecordId) -> Result<usize> {
        let path = self.member_path(member)?;
        let permissions: Vec<Permission> = self.catalog.send(ApiRequest::get(path)).await?;
        let count = permissions.len();
        self.by_member.write().insert(member.clone(), permissions);
        Ok(count)
    }

    /// Permissions granted to `member`, empty until loaded.
    #[must_use]
    pub fn for_member(&self, member: &RecordId) -> Vec<Permission> {
        self.by_member.read().get(member).cloned().unwrap_or_default()
    }

    /// Grant permissions to a member. The backend answers with the member's
    /// full grant list, which replaces the local one.
    pub async fn grant(&self, member: &RecordId, grant: &PermissionGrant) -> bool {
        let result = async {
            let path = self.member_path(member)?;
            let permissions: Vec<Permission> =
                self.catalog.send(ApiRequest::post(path, grant)?).await?;
            Ok::<_, Error>(permissions)
        }
        .await;

        match result {
            Ok(permissions) => {
                self.by_member.write().insert(member.clone(), permissions);
                true
            }
            Err(err) => {
                self.catalog.report_failure("create", &err);
                false
            }
        }
    }

    /// Revoke one permission on one scope, then reload the member's grants.
    pub async fn revoke(&self, member: &RecordId, permission: &str, scope: &str) -> bool {
        let result = async {
            let path = self.member_path(member)?;
            let body = json!({ "permission": permission, "scope_id": scope });
            self.catalog
                .send::<Value>(ApiRequest::delete_with(path, &body)?)
                .await?;
            self.try_load_for_member(member).await
        }
        .await;

        match result {
            Ok(_) => true,
            Err(err) => {
                self.catalog.report_failure("delete", &err);
                false
            }
        }
    }

    /// Resources of the selected project `permission` can be scoped to.
    pub async fn load_scopes(&self, permission: &RecordId) -> bool {
        let result = async {
            let (base, _) = Endpoint::project("permissions").base(self.catalog.scope())?;
            let path = format!("{base}/{permission}/scopes");
            self.catalog.send::<Vec<Value>>(ApiRequest::get(path)).await
        }
        .await;

        match result {
            Ok(scopes) => {
                *self.scopes.write() = scopes;
                true
            }
            Err(err) => {
                self.catalog.report_failure("load", &err);
                false
            }
        }
    }

    #[must_use]
    pub fn scopes(&self) -> Vec<Value> {
        self.scopes.read().clone()
    }

    /// Forget project-bound state: member grants and possible scopes.
    pub fn clear(&self) {
        self.by_member.write().clear();
        self.scopes.write().clear();
    }

    /// Forget everything, platform permissions and the catalog included.
    pub fn reset(&self) {
        self.clear();
        self.catalog.clear();
        self.groups.write().clear();
        *self.platform.write() = None;
    }
}

#[async_trait]
impl Bindable for PermissionStore {
    type Record = Permission;

    async fn load(&self) -> LoadOutcome {
        PermissionStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Permission> {
        &self.catalog
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

    fn setup() -> (PermissionStore, Arc<ScriptedFetch>, RecordingNotifier) {
        let scope = Arc::new(ProjectScope::new());
        scope.select("p1".into());
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let deps = StoreDeps {
            scope,
            fetch: fetch.clone(),
            notifier: Arc::new(notifier.clone()),
        };
        (PermissionStore::new(deps), fetch, notifier)
    }

    #[tokio::test]
    async fn platform_permissions_answer_checks_once_loaded() {
        let (permissions, fetch, _) = setup();
        fetch.respond(
            "GET /users/me/permissions",
            json!([{ "id": "createProject" }, { "id": "readBilling" }]),
        );
        assert!(!permissions.has_platform_permission("createProject"));

        assert_eq!(permissions.load_platform().await, LoadOutcome::Loaded { count: 2 });

        assert!(permissions.has_platform_permission("createProject"));
        assert!(!permissions.has_platform_permission("deleteProject"));
        assert_eq!(permissions.platform_ids(), vec!["createProject", "readBilling"]);
    }

    #[tokio::test]
    async fn failed_platform_load_is_reported() {
        let (permissions, fetch, notifier) = setup();
        fetch.fail(
            "GET /users/me/permissions",
            ApiError::from_status(401, String::new()),
        );

        assert!(permissions.load_platform().await.is_failed());
        assert!(permissions.platform_ids().is_empty());
        assert_eq!(notifier.error_count(), 1);
    }

    #[tokio::test]
    async fn grant_replaces_member_permissions_with_answer() {
        let (permissions, fetch, _) = setup();
        fetch.respond(
            "POST /projects/p1/members/u1/permissions",
            json!([{ "id": "readDevice", "scope_reference": "d1" }]),
        );

        let grant = PermissionGrant::scoped(["readDevice"], ["d1"]);
        assert!(permissions.grant(&"u1".into(), &grant).await);

        let granted = permissions.for_member(&"u1".into());
        assert_eq!(granted.len(), 1);
        assert!(granted[0].covers("d1"));
        assert_eq!(
            fetch.requests()[0].body,
            Some(json!({ "permissions": ["readDevice"], "wildcard": false, "scopes": ["d1"] }))
        );
    }

    #[tokio::test]
    async fn revoke_sends_scope_and_reloads_member() {
        let (permissions, fetch, _) = setup();
        fetch.respond("DELETE /projects/p1/members/u1/permissions", Value::Null);
        fetch.respond("GET /projects/p1/members/u1/permissions", json!([]));

        assert!(permissions.revoke(&"u1".into(), "readDevice", "d1").await);

        let requests = fetch.requests();
        assert_eq!(
            requests[0].body,
            Some(json!({ "permission": "readDevice", "scope_id": "d1" }))
        );
        assert_eq!(fetch.calls("GET /projects/p1/members/u1/permissions"), 1);
        assert!(permissions.for_member(&"u1".into()).is_empty());
    }

    #[tokio::test]
    async fn clear_keeps_catalog_groups_and_platform_grants() {
        let (permissions, fetch, _) = setup();
        fetch.respond("GET /permissions", json!([{ "id": "readRule", "name": "Read rules" }]));
        fetch.respond("GET /permissions/groups", json!(["rules", "devices"]));
        fetch.respond("GET /users/me/permissions", json!([{ "id": "createProject" }]));
        fetch.respond(
            "GET /projects/p1/permissions/readRule/scopes",
            json!([{ "id": "r1", "name": "warn" }]),
        );
        fetch.respond(
            "GET /projects/p1/members/u1/permissions",
            json!([{ "id": "readRule", "scope": "*" }]),
        );

        permissions.load().await;
        assert!(permissions.load_groups().await);
        permissions.load_platform().await;
        assert!(permissions.load_scopes(&"readRule".into()).await);
        assert!(permissions.load_for_member(&"u1".into()).await);
        permissions.clear();

        assert_eq!(permissions.permissions().len(), 1);
        assert_eq!(permissions.groups(), vec!["rules", "devices"]);
        assert!(permissions.has_platform_permission("createProject"));
        assert!(permissions.scopes().is_empty());
        assert!(permissions.for_member(&"u1".into()).is_empty());
    }
}
