//! Project members and the permissions granted to them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RecordId;
use super::record::Record;

/// Scope value that grants a permission on every resource of a project.
pub const WILDCARD_SCOPE: &str = "*";

/// A permission as the backend describes it, optionally bound to one
/// resource through `scope_reference`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub scope_reference: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Permission {
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            scope: None,
            scope_reference: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn scoped_to(mut self, reference: impl Into<String>) -> Self {
        self.scope_reference = Some(reference.into());
        self
    }

    #[must_use]
    pub fn wildcard(mut self) -> Self {
        self.scope = Some(WILDCARD_SCOPE.to_string());
        self
    }

    /// Whether this grant applies to the resource `scope_id`.
    #[must_use]
    pub fn covers(&self, scope_id: &str) -> bool {
        self.scope.as_deref() == Some(WILDCARD_SCOPE)
            || self.scope_reference.as_deref() == Some(scope_id)
    }
}

impl Record for Permission {
    const KIND: &'static str = "permission";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

/// A user's membership in a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub permissions: Vec<Permission>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Member {
    pub fn new(id: impl Into<RecordId>, role: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: None,
            role: role.into(),
            permissions: Vec::new(),
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p.id.as_str() == permission)
    }

    /// Whether the member holds `permission` on `scope_id`, directly or
    /// through a wildcard grant.
    #[must_use]
    pub fn has_scoped_permission(&self, permission: &str, scope_id: &str) -> bool {
        self.permissions
            .iter()
            .any(|p| p.id.as_str() == permission && p.covers(scope_id))
    }
}

impl Record for Member {
    const KIND: &'static str = "member";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> &str {
        if self.name.is_empty() {
            self.id.as_str()
        } else {
            &self.name
        }
    }
}

/// Body of a request granting permissions to a member. Without the wildcard
/// the grant is limited to `scopes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PermissionGrant {
    pub permissions: Vec<String>,
    pub wildcard: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scopes: Option<Vec<String>>,
}

impl PermissionGrant {
    pub fn wildcard<S: Into<String>>(permissions: impl IntoIterator<Item = S>) -> Self {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            wildcard: true,
            scopes: None,
        }
    }

    pub fn scoped<S: Into<String>, T: Into<String>>(
        permissions: impl IntoIterator<Item = S>,
        scopes: impl IntoIterator<Item = T>,
    ) -> Self {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
            wildcard: false,
            scopes: Some(scopes.into_iter().map(Into::into).collect()),
        }
    }
}
