//! REST paths of a collection.

use super::scope::ProjectScope;
use crate::domain::RecordId;
use crate::error::ConsoleError;

/// Where a collection lives on the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    segment: &'static str,
    project_scoped: bool,
    list_suffix: Option<&'static str>,
}

impl Endpoint {
    /// Top-level collection, e.g. `/projects`.
    #[must_use]
    pub const fn global(segment: &'static str) -> Self {
        Self {
            segment,
            project_scoped: false,
            list_suffix: None,
        }
    }

    /// Collection below the selected project, e.g. `/projects/{p}/devices`.
    #[must_use]
    pub const fn project(segment: &'static str) -> Self {
        Self {
            segment,
            project_scoped: true,
            list_suffix: None,
        }
    }

    /// Path suffix or query appended to list requests only, e.g.
    /// `"/list?includeMappings=true"`.
    #[must_use]
    pub const fn with_list_suffix(mut self, suffix: &'static str) -> Self {
        self.list_suffix = Some(suffix);
        self
    }

    #[must_use]
    pub fn is_project_scoped(&self) -> bool {
        self.project_scoped
    }

    /// Base path of the collection, plus the scope epoch it was resolved at.
    ///
    /// # Errors
    ///
    /// [`ConsoleError::NoProjectSelected`] for a project-scoped endpoint
    /// with no selected project.
    pub fn base(&self, scope: &ProjectScope) -> Result<(String, u64), ConsoleError> {
        let (project, epoch) = scope.snapshot();
        if !self.project_scoped {
            return Ok((format!("/{}", self.segment), epoch));
        }
        let project = project.ok_or(ConsoleError::NoProjectSelected)?;
        Ok((format!("/projects/{project}/{}", self.segment), epoch))
    }

    /// Path used to load the whole collection.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::base`].
    pub fn list(&self, scope: &ProjectScope) -> Result<(String, u64), ConsoleError> {
        let (base, epoch) = self.base(scope)?;
        Ok(match self.list_suffix {
            Some(suffix) => (format!("{base}{suffix}"), epoch),
            None => (base, epoch),
        })
    }

    /// Path of a single record.
    ///
    /// # Errors
    ///
    /// See [`Endpoint::base`].
    pub fn item(&self, scope: &ProjectScope, id: &RecordId) -> Result<String, ConsoleError> {
        let (base, _) = self.base(scope)?;
        Ok(format!("{base}/{id}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_paths_ignore_scope() {
        let scope = ProjectScope::new();
        let endpoint = Endpoint::global("projects");
        assert_eq!(endpoint.list(&scope).unwrap().0, "/projects");
        assert_eq!(endpoint.item(&scope, &"p1".into()).unwrap(), "/projects/p1");
    }

    #[test]
    fn project_paths_require_selection() {
        let scope = ProjectScope::new();
        let endpoint = Endpoint::project("modules").with_list_suffix("/list?includeMappings=true");
        assert_eq!(endpoint.list(&scope), Err(ConsoleError::NoProjectSelected));

        scope.select("p1".into());
        assert_eq!(
            endpoint.list(&scope).unwrap().0,
            "/projects/p1/modules/list?includeMappings=true"
        );
        assert_eq!(
            endpoint.item(&scope, &"m1".into()).unwrap(),
            "/projects/p1/modules/m1"
        );
    }
}
