//! Menus the console shows, narrowed by deployment config and permissions.

use crate::domain::navigation::{app_menu, project_menu};
use crate::domain::{NavEntry, RecordId};
use crate::infrastructure::config::ConsoleConfig;

/// Menu entries visible in this deployment.
pub struct Navigation {
    main_entries: Vec<String>,
    project_entries: Vec<String>,
}

impl Navigation {
    #[must_use]
    pub fn new(config: &ConsoleConfig) -> Self {
        Self {
            main_entries: config.main_menu_entries.clone(),
            project_entries: config.project_menu_entries.clone(),
        }
    }

    /// Application menu entries enabled by config.
    #[must_use]
    pub fn app_menu(&self) -> Vec<NavEntry> {
        app_menu()
            .into_iter()
            .filter(|e| self.main_entries.iter().any(|name| name == e.name))
            .collect()
    }

    /// Menu of `project` for a user holding `granted` permissions.
    #[must_use]
    pub fn project_menu<S: AsRef<str>>(&self, project: &RecordId, granted: &[S]) -> Vec<NavEntry> {
        project_menu(project)
            .into_iter()
            .filter(|e| self.project_entries.iter().any(|name| name == e.name))
            .filter(|e| e.permitted(granted))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_and_permissions_both_narrow_project_menu() {
        let config = ConsoleConfig {
            project_menu_entries: vec!["Favorites".into(), "Rules".into(), "Settings".into()],
            ..ConsoleConfig::default()
        };
        let navigation = Navigation::new(&config);

        let names: Vec<_> = navigation
            .project_menu(&"p1".into(), &["listAlert"])
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Favorites", "Settings"]);

        let names: Vec<_> = navigation
            .project_menu(&"p1".into(), &["readRule"])
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Favorites", "Rules", "Settings"]);
    }

    #[test]
    fn app_menu_follows_config() {
        let navigation = Navigation::new(&ConsoleConfig::default());
        let names: Vec<_> = navigation.app_menu().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Home", "Documentation"]);
    }
}
