//! Console navigation menus.

use super::id::RecordId;

/// One menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavEntry {
    pub name: &'static str,
    pub locale: &'static str,
    pub path: String,
    pub icon: &'static str,
    /// Visible when the user holds at least one of these. Empty means always.
    pub requires_one_of: &'static [&'static str],
}

impl NavEntry {
    fn new(name: &'static str, locale: &'static str, path: String, icon: &'static str) -> Self {
        Self {
            name,
            locale,
            path,
            icon,
            requires_one_of: &[],
        }
    }

    fn requiring(mut self, permissions: &'static [&'static str]) -> Self {
        self.requires_one_of = permissions;
        self
    }

    /// Whether a user with `granted` permissions may see this entry.
    #[must_use]
    pub fn permitted<S: AsRef<str>>(&self, granted: &[S]) -> bool {
        self.requires_one_of.is_empty()
            || self
                .requires_one_of
                .iter()
                .any(|needed| granted.iter().any(|g| g.as_ref() == *needed))
    }
}

/// Top-level application menu.
#[must_use]
pub fn app_menu() -> Vec<NavEntry> {
    vec![
        NavEntry::new("Home", "navigation.appNavigation.home", "/".into(), "home"),
        NavEntry::new(
            "Billing",
            "navigation.appNavigation.billing",
            "/billing".into(),
            "billing",
        ),
        NavEntry::new(
            "Benchmarking",
            "navigation.appNavigation.benchmarking",
            "/benchmarking".into(),
            "fa-chart-column",
        ),
        NavEntry::new(
            "Documentation",
            "navigation.appNavigation.documentation",
            "/documentation".into(),
            "documentation",
        ),
        NavEntry::new(
            "Ticket",
            "navigation.appNavigation.ticket",
            "/ticket".into(),
            "ticket",
        ),
        NavEntry::new(
            "Playground",
            "navigation.appNavigation.playground",
            "/playground".into(),
            "fa-baseball-bat-ball",
        ),
    ]
}

/// Menu of a single project.
#[must_use]
pub fn project_menu(project: &RecordId) -> Vec<NavEntry> {
    let route = format!("/projects/{project}");
    vec![
        NavEntry::new(
            "Favorites",
            "navigation.appNavigation.favorites",
            format!("{route}/favorites"),
            "favourites",
        ),
        NavEntry::new(
            "Areas",
            "navigation.appNavigation.areas",
            format!("{route}/areas"),
            "areas",
        ),
        NavEntry::new(
            "AI/ML",
            "navigation.appNavigation.aiml",
            format!("{route}/aiml"),
            "aiml",
        ),
        NavEntry::new(
            "Variables",
            "navigation.appNavigation.variables",
            format!("{route}/variables"),
            "variables",
        ),
        NavEntry::new(
            "Workbench",
            "navigation.appNavigation.workbench",
            format!("{route}/workbench"),
            "workbench",
        )
        .requiring(&["writeDevice", "writeAI", "writeDataMapping"]),
        NavEntry::new(
            "Documents",
            "navigation.appNavigation.documents",
            format!("{route}/documents"),
            "documents",
        )
        .requiring(&["readDocument", "createDocument", "deleteDocument"]),
        NavEntry::new(
            "Rules",
            "navigation.appNavigation.rules",
            format!("{route}/rules"),
            "rules",
        )
        .requiring(&["createRule", "deleteRule", "writeRule", "readRule", "writeAI"]),
        NavEntry::new(
            "Report",
            "navigation.appNavigation.report",
            format!("{route}/Report"),
            "report",
        )
        .requiring(&["readReport", "writeReport", "deleteReport", "createReport"]),
        NavEntry::new(
            "Event list",
            "navigation.appNavigation.eventList",
            format!("{route}/eventlist"),
            "eventlist",
        )
        .requiring(&["writeAlert", "listAlert"]),
        NavEntry::new(
            "Settings",
            "navigation.appNavigation.settings",
            format!("{route}/settings"),
            "settings",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_without_requirements_are_always_permitted() {
        let menu = project_menu(&RecordId::new("p1"));
        let settings = menu.iter().find(|e| e.name == "Settings").unwrap();
        assert!(settings.permitted::<&str>(&[]));
        assert_eq!(settings.path, "/projects/p1/settings");
    }

    #[test]
    fn any_matching_permission_is_enough() {
        let menu = project_menu(&RecordId::new("p1"));
        let rules = menu.iter().find(|e| e.name == "Rules").unwrap();
        assert!(!rules.permitted(&["listAlert"]));
        assert!(rules.permitted(&["readRule"]));
    }
}
