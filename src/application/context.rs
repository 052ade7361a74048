//! The store context: every domain store of one console session.
//!
//! Built once at startup and shared by `Arc`. All stores resolve project
//! paths against one [`ProjectScope`] and report through one notifier.

use std::sync::Arc;

use tracing::info;

use super::alerts::AlertStore;
use super::controllers::ControllerStore;
use super::devices::DeviceStore;
use super::measurements::MeasurementStore;
use super::members::MemberStore;
use super::modules::ModuleStore;
use super::navigation::Navigation;
use super::permissions::PermissionStore;
use super::projects::ProjectStore;
use super::rooms::RoomStore;
use super::rules::RuleStore;
use super::store::{LoadOutcome, ProjectScope, StoreDeps};
use crate::domain::{NavEntry, RecordId};
use crate::infrastructure::config::ConsoleConfig;
use crate::port::{Event, Notifier, RemoteFetch};

/// Outcome of loading one project-scoped collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionLoad {
    pub collection: &'static str,
    pub outcome: LoadOutcome,
}

pub struct ConsoleContext {
    deps: StoreDeps,
    projects: Arc<ProjectStore>,
    devices: Arc<DeviceStore>,
    controllers: Arc<ControllerStore>,
    rules: Arc<RuleStore>,
    rooms: Arc<RoomStore>,
    modules: Arc<ModuleStore>,
    measurements: Arc<MeasurementStore>,
    alerts: Arc<AlertStore>,
    members: Arc<MemberStore>,
    permissions: Arc<PermissionStore>,
    navigation: Navigation,
}

impl ConsoleContext {
    pub fn new(
        fetch: Arc<dyn RemoteFetch>,
        notifier: Arc<dyn Notifier>,
        config: &ConsoleConfig,
    ) -> Self {
        let deps = StoreDeps {
            scope: Arc::new(ProjectScope::new()),
            fetch,
            notifier,
        };
        let rules = Arc::new(RuleStore::new(deps.clone()));

        Self {
            projects: Arc::new(ProjectStore::new(deps.clone())),
            devices: Arc::new(DeviceStore::new(
                deps.clone(),
                Arc::clone(&rules),
                &config.device_types,
            )),
            controllers: Arc::new(ControllerStore::new(deps.clone(), Arc::clone(&rules), config)),
            rooms: Arc::new(RoomStore::new(deps.clone())),
            modules: Arc::new(ModuleStore::new(deps.clone())),
            measurements: Arc::new(MeasurementStore::new(deps.clone())),
            alerts: Arc::new(AlertStore::new(deps.clone())),
            members: Arc::new(MemberStore::new(deps.clone())),
            permissions: Arc::new(PermissionStore::new(deps.clone())),
            navigation: Navigation::new(config),
            rules,
            deps,
        }
    }

    pub fn scope(&self) -> &ProjectScope {
        &self.deps.scope
    }

    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.deps.notifier
    }

    pub fn projects(&self) -> &Arc<ProjectStore> {
        &self.projects
    }

    pub fn devices(&self) -> &Arc<DeviceStore> {
        &self.devices
    }

    pub fn controllers(&self) -> &Arc<ControllerStore> {
        &self.controllers
    }

    pub fn rules(&self) -> &Arc<RuleStore> {
        &self.rules
    }

    pub fn rooms(&self) -> &Arc<RoomStore> {
        &self.rooms
    }

    pub fn modules(&self) -> &Arc<ModuleStore> {
        &self.modules
    }

    pub fn measurements(&self) -> &Arc<MeasurementStore> {
        &self.measurements
    }

    pub fn alerts(&self) -> &Arc<AlertStore> {
        &self.alerts
    }

    pub fn members(&self) -> &Arc<MemberStore> {
        &self.members
    }

    pub fn permissions(&self) -> &Arc<PermissionStore> {
        &self.permissions
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Menu of the selected project for the signed-in user: platform
    /// permissions plus those of the user's membership. Empty without a
    /// selected project.
    #[must_use]
    pub fn project_menu(&self) -> Vec<NavEntry> {
        let Some(project) = self.scope().current() else {
            return Vec::new();
        };
        let mut granted = self.permissions.platform_ids();
        if let Some(member) = self.members.current() {
            granted.extend(member.permissions.iter().map(|p| p.id.to_string()));
        }
        self.navigation.project_menu(&project, &granted)
    }

    /// Select a project and load every project-scoped collection
    /// concurrently.
    ///
    /// Returns `None` if the project itself could not be loaded; the
    /// failure has been reported.
    pub async fn open_project(&self, id: &RecordId) -> Option<Vec<CollectionLoad>> {
        if self.scope().current().as_ref() != Some(id) {
            self.clear();
        }
        self.projects.load_project(id).await?;

        let (devices, controllers, rules, rooms, modules, measurements, alerts, members) =
            tokio::join!(
                self.devices.load(),
                self.controllers.load(),
                self.rules.load(),
                self.rooms.load(),
                self.modules.load(),
                self.measurements.load(),
                self.alerts.load(),
                self.members.load(),
            );

        Some(vec![
            CollectionLoad { collection: "devices", outcome: devices },
            CollectionLoad { collection: "controllers", outcome: controllers },
            CollectionLoad { collection: "rules", outcome: rules },
            CollectionLoad { collection: "rooms", outcome: rooms },
            CollectionLoad { collection: "modules", outcome: modules },
            CollectionLoad { collection: "measurements", outcome: measurements },
            CollectionLoad { collection: "alerts", outcome: alerts },
            CollectionLoad { collection: "members", outcome: members },
        ])
    }

    /// Delete a room, then every device and controller placed in it.
    ///
    /// Returns whether the room and all of its contents were deleted. A
    /// failed child delete is reported and does not stop the others.
    pub async fn delete_room(&self, id: &RecordId) -> bool {
        if !self.rooms.delete_room(id).await {
            return false;
        }

        let mut all_deleted = true;
        for device in &self.devices.by_room(id) {
            all_deleted &= self.devices.delete_device(&device.id).await;
        }
        let controllers = self
            .controllers
            .store()
            .filter(|c| c.collection_id.as_ref() == Some(id));
        for controller in &controllers {
            all_deleted &= self.controllers.delete_controller(&controller.id).await;
        }
        all_deleted
    }

    /// Leave the selected project: deselect it and empty every
    /// project-scoped store. Loads still in flight are discarded when they
    /// return. The project list itself is kept.
    pub fn clear(&self) {
        self.deps.scope.clear();
        self.devices.store().clear();
        self.controllers.store().clear();
        self.rules.store().clear();
        self.rooms.store().clear();
        self.modules.store().clear();
        self.measurements.clear();
        self.alerts.clear();
        self.members.clear();
        self.permissions.clear();
        self.projects.clear_selection();
        self.deps.notifier.notify(Event::SessionCleared);
    }

    /// End the session: leave the project and drop the project list and the
    /// permission catalog too. Calling it again is a no-op apart from the
    /// log line.
    pub fn shutdown(&self) {
        self.clear();
        self.projects.store().clear();
        self.permissions.reset();
        info!("Console context shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LoadState;
    use crate::testkit::fetch::ScriptedFetch;
    use crate::testkit::notifier::RecordingNotifier;
    use serde_json::json;

    #[tokio::test]
    async fn clear_resets_project_scoped_stores_only() {
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let context = ConsoleContext::new(
            fetch.clone(),
            Arc::new(notifier.clone()),
            &ConsoleConfig::default(),
        );
        fetch.respond("GET /projects", json!([{ "id": "p1", "name": "Plant" }]));
        fetch.respond("GET /projects/p1/rules", json!([{ "id": "r1", "name": "warn" }]));

        context.projects().load().await;
        context.projects().select("p1".into());
        context.rules().load().await;
        context.clear();

        assert_eq!(context.scope().current(), None);
        assert!(context.rules().store().is_empty());
        assert_eq!(context.rules().store().load_state(), LoadState::Unloaded);
        assert_eq!(context.projects().store().len(), 1);
        assert!(notifier.events().contains(&Event::SessionCleared));
    }

    #[tokio::test]
    async fn project_menu_joins_platform_and_member_permissions() {
        let fetch = Arc::new(ScriptedFetch::new());
        let config = ConsoleConfig {
            project_menu_entries: vec!["Favorites".into(), "Rules".into(), "Workbench".into()],
            ..ConsoleConfig::default()
        };
        let context = ConsoleContext::new(
            fetch.clone(),
            Arc::new(RecordingNotifier::new()),
            &config,
        );
        assert!(context.project_menu().is_empty());

        fetch.respond("GET /users/me/permissions", json!([{ "id": "writeDevice" }]));
        fetch.respond(
            "GET /projects/p1/members/u1",
            json!({ "id": "u1", "role": "projectUser", "permissions": [{ "id": "readRule", "scope": "*" }] }),
        );
        context.scope().select("p1".into());
        context.permissions().load_platform().await;
        context.members().fetch_current(&"u1".into()).await;

        let names: Vec<_> = context.project_menu().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Favorites", "Workbench", "Rules"]);

        context.clear();
        context.scope().select("p1".into());
        let names: Vec<_> = context.project_menu().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Favorites", "Workbench"]);
    }

    #[tokio::test]
    async fn shutdown_drops_project_list() {
        let fetch = Arc::new(ScriptedFetch::new());
        let context = ConsoleContext::new(
            fetch.clone(),
            Arc::new(RecordingNotifier::new()),
            &ConsoleConfig::default(),
        );
        fetch.respond("GET /projects", json!([{ "id": "p1", "name": "Plant" }]));
        context.projects().load().await;

        context.shutdown();
        context.shutdown();

        assert!(context.projects().store().is_empty());
        assert_eq!(context.projects().store().load_state(), LoadState::Unloaded);
    }
}
