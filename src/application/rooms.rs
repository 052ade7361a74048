//! Room store. Rooms are called collections by the backend.

use async_trait::async_trait;
use serde_json::json;

use crate::application::store::{Bindable, DomainStore, Endpoint, LoadOutcome, StoreDeps};
use crate::domain::{RecordId, Room};

/// Rooms (areas) of the selected project.
pub struct RoomStore {
    store: DomainStore<Room>,
}

impl RoomStore {
    pub fn new(deps: StoreDeps) -> Self {
        Self {
            store: DomainStore::new(Endpoint::project("collections"), deps),
        }
    }

    pub fn store(&self) -> &DomainStore<Room> {
        &self.store
    }

    pub async fn load(&self) -> LoadOutcome {
        self.store.load().await
    }

    /// Rooms sorted by name.
    #[must_use]
    pub fn rooms(&self) -> Vec<Room> {
        let mut rooms = self.store.all();
        rooms.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        rooms
    }

    /// Create a room with an optional cover (an asset or icon path).
    pub async fn create_room(&self, name: &str, cover: Option<&str>) -> Option<Room> {
        let body = json!({
            "name": name,
            "meta": { "cover": cover },
        });
        self.store.create(&body).await
    }

    pub async fn update_room(&self, room: &Room) -> Option<Room> {
        self.store.update(room).await
    }

    pub async fn delete_room(&self, id: &RecordId) -> bool {
        self.store.delete(id).await
    }
}

#[async_trait]
impl Bindable for RoomStore {
    type Record = Room;

    async fn load(&self) -> LoadOutcome {
        RoomStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<Room> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::store::ProjectScope;
    use crate::testkit::fetch::ScriptedFetch;
    use crate::testkit::notifier::RecordingNotifier;
    use std::sync::Arc;

    #[tokio::test]
    async fn create_room_posts_name_and_cover() {
        let scope = Arc::new(ProjectScope::new());
        scope.select("p1".into());
        let fetch = Arc::new(ScriptedFetch::new());
        let notifier = RecordingNotifier::new();
        let rooms = RoomStore::new(StoreDeps {
            scope,
            fetch: fetch.clone(),
            notifier: Arc::new(notifier.clone()),
        });
        fetch.respond(
            "POST /projects/p1/collections",
            json!({ "id": "r1", "name": "Kitchen", "meta": { "cover": "/icons/kitchen.svg" } }),
        );

        let room = rooms.create_room("Kitchen", Some("/icons/kitchen.svg")).await;

        assert_eq!(room.map(|r| r.name), Some("Kitchen".to_string()));
        let body = fetch.requests()[0].body.clone().unwrap_or_default();
        assert_eq!(body["meta"]["cover"], "/icons/kitchen.svg");
        assert_eq!(rooms.rooms().len(), 1);
        assert_eq!(notifier.success_count(), 1);
    }
}
