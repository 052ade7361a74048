//! Behavioral properties of a single domain store.

use std::sync::Arc;

use console_store::application::store::{
    Binding, CollectionChange, DomainStore, Endpoint, LoadOutcome, ProjectScope, Projection,
    StoreDeps,
};
use console_store::domain::{LoadState, Record, RecordId, ReportLevel, Room};
use console_store::error::ApiError;
use console_store::testkit::domain;
use console_store::testkit::fetch::ScriptedFetch;
use console_store::testkit::notifier::RecordingNotifier;
use serde_json::json;

fn rooms_store() -> (Arc<DomainStore<Room>>, Arc<ScriptedFetch>, RecordingNotifier) {
    let scope = Arc::new(ProjectScope::new());
    scope.select("p1".into());
    let fetch = Arc::new(ScriptedFetch::new());
    let notifier = RecordingNotifier::new();
    let deps = StoreDeps {
        scope,
        fetch: fetch.clone(),
        notifier: Arc::new(notifier.clone()),
    };
    let store = Arc::new(DomainStore::new(Endpoint::project("collections"), deps));
    (store, fetch, notifier)
}

const ROUTE: &str = "GET /projects/p1/collections";

#[tokio::test]
async fn every_key_matches_the_embedded_id() {
    let (store, fetch, _) = rooms_store();
    fetch.respond(
        ROUTE,
        json!([domain::room("r1", "Kitchen"), domain::room("r2", "Cellar")]),
    );

    assert_eq!(store.load().await, LoadOutcome::Loaded { count: 2 });

    for room in store.all() {
        assert_eq!(store.get(room.id()).as_ref(), Some(&room));
    }
    assert!(store.load_state().is_loaded());
}

#[tokio::test]
async fn get_returns_what_was_upserted_and_nothing_after_remove() {
    let (store, _, _) = rooms_store();
    let room = Room::new("r9", "Attic");

    store.upsert(room.clone());
    assert_eq!(store.get(&"r9".into()), Some(room));

    store.remove(&"r9".into());
    assert_eq!(store.get(&"r9".into()), None);
}

#[tokio::test]
async fn identical_responses_yield_identical_state() {
    let (store, fetch, _) = rooms_store();
    fetch.respond(ROUTE, json!([domain::room("r1", "Kitchen")]));

    store.load().await;
    let first = store.all();
    store.load().await;

    assert_eq!(store.all(), first);
    assert_eq!(fetch.calls(ROUTE), 2);
}

#[tokio::test]
async fn reload_drops_records_missing_from_the_response() {
    let (store, fetch, _) = rooms_store();
    fetch.enqueue(
        ROUTE,
        json!([domain::room("r1", "Kitchen"), domain::room("r2", "Cellar")]),
    );
    fetch.respond(ROUTE, json!([domain::room("r2", "Cellar")]));

    store.load().await;
    store.load().await;

    assert_eq!(store.len(), 1);
    assert!(store.get(&RecordId::new("r1")).is_none());
}

#[tokio::test]
async fn failed_load_keeps_prior_state_and_reports_once() {
    let (store, fetch, notifier) = rooms_store();
    fetch.enqueue(ROUTE, json!([domain::room("r1", "Kitchen")]));
    fetch.fail(ROUTE, ApiError::from_status(500, "boom".into()));

    store.load().await;
    let before = store.all();
    let state_before = store.load_state();

    assert!(store.load().await.is_failed());
    assert_eq!(store.all(), before);
    assert_eq!(store.load_state(), state_before);

    let errors: Vec<_> = notifier
        .reports()
        .into_iter()
        .filter(|r| r.level == ReportLevel::Error)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].message,
        "The server encountered an error. Please try again later."
    );
}

#[tokio::test]
async fn first_failed_load_stays_unloaded() {
    let (store, fetch, _) = rooms_store();
    fetch.fail(ROUTE, ApiError::Network("connection refused".into()));

    assert!(store.load().await.is_failed());
    assert_eq!(store.load_state(), LoadState::Unloaded);
}

#[tokio::test]
async fn wrong_shape_is_a_decode_failure() {
    let (store, fetch, notifier) = rooms_store();
    fetch.respond(ROUTE, json!({ "rooms": [] }));

    assert!(store.load().await.is_failed());
    assert!(store.is_empty());
    assert_eq!(notifier.error_count(), 1);
}

#[tokio::test]
async fn writes_update_the_collection_and_report_success() {
    let (store, fetch, notifier) = rooms_store();
    fetch.respond("POST /projects/p1/collections", domain::room("r5", "Garage"));
    fetch.respond("PUT /projects/p1/collections/r5", domain::room("r5", "Workshop"));
    fetch.respond("DELETE /projects/p1/collections/r5", serde_json::Value::Null);

    let created = store.create(&json!({ "name": "Garage" })).await.expect("created");
    assert_eq!(store.get(&created.id).map(|r| r.name), Some("Garage".into()));

    let mut renamed = created.clone();
    renamed.name = "Workshop".into();
    store.update(&renamed).await.expect("updated");
    assert_eq!(store.get(&created.id).map(|r| r.name), Some("Workshop".into()));

    assert!(store.delete(&created.id).await);
    assert!(store.is_empty());
    assert_eq!(notifier.success_count(), 3);
}

#[tokio::test]
async fn failed_write_leaves_local_state_untouched() {
    let (store, fetch, notifier) = rooms_store();
    store.upsert(Room::new("r1", "Kitchen"));
    fetch.fail(
        "PUT /projects/p1/collections/r1",
        ApiError::from_status(400, "name required".into()),
    );

    let edited = Room::new("r1", "");
    assert!(store.update(&edited).await.is_none());

    assert_eq!(store.get(&"r1".into()).map(|r| r.name), Some("Kitchen".into()));
    assert_eq!(notifier.error_count(), 1);
}

#[tokio::test]
async fn project_scoped_load_without_selection_fails() {
    let fetch = Arc::new(ScriptedFetch::new());
    let notifier = RecordingNotifier::new();
    let deps = StoreDeps {
        scope: Arc::new(ProjectScope::new()),
        fetch: fetch.clone(),
        notifier: Arc::new(notifier.clone()),
    };
    let store: DomainStore<Room> = DomainStore::new(Endpoint::project("collections"), deps);

    let outcome = store.load().await;

    assert_eq!(
        outcome,
        LoadOutcome::Failed {
            reason: "no project selected".into()
        }
    );
    assert!(fetch.requests().is_empty());
    assert_eq!(notifier.error_count(), 1);
}

#[tokio::test]
async fn projection_recomputes_only_after_mutation() {
    let (store, fetch, _) = rooms_store();
    fetch.respond(ROUTE, json!([domain::room("r1", "Kitchen")]));
    store.load().await;

    let names = Projection::new(|rooms: &[&Room]| {
        let mut names: Vec<String> = rooms.iter().map(|r| r.name.clone()).collect();
        names.sort();
        names
    });

    let first = names.get(store.collection());
    let again = names.get(store.collection());
    assert!(Arc::ptr_eq(&first, &again));

    store.upsert(Room::new("r2", "Attic"));
    let after = names.get(store.collection());
    assert!(!Arc::ptr_eq(&first, &after));
    assert_eq!(*after, vec!["Attic".to_string(), "Kitchen".to_string()]);
}

#[tokio::test]
async fn binding_loads_once_and_sees_later_changes() {
    let (store, fetch, _) = rooms_store();
    fetch.respond(ROUTE, json!([domain::room("r1", "Kitchen")]));

    let mut binding = Binding::mount(Arc::clone(&store));

    assert!(binding.ready().await.is_loaded());
    assert_eq!(binding.changed().await, Some(CollectionChange::Replaced { count: 1 }));
    assert_eq!(binding.records().len(), 1);

    store.upsert(Room::new("r2", "Attic"));
    assert_eq!(
        binding.changed().await,
        Some(CollectionChange::Upserted("r2".into()))
    );
    assert!(binding.get(&"r2".into()).is_some());
    assert_eq!(fetch.calls(ROUTE), 1);
}
