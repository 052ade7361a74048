//! Loads racing each other and racing project switches.

use std::time::Duration;

use console_store::application::store::LoadOutcome;
use console_store::domain::{LoadState, RecordId};
use console_store::testkit::context::TestConsole;
use console_store::testkit::domain;
use serde_json::json;
use tokio_test::{assert_pending, task};

const DELAY: Duration = Duration::from_millis(50);

#[tokio::test]
async fn concurrent_loads_share_one_request() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console.fetch.respond(
        "GET /projects/p1/rules",
        json!([domain::rule("r1", "warn"), domain::rule("r2", "error")]),
    );
    let rules = console.context.rules();

    let (a, b, c) = tokio::join!(rules.load(), rules.load(), rules.load());

    assert_eq!(console.fetch.calls("GET /projects/p1/rules"), 1);
    for outcome in [&a, &b, &c] {
        assert_eq!(outcome.count(), Some(2));
    }
    let coalesced = [&a, &b, &c]
        .iter()
        .filter(|o| matches!(o, LoadOutcome::Coalesced(_)))
        .count();
    assert_eq!(coalesced, 2);
    assert_eq!(rules.store().len(), 2);
    assert_eq!(rules.store().loads_completed(), 1);
}

#[tokio::test]
async fn load_stays_pending_while_the_request_is_in_flight() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console
        .fetch
        .respond("GET /projects/p1/collections", json!([domain::room("a", "Hall")]));
    let rooms = console.context.rooms();

    let mut load = task::spawn(rooms.load());
    assert_pending!(load.poll());
    assert_eq!(rooms.store().load_state(), LoadState::Loading);

    assert!(load.await.is_loaded());
    assert!(rooms.store().load_state().is_loaded());
}

#[tokio::test]
async fn response_for_a_deselected_project_is_discarded() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console.fetch.respond(
        "GET /projects/p1/devices",
        json!([domain::device("d1", "PVSystem", "r1", (None, None))]),
    );
    let devices = console.context.devices();

    let (outcome, ()) = tokio::join!(devices.load(), async {
        tokio::time::sleep(DELAY / 5).await;
        console.context.projects().select("p2".into());
    });

    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(devices.store().is_empty());
    assert_eq!(devices.store().load_state(), LoadState::Unloaded);
    assert_eq!(console.notifier.error_count(), 0);
}

#[tokio::test]
async fn clearing_the_session_discards_loads_in_flight() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console
        .fetch
        .respond("GET /projects/p1/measurements", json!({ "soc": 40 }));
    let measurements = console.context.measurements();

    let (outcome, ()) = tokio::join!(measurements.load(), async {
        tokio::time::sleep(DELAY / 5).await;
        console.context.clear();
    });

    assert_eq!(outcome, LoadOutcome::Stale);
    assert!(measurements.is_empty());
}

#[tokio::test]
async fn load_after_switching_projects_fetches_the_new_project() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console.fetch.respond(
        "GET /projects/p1/devices",
        json!([domain::device("d1", "PVSystem", "r1", (None, None))]),
    );
    console.fetch.respond(
        "GET /projects/p2/devices",
        json!([domain::device("d7", "Battery", "r4", (None, None))]),
    );
    let devices = console.context.devices();

    let (first, second) = tokio::join!(devices.load(), async {
        tokio::time::sleep(DELAY / 5).await;
        console.context.projects().select("p2".into());
        devices.load().await
    });

    assert_eq!(first, LoadOutcome::Stale);
    assert_eq!(second, LoadOutcome::Loaded { count: 1 });
    assert_eq!(console.fetch.calls("GET /projects/p2/devices"), 1);
    let ids: Vec<_> = devices.store().all().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec![RecordId::from("d7")]);
}

#[tokio::test]
async fn concurrent_loads_of_the_same_alert_page_share_one_request() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console.fetch.respond(
        "GET /projects/p1/alerts?page=1&accepted=false",
        domain::alert_page(1, 3, &[domain::alert("a1", "Overvoltage", false)]),
    );
    let alerts = console.context.alerts();

    let (first, second) = tokio::join!(alerts.load(), alerts.load());

    assert!(first.is_loaded());
    assert!(matches!(second, LoadOutcome::Coalesced(_)));
    assert_eq!(
        console.fetch.calls("GET /projects/p1/alerts?page=1&accepted=false"),
        1
    );
    assert_eq!(alerts.total(), 3);
}

#[tokio::test]
async fn another_alert_page_requested_mid_load_is_fetched_and_shown() {
    let console = TestConsole::delayed(DELAY);
    console.select("p1");
    console.fetch.respond(
        "GET /projects/p1/alerts?page=1&accepted=false",
        domain::alert_page(1, 3, &[domain::alert("a1", "Overvoltage", false)]),
    );
    console.fetch.respond(
        "GET /projects/p1/alerts?page=2&accepted=false",
        domain::alert_page(2, 3, &[domain::alert("a2", "Battery low", false)]),
    );
    let alerts = console.context.alerts();

    let (first, second) = tokio::join!(alerts.load_page(1, false), async {
        tokio::time::sleep(DELAY / 5).await;
        alerts.load_page(2, false).await
    });

    assert_eq!(first, LoadOutcome::Loaded { count: 1 });
    assert_eq!(second, LoadOutcome::Loaded { count: 1 });
    assert_eq!(
        console.fetch.calls("GET /projects/p1/alerts?page=2&accepted=false"),
        1
    );
    assert_eq!(alerts.query().page, 2);
    let ids: Vec<_> = alerts.filtered().into_iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![RecordId::from("a2")]);
}

#[tokio::test]
async fn sequential_loads_after_completion_fetch_again() {
    let console = TestConsole::new();
    console.select("p1");
    console
        .fetch
        .respond("GET /projects/p1/rules", json!([domain::rule("r1", "warn")]));
    let rules = console.context.rules();

    assert!(!matches!(rules.load().await, LoadOutcome::Coalesced(_)));
    assert!(!matches!(rules.load().await, LoadOutcome::Coalesced(_)));
    assert_eq!(console.fetch.calls("GET /projects/p1/rules"), 2);
}
