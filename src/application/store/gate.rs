//! De-duplication of concurrent loads.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

use super::outcome::LoadOutcome;

/// The request a load answers: resolved path plus the scope epoch it was
/// resolved under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadKey {
    pub path: String,
    pub epoch: u64,
}

impl LoadKey {
    pub fn new(path: impl Into<String>, epoch: u64) -> Self {
        Self {
            path: path.into(),
            epoch,
        }
    }
}

/// Serializes loads of one collection and coalesces callers that queued up
/// behind a load already in flight.
///
/// A caller that finds a load running waits for it. If that load answered
/// the same [`LoadKey`] and was not discarded as stale, the caller receives
/// its outcome wrapped in [`LoadOutcome::Coalesced`] instead of issuing a
/// second request. Otherwise the caller runs its own load. A caller
/// arriving after the previous load finished starts a new one.
pub struct LoadGate {
    last: Mutex<Option<(LoadKey, LoadOutcome)>>,
    completed: AtomicU64,
}

impl LoadGate {
    #[must_use]
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
            completed: AtomicU64::new(0),
        }
    }

    pub async fn run<F, Fut>(&self, key: LoadKey, load: F) -> LoadOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = LoadOutcome>,
    {
        let observed = self.completed.load(Ordering::Acquire);
        let mut last = self.last.lock().await;

        if self.completed.load(Ordering::Acquire) != observed {
            if let Some((ran, outcome)) = last.as_ref() {
                if *ran == key && *outcome != LoadOutcome::Stale {
                    return LoadOutcome::Coalesced(Box::new(outcome.clone()));
                }
            }
        }

        let outcome = load().await;
        *last = Some((key, outcome.clone()));
        self.completed.fetch_add(1, Ordering::Release);
        outcome
    }

    /// Number of loads that actually ran.
    #[must_use]
    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::Acquire)
    }
}

impl Default for LoadGate {
    fn default() -> Self {
        Self::new()
    }
}
