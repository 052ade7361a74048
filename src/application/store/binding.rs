//! View binding: what a mounted view holds on to.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::debug;

use super::collection::CollectionChange;
use super::domain_store::DomainStore;
use super::outcome::LoadOutcome;
use crate::domain::{LoadState, Record, RecordId};

/// Something a view can mount: a store with its own notion of loading.
///
/// Domain stores that page, or that a deployment can disable, override
/// `load` while sharing the underlying [`DomainStore`].
#[async_trait]
pub trait Bindable: Send + Sync + 'static {
    type Record: Record;

    async fn load(&self) -> LoadOutcome;

    fn domain_store(&self) -> &DomainStore<Self::Record>;
}

#[async_trait]
impl<R: Record> Bindable for DomainStore<R> {
    type Record = R;

    async fn load(&self) -> LoadOutcome {
        DomainStore::load(self).await
    }

    fn domain_store(&self) -> &DomainStore<R> {
        self
    }
}

/// A mounted view of one store.
///
/// Mounting triggers exactly one `load()` on a background task and
/// subscribes to changes before doing so, so no change after the mount is
/// missed. Dropping the binding does not cancel the request; it completes
/// and updates the store for every other view.
pub struct Binding<S: Bindable> {
    source: Arc<S>,
    changes: broadcast::Receiver<CollectionChange>,
    mount: Option<JoinHandle<LoadOutcome>>,
    outcome: Option<LoadOutcome>,
}

impl<S: Bindable> Binding<S> {
    /// Mount a view. Must be called from within a tokio runtime.
    pub fn mount(source: Arc<S>) -> Self {
        let changes = source.domain_store().subscribe();
        let loader = Arc::clone(&source);
        let mount = tokio::spawn(async move { loader.load().await });
        debug!(collection = <S::Record as Record>::KIND, "View mounted");
        Self {
            source,
            changes,
            mount: Some(mount),
            outcome: None,
        }
    }

    /// Wait for the mount load to finish.
    pub async fn ready(&mut self) -> LoadOutcome {
        if let Some(handle) = self.mount.take() {
            let outcome = handle.await.unwrap_or_else(|err| LoadOutcome::Failed {
                reason: err.to_string(),
            });
            self.outcome = Some(outcome);
        }
        self.outcome.clone().unwrap_or(LoadOutcome::Skipped)
    }

    /// Wait for the next change. `None` once the store is gone.
    ///
    /// If this view fell behind the change stream it resumes from the most
    /// recent change; the records themselves are always read fresh.
    pub async fn changed(&mut self) -> Option<CollectionChange> {
        loop {
            match self.changes.recv().await {
                Ok(change) => return Some(change),
                Err(RecvError::Lagged(skipped)) => {
                    debug!(collection = <S::Record as Record>::KIND, skipped, "View lagged behind changes");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    #[must_use]
    pub fn records(&self) -> Vec<S::Record> {
        self.store().all()
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<S::Record> {
        self.store().get(id)
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.store().load_state()
    }

    pub fn store(&self) -> &DomainStore<S::Record> {
        self.source.domain_store()
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}
