//! Thread-safe record collection with change notifications.

use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tokio::sync::broadcast;

use crate::domain::{LoadState, Record, RecordId};

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Notification sent when a collection mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionChange {
    /// The whole mapping was replaced by a load.
    Replaced { count: usize },
    /// One record was inserted or overwritten.
    Upserted(RecordId),
    /// One record was removed.
    Removed(RecordId),
    /// The collection was emptied and reset to `Unloaded`.
    Cleared,
}

struct Inner<R> {
    records: HashMap<RecordId, R>,
    state: LoadState,
    revision: u64,
}

/// Mapping from record id to record, plus its load state.
///
/// Keys are always derived from [`Record::id`], so the key of an entry equals
/// the id embedded in its record. All mutations take the write lock once, so
/// readers see either the previous or the next full mapping.
pub struct Collection<R: Record> {
    inner: RwLock<Inner<R>>,
    tx: broadcast::Sender<CollectionChange>,
}

impl<R: Record> Collection<R> {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            inner: RwLock::new(Inner {
                records: HashMap::new(),
                state: LoadState::Unloaded,
                revision: 0,
            }),
            tx,
        }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CollectionChange> {
        self.tx.subscribe()
    }

    fn emit(&self, change: CollectionChange) {
        // No receivers is fine.
        let _ = self.tx.send(change);
    }

    #[must_use]
    pub fn get(&self, id: &RecordId) -> Option<R> {
        self.inner.read().records.get(id).cloned()
    }

    /// Snapshot of every record, ordered by id.
    #[must_use]
    pub fn all(&self) -> Vec<R> {
        self.filter(|_| true)
    }

    /// Snapshot of the records matching `predicate`, ordered by id.
    pub fn filter(&self, predicate: impl Fn(&R) -> bool) -> Vec<R> {
        self.read(|_, records| {
            records
                .into_iter()
                .filter(|r| predicate(r))
                .cloned()
                .collect()
        })
    }

    /// Run `f` against a consistent view: the current revision and the
    /// records ordered by id.
    pub fn read<T>(&self, f: impl FnOnce(u64, Vec<&R>) -> T) -> T {
        let inner = self.inner.read();
        let mut records: Vec<&R> = inner.records.values().collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        f(inner.revision, records)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn load_state(&self) -> LoadState {
        self.inner.read().state
    }

    /// Counter bumped by every mutation of the mapping.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.read().revision
    }

    /// Replace the mapping wholesale and mark the collection loaded.
    ///
    /// When `records` repeats an id, the last occurrence wins.
    pub fn replace(&self, records: impl IntoIterator<Item = R>) -> usize {
        let records: HashMap<RecordId, R> = records
            .into_iter()
            .map(|r| (r.id().clone(), r))
            .collect();
        let count = records.len();
        {
            let mut inner = self.inner.write();
            inner.records = records;
            inner.state = LoadState::Loaded { at: Utc::now() };
            inner.revision += 1;
        }
        self.emit(CollectionChange::Replaced { count });
        count
    }

    /// Insert or overwrite a record. Returns the previous record, if any.
    pub fn upsert(&self, record: R) -> Option<R> {
        let id = record.id().clone();
        let previous = {
            let mut inner = self.inner.write();
            inner.revision += 1;
            inner.records.insert(id.clone(), record)
        };
        self.emit(CollectionChange::Upserted(id));
        previous
    }

    /// Remove a record. Returns it if it was present.
    pub fn remove(&self, id: &RecordId) -> Option<R> {
        let removed = {
            let mut inner = self.inner.write();
            let removed = inner.records.remove(id);
            if removed.is_some() {
                inner.revision += 1;
            }
            removed
        };
        if removed.is_some() {
            self.emit(CollectionChange::Removed(id.clone()));
        }
        removed
    }

    /// Empty the collection and reset it to `Unloaded`.
    pub fn clear(&self) {
        {
            let mut inner = self.inner.write();
            inner.records.clear();
            inner.state = LoadState::Unloaded;
            inner.revision += 1;
        }
        self.emit(CollectionChange::Cleared);
    }

    /// Enter `Loading`, returning the state to restore if the load fails.
    pub(crate) fn begin_load(&self) -> LoadState {
        let mut inner = self.inner.write();
        std::mem::replace(&mut inner.state, LoadState::Loading)
    }

    /// Restore the pre-load state unless something else moved it on.
    pub(crate) fn abort_load(&self, previous: LoadState) {
        let mut inner = self.inner.write();
        if inner.state.is_loading() {
            inner.state = previous;
        }
    }
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}
