//! The currently selected project shared by all project-scoped stores.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::RecordId;

/// Selected project plus an epoch that changes whenever the selection does.
///
/// Loads capture the epoch before their request and drop the response if
/// it moved in the meantime.
#[derive(Debug, Default)]
pub struct ProjectScope {
    current: RwLock<Option<RecordId>>,
    epoch: AtomicU64,
}

impl ProjectScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<RecordId> {
        self.current.read().clone()
    }

    /// Current selection together with its epoch, read consistently.
    #[must_use]
    pub fn snapshot(&self) -> (Option<RecordId>, u64) {
        let current = self.current.read();
        (current.clone(), self.epoch.load(Ordering::Acquire))
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::Acquire)
    }

    /// Select `project`. Re-selecting the current project keeps the epoch.
    pub fn select(&self, project: RecordId) {
        let mut current = self.current.write();
        if current.as_ref() != Some(&project) {
            *current = Some(project);
            self.epoch.fetch_add(1, Ordering::AcqRel);
        }
    }

    /// Deselect. Always invalidates in-flight loads.
    pub fn clear(&self) {
        let mut current = self.current.write();
        *current = None;
        self.epoch.fetch_add(1, Ordering::AcqRel);
    }
}
