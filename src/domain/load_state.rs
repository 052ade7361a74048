//! Per-collection load tracking.

use chrono::{DateTime, Utc};

/// Whether a collection has been fetched from the backend.
///
/// `Loaded` is only reachable through a successful load. A failed load puts
/// the collection back into whatever state it was in before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Never fetched (or cleared since).
    #[default]
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// Last successful fetch completed at `at`.
    Loaded { at: DateTime<Utc> },
}

impl LoadState {
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unloaded => write!(f, "unloaded"),
            Self::Loading => write!(f, "loading"),
            Self::Loaded { at } => write!(f, "loaded at {}", at.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}
