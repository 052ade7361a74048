//! Result of a store load.

/// What a call to `load()` did.
///
/// Failures are reported to the operator by the store before this value is
/// returned; callers only need it to decide what to render next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The collection was replaced with `count` records.
    Loaded { count: usize },
    /// Another caller's load was already in flight; this is its outcome.
    Coalesced(Box<LoadOutcome>),
    /// The selected project changed while the request was in flight, so
    /// the response was discarded.
    Stale,
    /// Loading is disabled for this collection.
    Skipped,
    /// The load failed and the collection was left untouched.
    Failed { reason: String },
}

impl LoadOutcome {
    /// The outcome with any coalescing unwrapped.
    #[must_use]
    pub fn resolved(&self) -> &LoadOutcome {
        match self {
            Self::Coalesced(inner) => inner.resolved(),
            other => other,
        }
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(self.resolved(), Self::Loaded { .. })
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self.resolved(), Self::Failed { .. })
    }

    /// Record count of a successful load.
    #[must_use]
    pub fn count(&self) -> Option<usize> {
        match self.resolved() {
            Self::Loaded { count } => Some(*count),
            _ => None,
        }
    }
}

impl std::fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loaded { count } => write!(f, "loaded {count} records"),
            Self::Coalesced(inner) => write!(f, "{inner} (shared)"),
            Self::Stale => write!(f, "discarded stale response"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed { reason } => write!(f, "failed: {reason}"),
        }
    }
}
