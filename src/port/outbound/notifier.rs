//! Notifier port for user-visible reports and store events.
//!
//! Every store action reports its outcome through this port. The console
//! renders [`Event::Report`] as a toast; other events exist for logging and
//! for observers such as tests.

use std::sync::Arc;

use crate::domain::report::{Report, ReportLevel};

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A message for the operator.
    Report(Report),
    /// A collection was replaced by a successful load.
    CollectionLoaded {
        /// Record kind of the collection.
        kind: &'static str,
        /// Number of records after the load.
        count: usize,
    },
    /// The project-scoped state was cleared.
    SessionCleared,
}

impl Event {
    /// The report carried by this event, if any.
    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        match self {
            Self::Report(report) => Some(report),
            _ => None,
        }
    }
}

impl From<Report> for Event {
    fn from(report: Report) -> Self {
        Self::Report(report)
    }
}

/// Trait for notification handlers.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{debug, error, info, warn};
        match event {
            Event::Report(report) => match report.level {
                ReportLevel::Success => info!(message = %report.message, "Report"),
                ReportLevel::Warning => warn!(message = %report.message, "Report"),
                ReportLevel::Error => error!(message = %report.message, "Report"),
            },
            Event::CollectionLoaded { kind, count } => {
                debug!(collection = kind, count, "Collection loaded");
            }
            Event::SessionCleared => {
                info!("Project session cleared");
            }
        }
    }
}
