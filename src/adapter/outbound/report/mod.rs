//! The report box: holds the report currently shown to the operator.
//!
//! A newer report replaces the shown one. Observers follow changes through
//! a watch channel, so a renderer only ever sees the latest report.

use tokio::sync::watch;

use crate::domain::Report;
use crate::port::{Event, Notifier};

/// Latest-report holder implementing [`Notifier`].
pub struct ReportBox {
    current: watch::Sender<Option<Report>>,
}

impl ReportBox {
    #[must_use]
    pub fn new() -> Self {
        let (current, _) = watch::channel(None);
        Self { current }
    }

    /// The report currently shown, if any.
    #[must_use]
    pub fn current(&self) -> Option<Report> {
        self.current.borrow().clone()
    }

    /// Follow report changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Report>> {
        self.current.subscribe()
    }

    /// Hide the shown report.
    pub fn dismiss(&self) {
        self.current.send_replace(None);
    }
}

impl Default for ReportBox {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for ReportBox {
    fn notify(&self, event: Event) {
        match event {
            Event::Report(report) => {
                self.current.send_replace(Some(report));
            }
            Event::SessionCleared => self.dismiss(),
            Event::CollectionLoaded { .. } => {}
        }
    }
}
