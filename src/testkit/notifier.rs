use std::sync::Arc;

use parking_lot::Mutex;

use crate::domain::{Report, ReportLevel};
use crate::port::{Event, Notifier};

/// Thread-safe event collector for notification assertions in tests.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn reports(&self) -> Vec<Report> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| e.report().cloned())
            .collect()
    }

    pub fn error_count(&self) -> usize {
        self.count(ReportLevel::Error)
    }

    pub fn success_count(&self) -> usize {
        self.count(ReportLevel::Success)
    }

    fn count(&self, level: ReportLevel) -> usize {
        self.reports().iter().filter(|r| r.level == level).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, event: Event) {
        self.events.lock().push(event);
    }
}
