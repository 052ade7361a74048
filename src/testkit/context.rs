//! A console context wired to scripted fakes.

use std::sync::Arc;
use std::time::Duration;

use super::fetch::ScriptedFetch;
use super::notifier::RecordingNotifier;
use crate::application::ConsoleContext;
use crate::infrastructure::config::ConsoleConfig;

pub struct TestConsole {
    pub context: ConsoleContext,
    pub fetch: Arc<ScriptedFetch>,
    pub notifier: RecordingNotifier,
}

impl TestConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::build(ScriptedFetch::new(), &ConsoleConfig::default())
    }

    /// Every scripted reply is delayed, so loads stay in flight.
    #[must_use]
    pub fn delayed(delay: Duration) -> Self {
        Self::build(ScriptedFetch::new().with_delay(delay), &ConsoleConfig::default())
    }

    #[must_use]
    pub fn with_config(config: &ConsoleConfig) -> Self {
        Self::build(ScriptedFetch::new(), config)
    }

    fn build(fetch: ScriptedFetch, config: &ConsoleConfig) -> Self {
        let fetch = Arc::new(fetch);
        let notifier = RecordingNotifier::new();
        let context = ConsoleContext::new(fetch.clone(), Arc::new(notifier.clone()), config);
        Self {
            context,
            fetch,
            notifier,
        }
    }

    /// Select `project` without fetching it.
    pub fn select(&self, project: &str) -> &Self {
        self.context.projects().select(project.into());
        self
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}
