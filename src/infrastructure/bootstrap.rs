//! Composition root: builds a [`ConsoleContext`] from configuration.

use std::sync::Arc;

use tracing::{info, warn};

use crate::adapter::outbound::api::ApiClient;
use crate::adapter::outbound::report::ReportBox;
use crate::application::ConsoleContext;
use crate::infrastructure::config::Config;
use crate::port::{LogNotifier, NotifierRegistry, RemoteFetch, StaticToken, TokenProvider};

/// A wired console session.
pub struct Console {
    pub context: Arc<ConsoleContext>,
    /// The report currently shown to the operator.
    pub reports: Arc<ReportBox>,
}

/// Build the notifier registry: every event is logged, and reports land
/// in the report box.
pub(crate) fn build_notifier_registry(reports: Arc<ReportBox>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Arc::new(LogNotifier));
    registry.register(reports);
    registry
}

/// Token provider for backend calls, read from the configured variable.
pub(crate) fn build_token_provider(config: &Config) -> Arc<dyn TokenProvider> {
    match &config.api_token {
        Some(token) => Arc::new(StaticToken::new(token.clone())),
        None => {
            warn!(
                variable = %config.api.token_env,
                "No API token set, calling the backend anonymously"
            );
            Arc::new(StaticToken::anonymous())
        }
    }
}

/// Wire the HTTP client, notifiers and stores.
#[must_use]
pub fn build_console(config: &Config) -> Console {
    let token = build_token_provider(config);
    let fetch: Arc<dyn RemoteFetch> = Arc::new(ApiClient::from_config(&config.api, token));
    build_console_with(config, fetch)
}

/// Wire the stores around an existing fetch adapter.
#[must_use]
pub fn build_console_with(config: &Config, fetch: Arc<dyn RemoteFetch>) -> Console {
    let reports = Arc::new(ReportBox::new());
    let registry = build_notifier_registry(Arc::clone(&reports));
    let context = Arc::new(ConsoleContext::new(fetch, Arc::new(registry), &config.console));
    info!(
        base_url = %config.base_url(),
        load_mpc = config.console.load_mpc,
        "Console context ready"
    );
    Console { context, reports }
}
