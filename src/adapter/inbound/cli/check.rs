//! Configuration validation command.

use std::path::Path;

use anyhow::{Context, Result};

use super::output;
use crate::infrastructure::config::Config;

/// Load and validate a configuration file without contacting the backend.
///
/// # Errors
///
/// The file is missing, malformed, or fails validation.
pub fn execute_config(config_path: &Path) -> Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("invalid configuration in {}", config_path.display()))?;

    output::section("Configuration Check");
    output::field("Config", config_path.display());
    output::success("Configuration file is valid");

    output::section("Summary");
    output::field("API", output::highlight(config.base_url()));
    output::field(
        "Timeouts",
        format!(
            "{} ms request, {} ms connect",
            config.api.timeout_ms, config.api.connect_timeout_ms
        ),
    );
    output::field("Retries", config.api.retry_max_attempts);
    output::field(
        "Logging",
        format!("{} ({})", config.logging.level, config.logging.format),
    );
    output::field("MPC", if config.console.load_mpc { "enabled" } else { "disabled" });
    output::field("Device types", config.console.device_types.len());

    if config.api_token.is_some() {
        output::success(&format!("API token found in {}", config.api.token_env));
    } else {
        output::warning(&format!(
            "No API token set (export {} for authenticated calls)",
            config.api.token_env
        ));
    }

    output::success("Configuration check complete");
    Ok(())
}
