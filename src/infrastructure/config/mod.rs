//! Infrastructure configuration modules.

pub mod api;
pub mod console;
pub mod logging;
pub mod settings;

pub use api::ApiConfig;
pub use console::ConsoleConfig;
pub use logging::LoggingConfig;
pub use settings::Config;
