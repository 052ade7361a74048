//! Console store - reactive domain stores for an energy and IoT monitoring
//! console.
//!
//! Each store holds one collection of backend records (projects, devices,
//! controllers, rules, rooms, modules, measurements, alerts), loads it over
//! the REST API and exposes lookups, derived views and change
//! notifications. Remote failures are reported once through a notifier and
//! never leave a collection half-updated.
//!
//! # Architecture
//!
//! - [`domain`] - Record types and identifiers, no I/O
//! - [`port`] - Traits the stores are wired with (`RemoteFetch`, `Notifier`,
//!   `TokenProvider`)
//! - [`application`] - `DomainStore`, the per-collection stores and the
//!   `ConsoleContext` that owns them
//! - [`adapter`] - HTTP client, report box and the operator CLI
//! - [`infrastructure`] - Configuration and wiring
//!
//! # Example
//!
//! ```no_run
//! use console_store::infrastructure::bootstrap::build_console;
//! use console_store::infrastructure::config::Config;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load("config.toml")?;
//! let console = build_console(&config);
//!
//! console.context.projects().load().await;
//! for project in console.context.projects().filter_by_name("") {
//!     println!("{}", project.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
