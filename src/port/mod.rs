//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points the stores are wired with. Adapters
//! implement them to reach the backend API and the operator.
//!
//! # Available Ports
//!
//! - [`RemoteFetch`] - Backend REST calls
//! - [`Notifier`] - User-visible reports and store events
//! - [`TokenProvider`] - Bearer tokens for backend calls

pub mod outbound;

pub use outbound::fetch::{fetch_json, ApiRequest, Method, RemoteFetch};
pub use outbound::notifier::{Event, LogNotifier, Notifier, NotifierRegistry, NullNotifier};
pub use outbound::token::{StaticToken, TokenProvider};
