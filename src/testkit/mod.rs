//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`fetch`] - `ScriptedFetch`, a [`RemoteFetch`](crate::port::RemoteFetch)
//!   answering from per-route scripts.
//! - [`notifier`] - `RecordingNotifier`, which keeps every event.
//! - [`domain`] - JSON builders for backend records.
//! - [`config`] - Canonical test configurations.
//! - [`context`] - A fully wired context over scripted fakes.

pub mod config;
pub mod context;
pub mod domain;
pub mod fetch;
pub mod notifier;
