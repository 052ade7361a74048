//! Outbound ports: what the stores need from the outside world.

pub mod fetch;
pub mod notifier;
pub mod token;
