//! Application layer: the reactive store and the console's domain stores.
//!
//! [`store`] holds the generic machinery (collections, load gate, bindings).
//! The other modules specialize it per domain collection, and [`context`]
//! assembles them into one session.

pub mod alerts;
pub mod context;
pub mod controllers;
pub mod devices;
pub mod measurements;
pub mod members;
pub mod modules;
pub mod navigation;
pub mod permissions;
pub mod projects;
pub mod rooms;
pub mod rules;
pub mod store;

pub use context::{CollectionLoad, ConsoleContext};
