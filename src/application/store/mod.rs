//! The reactive domain store and its building blocks.
//!
//! - [`Collection`] - id-keyed records, load state, change broadcast
//! - [`LoadGate`] - coalesces concurrent loads of one collection
//! - [`DomainStore`] - collection + backend endpoint + load/write actions
//! - [`Projection`] - derived views memoized per revision
//! - [`Binding`] - what a mounted view holds

mod binding;
mod collection;
mod domain_store;
mod endpoint;
mod gate;
mod outcome;
mod projection;
mod scope;

pub use binding::{Bindable, Binding};
pub use collection::{Collection, CollectionChange};
pub use domain_store::{DomainStore, StoreDeps};
pub use endpoint::Endpoint;
pub use gate::{LoadGate, LoadKey};
pub use outcome::LoadOutcome;
pub use projection::Projection;
pub use scope::ProjectScope;
