//! Inbound adapters: how an operator drives the stores.

pub mod cli;
