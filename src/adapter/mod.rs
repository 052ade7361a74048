//! Adapters implementing the ports, plus the operator CLI.

pub mod inbound;
pub mod outbound;
