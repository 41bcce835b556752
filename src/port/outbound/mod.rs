//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod archive;
pub mod catalog;
pub mod store;
