//! Outbound adapters (driven side).

pub mod archive;
pub mod catalog;
pub mod fallback;
pub mod file;
pub mod sqlite;
