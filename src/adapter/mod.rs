//! Implementations of ports (hexagonal adapters).
//!
//! - [`inbound`] - The `stratrank` command line
//! - [`outbound`] - Archive reader, strategy catalog and rating stores

pub mod inbound;
pub mod outbound;
