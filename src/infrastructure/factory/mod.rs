//! Factory functions that construct configured components.
//!
//! # Submodules
//!
//! - [`ingest`] - Catalog, rating engine and ingest service construction
//! - [`persistence`] - Rating store construction with database fallback

pub mod ingest;
pub mod persistence;

pub use ingest::{build_catalog, build_ingest_service, build_rating_engine};
pub use persistence::build_rating_store;
