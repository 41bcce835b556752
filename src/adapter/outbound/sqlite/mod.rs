//! SQLite persistence adapters.
//!
//! Provides the SQLite-backed rating store using Diesel ORM.

pub mod database;
pub mod store;

pub use store::SqliteRatingStore;
