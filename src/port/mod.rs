//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with the outside
//! world (result archives, strategy sources, rating storage).
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Archive │            │   Rating    │              │  Strategy │
//! │ Reader  │            │   Store     │              │  Catalog  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`ArchiveReader`] - One result archive to one canonical run
//! - [`RatingStore`] - Persistence for aggregated ratings
//! - [`StrategyCatalog`] - Strategy sources and catalog membership

pub mod outbound;

pub use outbound::archive::{ArchiveReader, ReadResult, SkipReason};
pub use outbound::catalog::StrategyCatalog;
pub use outbound::store::RatingStore;
