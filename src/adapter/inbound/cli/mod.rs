//! CLI module graph.

pub mod command;
pub mod ingest;
pub mod output;
pub mod rankings;
pub mod show;
pub mod stats;
