//! Result-archive reading port.

use std::path::Path;

use thiserror::Error;

use crate::domain::RunMetrics;

/// Why an archive produced no run.
///
/// Skips are per-archive outcomes; a batch tallies them and carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("cannot open archive: {0}")]
    Open(String),

    #[error("archive holds no result document")]
    NoDocument,

    #[error("malformed result document: {0}")]
    Malformed(String),

    #[error("result document has no strategy result block")]
    NoResultBlock,

    #[error("archive reader panicked: {0}")]
    Panicked(String),
}

impl SkipReason {
    /// Stable label used to tally skips.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::NoDocument => "no_document",
            Self::Malformed(_) => "malformed",
            Self::NoResultBlock => "no_result_block",
            Self::Panicked(_) => "panicked",
        }
    }
}

/// Outcome of reading one archive.
#[derive(Debug, Clone, PartialEq)]
pub enum ReadResult {
    Parsed(RunMetrics),
    Skipped(SkipReason),
}

/// Reads one result archive into a canonical run.
///
/// Implementations never fail: every problem is a [`ReadResult::Skipped`].
pub trait ArchiveReader: Send + Sync {
    fn read(&self, path: &Path) -> ReadResult;
}
