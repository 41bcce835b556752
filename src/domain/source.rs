//! Strategy source text and its content hash.

use sha2::{Digest, Sha256};

/// The source of one strategy, as read from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategySource {
    pub text: String,
    /// Lowercase hex SHA-256 of `text`.
    pub hash: String,
}

impl StrategySource {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = hex::encode(Sha256::digest(text.as_bytes()));
        Self { text, hash }
    }
}
