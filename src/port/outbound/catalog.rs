//! Strategy catalog port.

use crate::domain::StrategySource;

/// The set of strategy definitions currently available.
pub trait StrategyCatalog: Send + Sync {
    /// Strategy names, sorted.
    fn names(&self) -> Vec<String>;

    fn source(&self, name: &str) -> Option<StrategySource>;

    fn contains(&self, name: &str) -> bool;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// SHA-256 hex of the strategy's source.
    fn hash(&self, name: &str) -> Option<String> {
        self.source(name).map(|s| s.hash)
    }
}
