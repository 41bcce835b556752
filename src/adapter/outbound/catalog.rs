//! Strategy catalog read from a directory of Python strategy files.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use tracing::{debug, warn};

use crate::domain::StrategySource;
use crate::error::Result;
use crate::port::outbound::catalog::StrategyCatalog;

const SOURCE_EXTENSION: &str = "py";

/// Snapshot of the strategies directory taken at [`DirectoryCatalog::scan`].
#[derive(Debug, Clone, Default)]
pub struct DirectoryCatalog {
    sources: BTreeMap<String, StrategySource>,
}

impl DirectoryCatalog {
    /// Read every `*.py` file in `dir`, skipping `__init__.py` and any
    /// file whose name starts with `_`. A missing directory is an empty
    /// catalog; unreadable files are skipped with a warning.
    pub fn scan(dir: &Path) -> Result<Self> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "Strategies directory missing, catalog is empty");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let mut sources = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(SOURCE_EXTENSION) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if name.starts_with('_') {
                continue;
            }
            match fs::read(&path) {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    sources.insert(name.to_string(), StrategySource::new(text));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Cannot read strategy source, skipping");
                }
            }
        }

        debug!(dir = %dir.display(), strategies = sources.len(), "Scanned strategy catalog");
        Ok(Self { sources })
    }

    /// Build a catalog from in-memory `(name, source text)` pairs.
    pub fn from_sources<I, N, T>(sources: I) -> Self
    where
        I: IntoIterator<Item = (N, T)>,
        N: Into<String>,
        T: Into<String>,
    {
        Self {
            sources: sources
                .into_iter()
                .map(|(name, text)| (name.into(), StrategySource::new(text)))
                .collect(),
        }
    }
}

impl StrategyCatalog for DirectoryCatalog {
    fn names(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    fn source(&self, name: &str) -> Option<StrategySource> {
        self.sources.get(name).cloned()
    }

    fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    fn len(&self) -> usize {
        self.sources.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scan_filters_private_and_non_python_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("EWO_A.py"), "class EWO_A: pass").unwrap();
        fs::write(dir.path().join("Alpha.py"), "class Alpha: pass").unwrap();
        fs::write(dir.path().join("__init__.py"), "").unwrap();
        fs::write(dir.path().join("_helpers.py"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();
        fs::create_dir(dir.path().join("sub.py")).unwrap();

        let catalog = DirectoryCatalog::scan(dir.path()).unwrap();
        assert_eq!(catalog.names(), ["Alpha", "EWO_A"]);
        assert!(catalog.contains("EWO_A"));
        assert!(!catalog.contains("_helpers"));
        assert_eq!(
            catalog.hash("EWO_A"),
            Some(StrategySource::new("class EWO_A: pass").hash)
        );
    }

    #[test]
    fn missing_directory_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DirectoryCatalog::scan(&dir.path().join("nope")).unwrap();
        assert!(catalog.is_empty());
        assert!(catalog.source("anything").is_none());
    }

    #[test]
    fn from_sources_hashes_text() {
        let catalog = DirectoryCatalog::from_sources([("S", "x = 1")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.source("S").unwrap().text, "x = 1");
    }
}
