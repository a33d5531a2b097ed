//! On-disk locations for the embedded stores.

use std::path::{Path, PathBuf};

/// Default data directory: `<data dir>/football-stats`, or `./.football-stats`
/// when the platform has no data directory.
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|base| base.join("football-stats"))
        .unwrap_or_else(|| PathBuf::from(".football-stats"))
}

/// Database file paths for the three stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorePaths {
    pub wide: PathBuf,
    pub documents: PathBuf,
    pub graph: PathBuf,
}

impl StorePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            wide: dir.join("wide.db"),
            documents: dir.join("documents.db"),
            graph: dir.join("graph.db"),
        }
    }
}

/// Create the parent directory of a database file if needed.
pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => std::fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
