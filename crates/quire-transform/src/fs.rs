//! Filesystem seam for reading page sources.

use std::io;
use std::path::Path;

/// Read access to page source files.
pub trait SourceFs: Send + Sync {
    /// Whether a file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Read the full byte content of `path`.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;
}

/// The local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl SourceFs for LocalFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }
}
