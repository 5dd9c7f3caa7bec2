use crate::{Error, Result};
use std::fs;
use std::io::Write;
use std::path::Path;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AtomicWriteOptions {
    /// `fsync` the temporary file before renaming it into place.
    pub sync: bool,
}

impl AtomicWriteOptions {
    pub fn new() -> Self { Self::default() }

    pub fn sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }
}

/// Create `path` and any missing parents.
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|e| Error::CreateDir {
        path:   path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to a temporary file next to `path`, then rename it over `path`.
///
/// The temporary file is removed if anything fails before the rename.
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8], options: AtomicWriteOptions) -> Result<()> {
    let path = path.as_ref();
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".tmp.")
        .suffix(".pagefetch")
        .tempfile_in(parent)
        .map_err(write_err)?;

    tmp.write_all(content).map_err(write_err)?;

    if options.sync {
        tmp.as_file().sync_all().map_err(write_err)?;
    }

    tmp.persist(path).map_err(|e| write_err(e.error))?;

    Ok(())
}

/// Write `content` straight to `path`, truncating any previous content.
pub fn plain_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|e| Error::Write {
        path:   path.to_path_buf(),
        source: e,
    })
}

pub fn atomic_read(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    fs::read(path).map_err(|e| Error::Read {
        path:   path.to_path_buf(),
        source: e,
    })
}
