use crate::error::Result;
use std::path::Path;
use tempfile::TempDir;

/// Temporary directory owned by one run
///
/// Removed when dropped, whichever way the run ends.
#[derive(Debug)]
pub struct ScratchArea {
    dir: TempDir,
}

impl ScratchArea {
    /// Create a fresh scratch directory under the system temp dir
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("deckshot-").tempdir()?;
        log::debug!("Scratch area at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Remove the directory now, reporting any error
    pub fn close(self) -> Result<()> {
        self.dir.close()?;
        Ok(())
    }
}
