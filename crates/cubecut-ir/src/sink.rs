//! Export sinks that receive finished pieces one at a time.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::{CubePlacement, Document};

/// Errors from piece export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Piece name unusable as a file name.
    #[error("invalid piece name: {0:?}")]
    InvalidName(String),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Receives each finished piece as a list of unit-cube placements.
pub trait PieceSink {
    /// Consume one piece.
    fn write_piece(&mut self, name: &str, cubes: &[CubePlacement]) -> Result<()>;
}

/// Writes one `<name>.json` [`Document`] per piece into a directory.
pub struct DocumentSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DocumentSink {
    /// Create a sink writing into `dir`, creating it if needed.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            written: Vec::new(),
        })
    }

    /// Output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in write order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl PieceSink for DocumentSink {
    fn write_piece(&mut self, name: &str, cubes: &[CubePlacement]) -> Result<()> {
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(ExportError::InvalidName(name.to_string()));
        }
        let path = self.dir.join(format!("{name}.json"));
        let doc = Document::from_cubes(name, cubes);
        fs::write(&path, doc.to_json()?)?;
        debug!(piece = name, cubes = cubes.len(), path = %path.display(), "wrote piece document");
        self.written.push(path);
        Ok(())
    }
}
