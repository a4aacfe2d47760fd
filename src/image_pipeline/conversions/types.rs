use std::path::{Path, PathBuf};

use crate::image_pipeline::bmp::BitmapFile;
use crate::image_pipeline::common::error::{PipelineError, Result};

/// An encoded bitmap and the file name it should be saved under.
#[derive(Debug, Clone)]
pub struct BmpArtifact {
    pub file_name: String,
    pub bitmap: BitmapFile,
}

impl BmpArtifact {
    /// Writes the bitmap into `dir`, replacing any file of the same name.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, self.bitmap.as_bytes()).map_err(|e| {
            PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
        })?;
        Ok(path)
    }
}

/// Result of processing one photo that did not fail.
#[derive(Debug, Clone)]
pub enum PhotoOutcome {
    /// Eyes were found and the crop was encoded.
    Encoded(BmpArtifact),
    /// No eyes were found; nothing is produced for this photo.
    NoDetection,
}

impl PhotoOutcome {
    pub fn artifact(&self) -> Option<&BmpArtifact> {
        match self {
            PhotoOutcome::Encoded(artifact) => Some(artifact),
            PhotoOutcome::NoDetection => None,
        }
    }

    pub fn is_no_detection(&self) -> bool {
        matches!(self, PhotoOutcome::NoDetection)
    }
}

/// Per-file result of a batch run.
#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    /// Path of the written bitmap, or `None` when no eyes were found.
    pub result: Result<Option<PathBuf>>,
}
