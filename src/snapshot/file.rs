//! Snapshot file
//!
//! Owns the backing file path. No other component opens the file
//! directly.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::Result;
use super::{codec, Mapping};

/// Handle to the on-disk snapshot file
#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// One-time startup load
    ///
    /// - Absent file: create it containing `{}` and return an empty mapping.
    /// - Present, well-formed file: return the decoded mapping.
    /// - Present, malformed file: `Decode` error. The caller must treat this
    ///   as fatal rather than start with silently-dropped state.
    pub fn load_or_init(&self) -> Result<Mapping> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let empty = Mapping::new();
                self.write(&empty)?;
                return Ok(empty);
            }
            Err(e) => return Err(e.into()),
        };

        codec::decode(&bytes)
    }

    /// Write a snapshot of the given mapping
    ///
    /// The mapping must already be a consistent point-in-time copy; this
    /// method does no locking of its own.
    pub fn write(&self, mapping: &Mapping) -> Result<()> {
        let bytes = codec::encode(mapping)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}
