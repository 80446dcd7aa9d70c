//! Uploaded bytes staged as a temporary `.pdf` file for the extractor.

use anyhow::{Context, Result};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// The backing file is deleted when this value is dropped.
pub struct StagedUpload {
    file: NamedTempFile,
    name: String,
    size: u64,
}

impl StagedUpload {
    pub fn from_bytes(name: impl Into<String>, bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("docqa-upload-")
            .suffix(".pdf")
            .tempfile()
            .context("Failed to create temporary upload file")?;
        file.write_all(bytes)?;
        file.flush()?;
        debug!(path = %file.path().display(), bytes = bytes.len(), "staged upload");
        Ok(Self { file, name: name.into(), size: bytes.len() as u64 })
    }

    pub fn from_reader(name: impl Into<String>, mut reader: impl Read) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).context("Failed to read upload")?;
        Self::from_bytes(name, &bytes)
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Name the document was uploaded under.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}
