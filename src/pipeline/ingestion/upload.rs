use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::common::error::Result;

/// Uploaded bytes parked in a temporary file until they are decoded.
///
/// The backing file is removed when the value is released or dropped, so
/// every exit path of a decode cleans up after itself.
#[derive(Debug)]
pub struct StagedUpload {
    file: NamedTempFile,
    original_filename: String,
}

impl StagedUpload {
    /// Write `bytes` to a fresh temporary file under `dir`.
    pub fn stage(dir: &Path, original_filename: &str, bytes: &[u8]) -> Result<Self> {
        fs::create_dir_all(dir)?;
        let mut file = tempfile::Builder::new()
            .prefix("upload-")
            .tempfile_in(dir)?;
        file.write_all(bytes)?;
        file.flush()?;

        debug!(
            path = %file.path().display(),
            filename = original_filename,
            bytes = bytes.len(),
            "Staged upload"
        );
        Ok(Self {
            file,
            original_filename: original_filename.to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Name the client gave the file; only used to pick a decoder.
    pub fn original_filename(&self) -> &str {
        &self.original_filename
    }

    /// Delete the backing file now, logging rather than failing if the
    /// filesystem refuses.
    pub fn release(self) -> PathBuf {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!(path = %path.display(), "Failed to remove staged upload: {}", e);
        }
        path
    }
}
