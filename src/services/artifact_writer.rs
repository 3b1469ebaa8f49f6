//! Artifact writer - service layer
//!
//! Only knows how to append lines to one file; it does not care what the
//! lines mean or who sends them.

use std::path::{Path, PathBuf};

use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// Append-only line sink
///
/// Responsibilities:
/// - creates the file and its parent directory on first write
/// - writes each line with a single append, under a lock, so concurrent
///   tasks never interleave inside a line
pub struct ArtifactWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ArtifactWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends `line` followed by a newline
    pub async fn append_line(&self, line: &str) -> AppResult<()> {
        let mut record = String::with_capacity(line.len() + 1);
        record.push_str(line);
        record.push('\n');
        self.append(record.as_bytes()).await
    }

    async fn append(&self, bytes: &[u8]) -> AppResult<()> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::file_write_failed(parent, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;

        file.write_all(bytes)
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| AppError::file_write_failed(&self.path, e))?;

        debug!("appended {} byte(s) to {}", bytes.len(), self.path.display());
        Ok(())
    }
}
