//! Local snapshot of the transaction list
//!
//! The fallback data source: a JSON array on this machine, rewritten after
//! every successful change. A missing file is an empty snapshot.

use crate::types::{BookError, Transaction};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalCache {
    path: PathBuf,
}

impl LocalCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        LocalCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot
    ///
    /// # Errors
    ///
    /// `BookError::Persistence` if the file exists but cannot be read or
    /// parsed.
    pub fn load(&self) -> Result<Vec<Transaction>, BookError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BookError::persistence(format!(
                    "failed to read local cache {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        serde_json::from_str(&text).map_err(|e| {
            BookError::persistence(format!(
                "local cache {} is corrupt: {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Overwrite the snapshot
    pub fn save(&self, transactions: &[Transaction]) -> Result<(), BookError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
        }
        let text = serde_json::to_string_pretty(transactions)?;
        fs::write(&self.path, text).map_err(|e| self.write_error(e))
    }

    fn write_error(&self, error: std::io::Error) -> BookError {
        BookError::persistence(format!(
            "failed to write local cache {}: {}",
            self.path.display(),
            error
        ))
    }
}
