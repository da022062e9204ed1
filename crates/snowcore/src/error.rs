//! Error taxonomy shared by every catalog operation.
//!
//! None of these are fatal: a failed operation leaves the in-memory catalog
//! exactly as it was before the call.

use std::io;
use std::path::{Path, PathBuf};

pub type Result<T> = std::result::Result<T, ModError>;

#[derive(Debug, thiserror::Error)]
pub enum ModError {
    /// A JSON file could not be parsed, or had the wrong top-level shape.
    #[error("failed to parse {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Copy, rename, delete or write failure.
    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination already exists, in enabled or disabled form.
    #[error("file already exists: {}", path.display())]
    DuplicateFile { path: PathBuf },

    /// A required input was empty or unusable.
    #[error("invalid input: {0}")]
    Validation(String),

    /// No record at the given catalog position.
    #[error("no mod at index {index} (catalog has {len})")]
    NoSuchRecord { index: usize, len: usize },
}

impl ModError {
    /// Build a `map_err` adapter that tags an I/O error with what was being
    /// done and to which path.
    pub fn io(action: &'static str, path: impl AsRef<Path>) -> impl FnOnce(io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        move |source| ModError::Io {
            action,
            path,
            source,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_duplicate(&self) -> bool {
        matches!(self, ModError::DuplicateFile { .. })
    }

    #[cfg(test)]
    pub(crate) fn is_validation(&self) -> bool {
        matches!(self, ModError::Validation(_))
    }
}
