use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::path::{UnsafePathReason, resolve_under};

/// What the target root holds at a relative path, at scan time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalFileState {
    Missing,
    Present(Vec<u8>),
}

impl LocalFileState {
    pub fn exists(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn content(&self) -> Option<&[u8]> {
        match self {
            Self::Missing => None,
            Self::Present(content) => Some(content),
        }
    }
}

/// Errors that can occur while reading the target root.
/// A missing file is not one of them.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to read {path} outside the target root ({reason})")]
    UnsafePath {
        path: String,
        reason: UnsafePathReason,
    },
}

/// Read the local state of `relative_path` under `target_root`.
///
/// A single read attempt: "not found" becomes [`LocalFileState::Missing`],
/// anything else is an error.
pub fn stat(target_root: &Path, relative_path: &str) -> Result<LocalFileState, ScanError> {
    let path = resolve_under(target_root, relative_path).map_err(|reason| ScanError::UnsafePath {
        path: relative_path.to_owned(),
        reason,
    })?;

    match std::fs::read(&path) {
        Ok(content) => Ok(LocalFileState::Present(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(LocalFileState::Missing),
        Err(source) => Err(ScanError::Io { path, source }),
    }
}
