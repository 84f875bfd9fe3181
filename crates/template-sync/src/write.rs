//! Materializes the write set under the target root.
//!
//! Each file goes through a sibling `<name>.template-sync.<pid>.tmp`, created
//! fresh (an existing file of that name is an error, never overwritten),
//! followed by a rename, so a single file is either fully replaced or left
//! untouched.
//! The set as a whole is not atomic: the first failure stops the pass and
//! files written before it stay in place.

use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::manifest::RemoteFile;
use crate::path::{UnsafePathReason, resolve_under};

const TMP_MARKER: &str = ".template-sync.";

/// Errors that can occur while writing files.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("refusing to write {path} outside the target root ({reason})")]
    UnsafePath {
        path: String,
        reason: UnsafePathReason,
    },
}

fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> WriteError {
    WriteError::Io {
        path: path.into(),
        source,
    }
}

/// Write every file in `write_set` under `target_root`, in order.
/// Returns the absolute paths written.
pub fn write(write_set: &[&RemoteFile], target_root: &Path) -> Result<Vec<PathBuf>, WriteError> {
    let mut written = Vec::with_capacity(write_set.len());

    for file in write_set {
        let path = write_file(file, target_root)?;
        written.push(path);
    }

    Ok(written)
}

/// Write one file, creating parent directories as needed.
pub fn write_file(file: &RemoteFile, target_root: &Path) -> Result<PathBuf, WriteError> {
    let path = resolve_under(target_root, &file.relative_path).map_err(|reason| {
        WriteError::UnsafePath {
            path: file.relative_path.clone(),
            reason,
        }
    })?;
    let tmp = tmp_path(&path);

    write_with_tmp(&path, &file.content, &tmp)?;

    tracing::debug!(path = %path.display(), bytes = file.content.len(), "wrote");
    Ok(path)
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(TMP_MARKER);
    name.push(std::process::id().to_string());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_with_tmp(path: &Path, content: &[u8], tmp: &Path) -> Result<(), WriteError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    // Not ours to remove if it already exists.
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(tmp)
        .map_err(|e| io_err(tmp, e))?;

    if let Err(e) = file.write_all(content).and_then(|()| file.sync_all()) {
        drop(file);
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(tmp, e));
    }
    drop(file);

    if let Err(e) = std::fs::rename(tmp, path) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(path, e));
    }

    Ok(())
}
