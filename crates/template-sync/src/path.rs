use std::path::{Path, PathBuf};

/// Why a manifest path was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsafePathReason {
    Empty,
    Absolute,
    ParentSegment,
    EmptySegment,
    CurrentSegment,
    Backslash,
    /// An existing segment under the root is a symlink.
    Symlink,
}

impl std::fmt::Display for UnsafePathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::Empty => "path is empty",
            Self::Absolute => "path is absolute",
            Self::ParentSegment => "path contains a `..` segment",
            Self::EmptySegment => "path contains an empty segment",
            Self::CurrentSegment => "path contains a `.` segment",
            Self::Backslash => "path contains a backslash",
            Self::Symlink => "path goes through a symlink",
        };
        f.write_str(reason)
    }
}

/// Check that a slash-separated path stays inside whatever root it is joined to.
pub fn check_relative_path(relative_path: &str) -> Result<(), UnsafePathReason> {
    if relative_path.is_empty() {
        return Err(UnsafePathReason::Empty);
    }
    if relative_path.contains('\\') {
        return Err(UnsafePathReason::Backslash);
    }
    if relative_path.starts_with('/') || has_drive_prefix(relative_path) {
        return Err(UnsafePathReason::Absolute);
    }

    for segment in relative_path.split('/') {
        match segment {
            "" => return Err(UnsafePathReason::EmptySegment),
            "." => return Err(UnsafePathReason::CurrentSegment),
            ".." => return Err(UnsafePathReason::ParentSegment),
            _ => {}
        }
    }

    Ok(())
}

/// Join a checked relative path onto `root`, one segment at a time.
///
/// Every segment that already exists on disk must be a real file or
/// directory; a symlink anywhere below `root` is refused. The walk stops at
/// the first segment that does not exist yet.
pub fn resolve_under(root: &Path, relative_path: &str) -> Result<PathBuf, UnsafePathReason> {
    check_relative_path(relative_path)?;

    let mut path = root.to_path_buf();
    let mut exists = true;

    for segment in relative_path.split('/') {
        path.push(segment);
        if exists {
            match std::fs::symlink_metadata(&path) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Err(UnsafePathReason::Symlink);
                }
                Ok(_) => {}
                // Missing, or unreadable: the caller's own I/O reports it.
                Err(_) => exists = false,
            }
        }
    }

    Ok(path)
}

/// Last segment of a slash-separated path.
pub fn file_name(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

fn has_drive_prefix(relative_path: &str) -> bool {
    let bytes = relative_path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}
