use std::collections::HashSet;

use crate::path::{UnsafePathReason, check_relative_path};

/// A single file of a template set, as delivered by a manifest source.
/// `relative_path` is slash-separated and relative to the set root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub relative_path: String,
    pub content: Vec<u8>,
}

impl RemoteFile {
    pub fn new(relative_path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Last segment of the relative path.
    pub fn file_name(&self) -> &str {
        crate::path::file_name(&self.relative_path)
    }
}

/// Errors raised while building a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("duplicate path in manifest: {0}")]
    DuplicatePath(String),

    #[error("unsafe path in manifest: {path} ({reason})")]
    UnsafePath {
        path: String,
        reason: UnsafePathReason,
    },
}

/// Ordered list of remote files for one named template set.
///
/// Order is discovery order from the source and is preserved through
/// classification and reporting. Paths are unique and safe to join onto a
/// target root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteManifest {
    set_name: String,
    files: Vec<RemoteFile>,
}

impl RemoteManifest {
    pub fn new(set_name: impl Into<String>, files: Vec<RemoteFile>) -> Result<Self, ManifestError> {
        let mut seen = HashSet::with_capacity(files.len());

        for file in &files {
            check_relative_path(&file.relative_path).map_err(|reason| {
                ManifestError::UnsafePath {
                    path: file.relative_path.clone(),
                    reason,
                }
            })?;

            if !seen.insert(file.relative_path.as_str()) {
                return Err(ManifestError::DuplicatePath(file.relative_path.clone()));
            }
        }

        Ok(Self {
            set_name: set_name.into(),
            files,
        })
    }

    pub fn set_name(&self) -> &str {
        &self.set_name
    }

    pub fn files(&self) -> &[RemoteFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RemoteFile> {
        self.files.iter()
    }
}

impl<'a> IntoIterator for &'a RemoteManifest {
    type Item = &'a RemoteFile;
    type IntoIter = std::slice::Iter<'a, RemoteFile>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_discovery_order() {
        let manifest = RemoteManifest::new(
            "starter",
            vec![
                RemoteFile::new("z.md", "z"),
                RemoteFile::new("a.md", "a"),
                RemoteFile::new("m/n.md", "n"),
            ],
        )
        .unwrap();

        let paths: Vec<&str> = manifest.iter().map(|f| f.relative_path.as_str()).collect();
        assert_eq!(paths, vec!["z.md", "a.md", "m/n.md"]);
        assert_eq!(manifest.set_name(), "starter");
    }

    #[test]
    fn rejects_duplicate_paths() {
        let result = RemoteManifest::new(
            "starter",
            vec![RemoteFile::new("a.md", "one"), RemoteFile::new("a.md", "two")],
        );
        assert!(matches!(result, Err(ManifestError::DuplicatePath(p)) if p == "a.md"));
    }

    #[test]
    fn rejects_escaping_paths() {
        let result = RemoteManifest::new("starter", vec![RemoteFile::new("../a.md", "x")]);
        assert!(matches!(
            result,
            Err(ManifestError::UnsafePath {
                reason: UnsafePathReason::ParentSegment,
                ..
            })
        ));
    }

    #[test]
    fn empty_manifest_is_allowed() {
        let manifest = RemoteManifest::new("empty", vec![]).unwrap();
        assert!(manifest.is_empty());
        assert_eq!(manifest.len(), 0);
    }

    #[test]
    fn file_name_is_last_segment() {
        let file = RemoteFile::new("prompts/review.prompt.md", "x");
        assert_eq!(file.file_name(), "review.prompt.md");
    }
}
