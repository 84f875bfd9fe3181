use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::digest::digest;
use crate::manifest::{RemoteFile, RemoteManifest};
use crate::scan::{LocalFileState, ScanError, stat};

/// How a remote file relates to what is on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// No local file at this path.
    New,
    /// Local file has the same content.
    Identical,
    /// Local file exists with different content.
    Changed,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Identical => write!(f, "identical"),
            Self::Changed => write!(f, "changed"),
        }
    }
}

/// A manifest partitioned into New / Identical / Changed, in manifest order.
#[derive(Debug, Clone)]
pub struct Classified<'m> {
    entries: Vec<(&'m RemoteFile, Classification)>,
    by_path: HashMap<&'m str, Classification>,
}

impl<'m> Classified<'m> {
    /// Every manifest entry with its classification, in manifest order.
    pub fn entries(&self) -> &[(&'m RemoteFile, Classification)] {
        &self.entries
    }

    pub fn new_files(&self) -> Vec<&'m RemoteFile> {
        self.bucket(Classification::New)
    }

    pub fn identical(&self) -> Vec<&'m RemoteFile> {
        self.bucket(Classification::Identical)
    }

    pub fn changed(&self) -> Vec<&'m RemoteFile> {
        self.bucket(Classification::Changed)
    }

    pub fn classification_of(&self, relative_path: &str) -> Option<Classification> {
        self.by_path.get(relative_path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn bucket(&self, wanted: Classification) -> Vec<&'m RemoteFile> {
        self.entries
            .iter()
            .filter(|(_, class)| *class == wanted)
            .map(|(file, _)| *file)
            .collect()
    }
}

/// Classify one remote file against its local counterpart.
pub fn classify_file(remote: &RemoteFile, local: &LocalFileState) -> Classification {
    match local.content() {
        None => Classification::New,
        Some(existing) if digest(existing) == digest(&remote.content) => Classification::Identical,
        Some(_) => Classification::Changed,
    }
}

/// Partition `manifest` against the files under `target_root`.
///
/// Comparison is by content digest only; timestamps and permissions are
/// ignored. The first scan error aborts the whole pass.
pub fn classify<'m>(
    manifest: &'m RemoteManifest,
    target_root: &Path,
) -> Result<Classified<'m>, ScanError> {
    let mut entries = Vec::with_capacity(manifest.len());
    let mut by_path = HashMap::with_capacity(manifest.len());

    for file in manifest {
        let local = stat(target_root, &file.relative_path)?;
        let class = classify_file(file, &local);
        tracing::debug!(path = %file.relative_path, %class, "classified");
        entries.push((file, class));
        by_path.insert(file.relative_path.as_str(), class);
    }

    Ok(Classified { entries, by_path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_local_is_new() {
        let remote = RemoteFile::new("a.md", "x");
        assert_eq!(
            classify_file(&remote, &LocalFileState::Missing),
            Classification::New
        );
    }

    #[test]
    fn same_bytes_are_identical() {
        let remote = RemoteFile::new("a.md", "x");
        let local = LocalFileState::Present(b"x".to_vec());
        assert_eq!(classify_file(&remote, &local), Classification::Identical);
    }

    #[test]
    fn different_bytes_are_changed() {
        let remote = RemoteFile::new("a.md", "x");
        let local = LocalFileState::Present(b"y".to_vec());
        assert_eq!(classify_file(&remote, &local), Classification::Changed);
    }

    #[test]
    fn empty_local_against_nonempty_remote_is_changed() {
        let remote = RemoteFile::new("a.md", "x");
        let local = LocalFileState::Present(Vec::new());
        assert_eq!(classify_file(&remote, &local), Classification::Changed);
    }

    #[test]
    fn buckets_follow_manifest_order() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("b.md"), "b").unwrap();
        std::fs::write(root.path().join("d.md"), "old").unwrap();

        let manifest = RemoteManifest::new(
            "set",
            vec![
                RemoteFile::new("d.md", "new"),
                RemoteFile::new("c.md", "c"),
                RemoteFile::new("b.md", "b"),
                RemoteFile::new("a.md", "a"),
            ],
        )
        .unwrap();

        let classified = classify(&manifest, root.path()).unwrap();
        let names = |files: Vec<&RemoteFile>| -> Vec<String> {
            files.into_iter().map(|f| f.relative_path.clone()).collect()
        };

        assert_eq!(names(classified.new_files()), vec!["c.md", "a.md"]);
        assert_eq!(names(classified.identical()), vec!["b.md"]);
        assert_eq!(names(classified.changed()), vec!["d.md"]);
        assert_eq!(classified.classification_of("b.md"), Some(Classification::Identical));
        assert_eq!(classified.classification_of("zzz.md"), None);
    }

    #[test]
    fn classification_serializes_lowercase() {
        let json = serde_json::to_string(&Classification::Identical).unwrap();
        assert_eq!(json, "\"identical\"");
    }
}
