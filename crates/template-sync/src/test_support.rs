use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{
    ChangedFilePrompt, ManifestSource, PromptError, RemoteFile, RemoteManifest, Selection,
    SourceError,
};

/// In-memory source for testing. Holds template sets keyed by name.
pub struct InMemorySource {
    label: String,
    sets: BTreeMap<String, Vec<RemoteFile>>,
}

impl InMemorySource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            sets: BTreeMap::new(),
        }
    }

    pub fn add_set(&mut self, name: impl Into<String>, files: Vec<RemoteFile>) {
        self.sets.insert(name.into(), files);
    }
}

#[async_trait::async_trait]
impl ManifestSource for InMemorySource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_sets(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.sets.keys().cloned().collect())
    }

    async fn fetch_manifest(&self, set_name: &str) -> Result<RemoteManifest, SourceError> {
        let files = self
            .sets
            .get(set_name)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(set_name.to_owned()))?;
        Ok(RemoteManifest::new(set_name, files)?)
    }
}

enum Script {
    ChoosePaths(Vec<String>),
    AcceptDefaults,
    Cancel,
}

/// Prompt with a canned answer that remembers what it was shown.
pub struct ScriptedPrompt {
    script: Script,
    calls: Mutex<Vec<Vec<(String, bool)>>>,
}

impl ScriptedPrompt {
    /// Select exactly the files with these relative paths.
    pub fn choosing(paths: &[&str]) -> Self {
        Self::new(Script::ChoosePaths(
            paths.iter().map(|p| (*p).to_owned()).collect(),
        ))
    }

    /// Confirm the pre-selection unchanged.
    pub fn accepting_defaults() -> Self {
        Self::new(Script::AcceptDefaults)
    }

    pub fn cancelling() -> Self {
        Self::new(Script::Cancel)
    }

    fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every invocation: the listed paths with their pre-selection.
    pub fn calls(&self) -> Vec<Vec<(String, bool)>> {
        self.calls.lock().unwrap().clone()
    }
}

impl ChangedFilePrompt for ScriptedPrompt {
    fn select(&self, changed: &[&RemoteFile], defaults: &[bool]) -> Result<Selection, PromptError> {
        self.calls.lock().unwrap().push(
            changed
                .iter()
                .zip(defaults)
                .map(|(file, default)| (file.relative_path.clone(), *default))
                .collect(),
        );

        Ok(match &self.script {
            Script::Cancel => Selection::Cancelled,
            Script::AcceptDefaults => Selection::Chosen(
                defaults
                    .iter()
                    .enumerate()
                    .filter(|(_, selected)| **selected)
                    .map(|(i, _)| i)
                    .collect(),
            ),
            Script::ChoosePaths(paths) => Selection::Chosen(
                changed
                    .iter()
                    .enumerate()
                    .filter(|(_, file)| paths.contains(&file.relative_path))
                    .map(|(i, _)| i)
                    .collect(),
            ),
        })
    }
}
