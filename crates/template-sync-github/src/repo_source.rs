use std::collections::BTreeSet;

use template_sync::{ManifestSource, RemoteFile, RemoteManifest, SourceError};

use crate::tarball::{RepoFile, TarballClient};
use crate::tree::{TreeClient, TreeResponse};

/// Configuration for a GitHub repository holding template sets.
#[derive(Debug, Clone)]
pub struct GitHubTemplateSourceConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Directory whose immediate children are the template sets.
    pub base_path: Option<String>,
    pub token: Option<String>,
    pub api_base_url: Option<String>,
}

/// Template sets stored as directories of a GitHub repository.
pub struct GitHubTemplateSource {
    config: GitHubTemplateSourceConfig,
    label: String,
    tree: TreeClient,
    tarball: TarballClient,
}

impl GitHubTemplateSource {
    pub fn new(config: GitHubTemplateSourceConfig) -> Self {
        let label = config.repo.clone();
        Self::with_label(config, label)
    }

    pub fn with_label(config: GitHubTemplateSourceConfig, label: impl Into<String>) -> Self {
        let tree = TreeClient::new(config.token.clone(), config.api_base_url.clone());
        let tarball = TarballClient::new(config.token.clone(), config.api_base_url.clone());

        Self {
            config,
            label: label.into(),
            tree,
            tarball,
        }
    }

    /// `base_path` with a trailing slash, or empty for the repository root.
    fn base_prefix(&self) -> String {
        match self.config.base_path.as_deref().map(|bp| bp.trim_matches('/')) {
            Some(bp) if !bp.is_empty() => format!("{bp}/"),
            _ => String::new(),
        }
    }

    fn set_names(&self, tree: &TreeResponse) -> Vec<String> {
        let prefix = self.base_prefix();

        let names: BTreeSet<&str> = tree
            .tree
            .iter()
            .filter(|entry| entry.is_dir())
            .filter_map(|entry| entry.path.strip_prefix(prefix.as_str()))
            .filter(|relative| !relative.is_empty() && !relative.contains('/'))
            .filter(|name| !name.starts_with('.'))
            .collect();

        names.into_iter().map(str::to_owned).collect()
    }

    /// Keep files under `<base_path>/<set_name>/`, relative to the set.
    fn select_set(&self, files: Vec<RepoFile>, set_name: &str) -> Vec<RemoteFile> {
        let set_prefix = format!("{}{}/", self.base_prefix(), set_name);

        files
            .into_iter()
            .filter_map(|file| {
                let relative = file.path.strip_prefix(&set_prefix)?;
                (!relative.is_empty()).then(|| RemoteFile::new(relative, file.content))
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl ManifestSource for GitHubTemplateSource {
    fn label(&self) -> &str {
        &self.label
    }

    async fn list_sets(&self) -> Result<Vec<String>, SourceError> {
        let tree = self
            .tree
            .fetch(&self.config.owner, &self.config.repo, &self.config.branch)
            .await?;

        Ok(self.set_names(&tree))
    }

    async fn fetch_manifest(&self, set_name: &str) -> Result<RemoteManifest, SourceError> {
        if set_name.is_empty() || set_name.contains(['/', '\\']) || set_name == ".." {
            return Err(SourceError::NotFound(set_name.to_owned()));
        }

        let files = self
            .tarball
            .fetch(&self.config.owner, &self.config.repo, &self.config.branch)
            .await?;

        let selected = self.select_set(files, set_name);
        if selected.is_empty() {
            return Err(SourceError::NotFound(set_name.to_owned()));
        }

        tracing::debug!(
            source = %self.label,
            set = set_name,
            files = selected.len(),
            "extracted template set"
        );

        Ok(RemoteManifest::new(set_name, selected)?)
    }
}
