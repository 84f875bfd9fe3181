use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use template_sync::PromptDocumentSelector;

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// File-name suffixes pre-selected for overwrite in the prompt.
    #[serde(default = "default_prompt_suffixes")]
    pub prompt_suffixes: Vec<String>,
    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prompt_suffixes: default_prompt_suffixes(),
            sources: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceEntry> {
        self.sources.iter().filter(|entry| entry.enabled)
    }
}

/// A single source definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceEntry {
    pub label: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(flatten)]
    pub source_type: SourceType,
}

/// The kind of remote source.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum SourceType {
    /// GitHub repository whose directories under `base_path` are template sets.
    #[serde(rename = "github-repo")]
    GitHubRepo {
        owner: String,
        repo: String,
        #[serde(default = "default_branch")]
        branch: String,
        base_path: Option<String>,
    },
}

impl SourceType {
    pub fn describe(&self) -> String {
        match self {
            Self::GitHubRepo {
                owner,
                repo,
                branch,
                base_path,
            } => match base_path {
                Some(bp) => format!("github-repo {owner}/{repo}@{branch} ({bp})"),
                None => format!("github-repo {owner}/{repo}@{branch}"),
            },
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_branch() -> String {
    "main".into()
}

fn default_prompt_suffixes() -> Vec<String> {
    PromptDocumentSelector::DEFAULT_SUFFIXES
        .iter()
        .map(|s| (*s).to_owned())
        .collect()
}

/// Config file path: `~/.config/template-sync/config.toml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("template-sync").join("config.toml"))
}

/// Load config from file, falling back to defaults if missing.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to parse config, using defaults"
            ),
        }
    }

    AppConfig::default()
}
