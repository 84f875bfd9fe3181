use std::sync::Arc;

use template_sync::ManifestSource;
use template_sync_github::{GitHubTemplateSource, GitHubTemplateSourceConfig};

use crate::config::{SourceEntry, SourceType};

fn github_token() -> Option<String> {
    std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty())
}

pub fn build_source_for(entry: &SourceEntry) -> Arc<dyn ManifestSource> {
    let token = github_token();
    match &entry.source_type {
        SourceType::GitHubRepo {
            owner,
            repo,
            branch,
            base_path,
        } => Arc::new(GitHubTemplateSource::with_label(
            GitHubTemplateSourceConfig {
                owner: owner.clone(),
                repo: repo.clone(),
                branch: branch.clone(),
                base_path: base_path.clone(),
                token,
                api_base_url: None,
            },
            &entry.label,
        )),
    }
}

/// Sources matching `filter`, or all of them.
pub fn select<'a>(
    sources: &'a [Arc<dyn ManifestSource>],
    filter: Option<&str>,
) -> Vec<&'a Arc<dyn ManifestSource>> {
    sources
        .iter()
        .filter(|source| filter.is_none_or(|label| source.label() == label))
        .collect()
}
