use std::io::Read;

use flate2::read::GzDecoder;
use template_sync::SourceError;

/// A regular file extracted from a GitHub repository tarball.
#[derive(Debug, Clone)]
pub struct RepoFile {
    /// Path relative to the repository root (GitHub root prefix stripped).
    pub path: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
}

/// Downloads and unpacks GitHub repository tarballs.
///
/// Returns every regular file in archive order. Filtering by template set
/// happens in [`crate::GitHubTemplateSource`].
pub struct TarballClient {
    client: reqwest::Client,
    token: Option<String>,
    api_base_url: Option<String>,
}

impl TarballClient {
    pub fn new(token: Option<String>, api_base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            api_base_url,
        }
    }

    fn tarball_url(&self, owner: &str, repo: &str, branch: &str) -> String {
        format!(
            "{}/repos/{}/{}/tarball/{}",
            self.api_base_url.as_deref().unwrap_or(crate::DEFAULT_API_BASE),
            owner,
            repo,
            branch,
        )
    }

    pub async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<Vec<RepoFile>, SourceError> {
        let url = self.tarball_url(owner, repo, branch);
        tracing::debug!(%url, "downloading tarball");

        let response = crate::get(&self.client, &url, self.token.as_deref())
            .send()
            .await
            .map_err(|e| SourceError::Network(format!("tarball download failed: {e}")))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::RepositoryNotFound(format!(
                "{owner}/{repo}@{branch} (private repositories need GITHUB_TOKEN)"
            )));
        }

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "tarball download returned HTTP {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SourceError::Network(format!("failed to read tarball body: {e}")))?;

        extract_files(&bytes)
    }
}

fn extract_files(tarball_bytes: &[u8]) -> Result<Vec<RepoFile>, SourceError> {
    let mut archive = tar::Archive::new(GzDecoder::new(tarball_bytes));

    let entries = archive
        .entries()
        .map_err(|e| SourceError::Extraction(format!("failed to read tar entries: {e}")))?;

    let mut files = Vec::new();

    for entry_result in entries {
        let mut entry = entry_result
            .map_err(|e| SourceError::Extraction(format!("failed to read tar entry: {e}")))?;

        let entry_path = entry
            .path()
            .map_err(|e| SourceError::Extraction(format!("invalid path in tar: {e}")))?
            .to_string_lossy()
            .into_owned();

        match entry.header().entry_type() {
            tar::EntryType::Regular => {}
            tar::EntryType::Directory | tar::EntryType::XGlobalHeader => continue,
            other => {
                tracing::warn!(path = %entry_path, kind = ?other, "skipping non-regular tar entry");
                continue;
            }
        }

        // First component is GitHub's "owner-repo-sha/" wrapper.
        let Some((_, without_root)) = entry_path.split_once('/') else {
            continue;
        };
        if without_root.is_empty() {
            continue;
        }

        let mut content = Vec::new();
        entry.read_to_end(&mut content).map_err(|e| {
            SourceError::Extraction(format!("failed to read {without_root}: {e}"))
        })?;

        files.push(RepoFile {
            path: without_root.to_owned(),
            content,
        });
    }

    Ok(files)
}
