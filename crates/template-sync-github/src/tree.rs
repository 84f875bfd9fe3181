use serde::Deserialize;
use template_sync::SourceError;

/// Response from GitHub's Git Trees API.
/// `GET /repos/{owner}/{repo}/git/trees/{branch}?recursive=1`
#[derive(Debug, Deserialize)]
pub struct TreeResponse {
    pub sha: String,
    pub tree: Vec<TreeEntry>,
    #[serde(default)]
    pub truncated: bool,
}

/// A single entry in the tree.
#[derive(Debug, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub entry_type: String,
}

impl TreeEntry {
    pub fn is_dir(&self) -> bool {
        self.entry_type == "tree"
    }
}

/// Reads a branch's recursive tree listing.
pub struct TreeClient {
    client: reqwest::Client,
    token: Option<String>,
    api_base_url: Option<String>,
}

impl TreeClient {
    pub fn new(token: Option<String>, api_base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            api_base_url,
        }
    }

    pub async fn fetch(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<TreeResponse, SourceError> {
        let url = format!(
            "{}/repos/{}/{}/git/trees/{}?recursive=1",
            self.api_base_url.as_deref().unwrap_or(crate::DEFAULT_API_BASE),
            owner,
            repo,
            branch,
        );
        tracing::debug!(%url, "listing tree");

        let response = crate::get(&self.client, &url, self.token.as_deref())
            .send()
            .await
            .map_err(|e| SourceError::Network(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::RepositoryNotFound(format!(
                "{owner}/{repo}@{branch} (private repositories need GITHUB_TOKEN)"
            )));
        }

        if !response.status().is_success() {
            return Err(SourceError::Network(format!(
                "tree listing returned HTTP {}",
                response.status()
            )));
        }

        let tree: TreeResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Other(format!("malformed tree response: {e}")))?;

        if tree.truncated {
            tracing::warn!(
                owner,
                repo,
                "tree response was truncated; set list may be incomplete"
            );
        }

        Ok(tree)
    }
}
