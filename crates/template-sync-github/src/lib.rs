pub mod repo_source;
pub mod tarball;
pub mod tree;

pub use repo_source::{GitHubTemplateSource, GitHubTemplateSourceConfig};
pub use tarball::{RepoFile, TarballClient};
pub use tree::{TreeClient, TreeEntry, TreeResponse};

pub(crate) const DEFAULT_API_BASE: &str = "https://api.github.com";
pub(crate) const USER_AGENT: &str = "template-sync";

/// GET `url` with the headers every GitHub call needs.
pub(crate) fn get(
    client: &reqwest::Client,
    url: &str,
    token: Option<&str>,
) -> reqwest::RequestBuilder {
    let mut req = client.get(url).header("User-Agent", USER_AGENT);

    if let Some(token) = token {
        req = req.header("Authorization", format!("Bearer {token}"));
    }

    req
}
