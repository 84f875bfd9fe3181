use std::sync::Arc;

use crate::manifest::{ManifestError, RemoteManifest};

/// Errors that can occur when talking to a manifest source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("template set not found: {0}")]
    NotFound(String),

    /// The backing repository or branch is missing or not visible with
    /// the current credentials.
    #[error("repository not found or not accessible: {0}")]
    RepositoryNotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("extraction error: {0}")]
    Extraction(String),

    #[error(transparent)]
    InvalidManifest(#[from] ManifestError),

    #[error("{0}")]
    Other(String),
}

/// A remote tree of named template sets.
///
/// Sources know how to enumerate the sets they hold and how to fetch one
/// set as an ordered manifest.
#[async_trait::async_trait]
pub trait ManifestSource: Send + Sync {
    /// Human-readable label identifying this source.
    fn label(&self) -> &str;

    /// Names of the template sets this source offers.
    async fn list_sets(&self) -> Result<Vec<String>, SourceError>;

    /// Fetch every file of one template set, in discovery order.
    async fn fetch_manifest(&self, set_name: &str) -> Result<RemoteManifest, SourceError>;
}

#[async_trait::async_trait]
impl<T: ManifestSource + ?Sized> ManifestSource for Arc<T> {
    fn label(&self) -> &str {
        (**self).label()
    }

    async fn list_sets(&self) -> Result<Vec<String>, SourceError> {
        (**self).list_sets().await
    }

    async fn fetch_manifest(&self, set_name: &str) -> Result<RemoteManifest, SourceError> {
        (**self).fetch_manifest(set_name).await
    }
}
