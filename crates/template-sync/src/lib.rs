pub mod classify;
pub mod digest;
pub mod manifest;
pub mod path;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod scan;
pub mod source;
pub mod write;

pub use classify::{Classification, Classified, classify};
pub use digest::{ContentDigest, digest};
pub use manifest::{ManifestError, RemoteFile, RemoteManifest};
pub use pipeline::{
    DefaultSelector, PlanLine, SyncError, SyncOptions, SyncReport, fetch, fetch_and_synchronize,
    plan, synchronize,
};
pub use report::{Status, StatusLine, Summary, report};
pub use resolve::{
    ChangedFilePrompt, PromptDocumentSelector, PromptError, ResolveError, ResolveMode,
    Resolutions, Selection, resolve,
};
pub use scan::{LocalFileState, ScanError, stat};
pub use source::{ManifestSource, SourceError};
pub use write::{WriteError, write};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
