//! Runs one synchronization: classify, resolve, write, report.
//!
//! Every failure is fatal to the run. Nothing is written before resolution
//! finishes, so scan failures and cancellation leave the target untouched.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::classify::{Classification, Classified, classify};
use crate::manifest::{RemoteFile, RemoteManifest};
use crate::report::{StatusLine, Summary, report};
use crate::resolve::{
    ChangedFilePrompt, PromptDocumentSelector, ResolveError, ResolveMode, Resolutions, resolve,
};
use crate::scan::ScanError;
use crate::source::{ManifestSource, SourceError};
use crate::write::{WriteError, write};

/// Run-level failures, one per stage.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("template source unavailable: {0}")]
    SourceUnavailable(#[source] SourceError),

    #[error("local scan failed: {0}")]
    Scan(#[from] ScanError),

    #[error("sync cancelled by operator")]
    Cancelled,

    #[error("could not resolve changed files: {0}")]
    Resolve(#[source] ResolveError),

    #[error("write failed: {0}")]
    Write(#[from] WriteError),
}

impl SyncError {
    /// True when the operator aborted the run; callers should exit quietly.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<ResolveError> for SyncError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Cancelled => Self::Cancelled,
            other => Self::Resolve(other),
        }
    }
}

/// Boxed default-selection predicate for Changed files.
pub type DefaultSelector = Box<dyn Fn(&RemoteFile) -> bool + Send + Sync>;

/// How a run decides Changed files.
pub struct SyncOptions {
    pub mode: ResolveMode,
    pub default_selector: DefaultSelector,
}

impl SyncOptions {
    pub fn new(mode: ResolveMode, default_selector: DefaultSelector) -> Self {
        Self {
            mode,
            default_selector,
        }
    }

    /// Interactive run pre-selecting prompt and instruction documents.
    pub fn interactive(selector: PromptDocumentSelector) -> Self {
        Self::new(
            ResolveMode::Interactive,
            Box::new(move |file: &RemoteFile| selector.selects(file)),
        )
    }

    /// Non-interactive run; Changed files are always skipped.
    pub fn non_interactive() -> Self {
        Self::new(ResolveMode::NonInteractive, Box::new(|_: &RemoteFile| false))
    }
}

impl std::fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncOptions")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub set_name: String,
    pub target_root: PathBuf,
    pub lines: Vec<StatusLine>,
    #[serde(skip)]
    pub written_paths: Vec<PathBuf>,
}

impl SyncReport {
    pub fn summary(&self) -> Summary {
        Summary::from_lines(&self.lines)
    }
}

/// Dry-run line: a manifest path and how it compares to the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanLine {
    pub relative_path: String,
    pub classification: Classification,
}

/// Files that will be written: every New file, plus Changed files approved
/// for overwrite. Manifest order is kept.
pub fn write_set<'m>(classified: &Classified<'m>, resolutions: &Resolutions) -> Vec<&'m RemoteFile> {
    classified
        .entries()
        .iter()
        .filter(|(file, class)| match class {
            Classification::New => true,
            Classification::Identical => false,
            Classification::Changed => resolutions.overwrite(&file.relative_path) == Some(true),
        })
        .map(|(file, _)| *file)
        .collect()
}

/// Reconcile `manifest` into `target_root`.
pub fn synchronize(
    manifest: &RemoteManifest,
    target_root: &Path,
    options: &SyncOptions,
    prompt: &dyn ChangedFilePrompt,
) -> Result<SyncReport, SyncError> {
    let classified = classify(manifest, target_root)?;
    let changed = classified.changed();

    tracing::info!(
        set = manifest.set_name(),
        total = classified.len(),
        new = classified.new_files().len(),
        identical = classified.identical().len(),
        changed = changed.len(),
        "classified manifest"
    );

    let resolutions = resolve(
        &changed,
        options.mode,
        &*options.default_selector,
        prompt,
    )?;

    let to_write = write_set(&classified, &resolutions);
    let written_paths = write(&to_write, target_root)?;
    tracing::info!(written = written_paths.len(), target = %target_root.display(), "wrote files");

    let lines = report(manifest, &classified, &resolutions);

    Ok(SyncReport {
        set_name: manifest.set_name().to_owned(),
        target_root: target_root.to_path_buf(),
        lines,
        written_paths,
    })
}

/// Classify without writing or prompting.
pub fn plan(manifest: &RemoteManifest, target_root: &Path) -> Result<Vec<PlanLine>, SyncError> {
    let classified = classify(manifest, target_root)?;

    Ok(classified
        .entries()
        .iter()
        .map(|(file, class)| PlanLine {
            relative_path: file.relative_path.clone(),
            classification: *class,
        })
        .collect())
}

/// Fetch one template set, mapping any source failure to
/// [`SyncError::SourceUnavailable`].
pub async fn fetch(
    source: &dyn ManifestSource,
    set_name: &str,
) -> Result<RemoteManifest, SyncError> {
    let manifest = source
        .fetch_manifest(set_name)
        .await
        .map_err(SyncError::SourceUnavailable)?;

    tracing::info!(
        source = source.label(),
        set = set_name,
        files = manifest.len(),
        "fetched manifest"
    );

    Ok(manifest)
}

/// Fetch a set from `source` and reconcile it into `target_root`.
/// Nothing on disk is touched when the fetch fails.
pub async fn fetch_and_synchronize(
    source: &dyn ManifestSource,
    set_name: &str,
    target_root: &Path,
    options: &SyncOptions,
    prompt: &dyn ChangedFilePrompt,
) -> Result<SyncReport, SyncError> {
    let manifest = fetch(source, set_name).await?;
    synchronize(&manifest, target_root, options, prompt)
}
