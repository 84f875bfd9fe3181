use std::fmt;

use serde::Serialize;

use crate::classify::{Classification, Classified};
use crate::manifest::RemoteManifest;
use crate::resolve::Resolutions;

/// Final outcome for one manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Written,
    Skipped,
    Unchanged,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Written => write!(f, "written"),
            Self::Skipped => write!(f, "skipped"),
            Self::Unchanged => write!(f, "unchanged"),
        }
    }
}

/// One reported line: a manifest path and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusLine {
    pub relative_path: String,
    pub status: Status,
}

/// Outcome of one classified entry under the given decisions.
///
/// A Changed file without a decision counts as skipped.
pub fn status_for(class: Classification, overwrite: Option<bool>) -> Status {
    match (class, overwrite) {
        (Classification::Identical, _) => Status::Unchanged,
        (Classification::New, _) => Status::Written,
        (Classification::Changed, Some(true)) => Status::Written,
        (Classification::Changed, _) => Status::Skipped,
    }
}

/// One status line per manifest entry, in manifest order.
///
/// `classified` must come from the same manifest; an entry it does not know
/// is reported as skipped.
pub fn report(
    manifest: &RemoteManifest,
    classified: &Classified<'_>,
    resolutions: &Resolutions,
) -> Vec<StatusLine> {
    manifest
        .iter()
        .map(|file| {
            let class = classified
                .classification_of(&file.relative_path)
                .unwrap_or(Classification::Changed);
            StatusLine {
                relative_path: file.relative_path.clone(),
                status: status_for(class, resolutions.overwrite(&file.relative_path)),
            }
        })
        .collect()
}

/// Per-status counts for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
    pub unchanged: usize,
}

impl Summary {
    pub fn from_lines(lines: &[StatusLine]) -> Self {
        lines.iter().fold(Self::default(), |mut acc, line| {
            match line.status {
                Status::Written => acc.written += 1,
                Status::Skipped => acc.skipped += 1,
                Status::Unchanged => acc.unchanged += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped + self.unchanged
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} skipped, {} unchanged",
            self.written, self.skipped, self.unchanged
        )
    }
}
