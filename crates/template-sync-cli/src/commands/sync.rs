use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use template_sync::{
    ManifestSource, PromptDocumentSelector, RemoteManifest, SourceError, SyncError, SyncOptions,
    fetch, plan, synchronize,
};

use super::format::{self, OutputFormat};
use crate::prompt::{self, DialoguerPrompt};
use crate::sources;

/// Exit status for an operator cancel, as for SIGINT.
const CANCELLED: u8 = 130;

pub struct SyncArgs {
    pub set: Option<String>,
    pub target: PathBuf,
    pub source: Option<String>,
    pub non_interactive: bool,
    pub dry_run: bool,
    pub format: OutputFormat,
}

pub async fn run(
    all: &[Arc<dyn ManifestSource>],
    args: SyncArgs,
    prompt_suffixes: &[String],
) -> Result<ExitCode> {
    let interactive = !args.non_interactive && std::io::stdin().is_terminal();
    let candidates = sources::select(all, args.source.as_deref());
    if candidates.is_empty() {
        bail!(
            "no configured source matches {:?}",
            args.source.as_deref().unwrap_or_default()
        );
    }

    let manifest = match &args.set {
        Some(set) => fetch_from_any(&candidates, set).await?,
        None if interactive => match choose_set(&candidates).await? {
            Some((source, set)) => fetch(&**source, &set).await?,
            None => return Ok(cancelled()),
        },
        None => bail!("no template set given; pass SET or run in a terminal to choose one"),
    };

    if args.dry_run {
        let lines = plan(&manifest, &args.target)?;
        println!(
            "{}",
            format::render_plan(manifest.set_name(), &args.target, &lines, args.format)?
        );
        return Ok(ExitCode::SUCCESS);
    }

    let options = if interactive {
        SyncOptions::interactive(PromptDocumentSelector::new(prompt_suffixes.iter().cloned()))
    } else {
        SyncOptions::non_interactive()
    };

    match synchronize(&manifest, &args.target, &options, &DialoguerPrompt) {
        Ok(report) => {
            println!("{}", format::render_report(&report, args.format)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_cancellation() => Ok(cancelled()),
        Err(e) => Err(e).with_context(|| {
            format!(
                "failed to sync {} into {}",
                manifest.set_name(),
                args.target.display()
            )
        }),
    }
}

fn cancelled() -> ExitCode {
    eprintln!("Sync cancelled; nothing was written.");
    ExitCode::from(CANCELLED)
}

/// First source holding `set` wins. A missing set or an unreachable
/// repository moves on to the next source; the reasons are kept for the
/// final error.
async fn fetch_from_any(
    candidates: &[&Arc<dyn ManifestSource>],
    set: &str,
) -> Result<RemoteManifest> {
    let mut misses = Vec::new();

    for &source in candidates {
        match fetch(&**source, set).await {
            Ok(manifest) => return Ok(manifest),
            Err(SyncError::SourceUnavailable(
                e @ (SourceError::NotFound(_) | SourceError::RepositoryNotFound(_)),
            )) => {
                if matches!(e, SourceError::RepositoryNotFound(_)) {
                    tracing::warn!(source = source.label(), error = %e, "source unreachable");
                } else {
                    tracing::debug!(source = source.label(), set, "set not in source");
                }
                misses.push(format!("[{}] {e}", source.label()));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("fetching from [{}]", source.label()));
            }
        }
    }

    bail!("template set not found: {set} ({})", misses.join("; "));
}

async fn choose_set<'a>(
    candidates: &[&'a Arc<dyn ManifestSource>],
) -> Result<Option<(&'a Arc<dyn ManifestSource>, String)>> {
    let mut choices = Vec::new();

    for source in candidates {
        match source.list_sets().await {
            Ok(sets) => choices.extend(sets.into_iter().map(|set| (*source, set))),
            Err(e) => {
                tracing::warn!(source = source.label(), error = %e, "could not list template sets");
            }
        }
    }

    if choices.is_empty() {
        bail!("no template sets available");
    }

    let labels: Vec<String> = if candidates.len() > 1 {
        choices
            .iter()
            .map(|(source, set)| format!("{set}  [{}]", source.label()))
            .collect()
    } else {
        choices.iter().map(|(_, set)| set.clone()).collect()
    };

    let picked = prompt::choose_one("Template set", &labels)?;
    Ok(picked.map(|index| choices.swap_remove(index)))
}

#[cfg(test)]
mod tests {
    use template_sync::RemoteFile;
    use template_sync::test_support::InMemorySource;

    use super::*;

    fn source(label: &str, sets: &[&str]) -> Arc<dyn ManifestSource> {
        let mut source = InMemorySource::new(label);
        for set in sets {
            source.add_set(*set, vec![RemoteFile::new(format!("{label}.md"), *set)]);
        }
        Arc::new(source)
    }

    #[tokio::test]
    async fn first_source_with_the_set_wins() {
        let all = vec![source("alpha", &["docs"]), source("beta", &["starter"])];
        let candidates = sources::select(&all, None);

        let manifest = fetch_from_any(&candidates, "starter").await.unwrap();
        assert_eq!(manifest.files()[0].relative_path, "beta.md");
    }

    #[tokio::test]
    async fn set_missing_everywhere_is_an_error() {
        let all = vec![source("alpha", &["docs"])];
        let candidates = sources::select(&all, None);

        let err = fetch_from_any(&candidates, "starter").await.unwrap_err();
        assert!(err.to_string().contains("template set not found: starter"));
        assert!(err.to_string().contains("[alpha]"));
    }

    struct Unreachable;

    #[async_trait::async_trait]
    impl ManifestSource for Unreachable {
        fn label(&self) -> &str {
            "private"
        }

        async fn list_sets(&self) -> Result<Vec<String>, SourceError> {
            Err(SourceError::RepositoryNotFound("acme/private@main".into()))
        }

        async fn fetch_manifest(&self, _: &str) -> Result<RemoteManifest, SourceError> {
            Err(SourceError::RepositoryNotFound("acme/private@main".into()))
        }
    }

    #[tokio::test]
    async fn unreachable_repository_is_named_in_the_error() {
        let all: Vec<Arc<dyn ManifestSource>> = vec![Arc::new(Unreachable), source("alpha", &[])];
        let candidates = sources::select(&all, None);

        let message = fetch_from_any(&candidates, "starter")
            .await
            .unwrap_err()
            .to_string();

        assert!(message.contains("[private] repository not found or not accessible"));
        assert!(message.contains("[alpha] template set not found: starter"));
    }

    #[tokio::test]
    async fn unreachable_repository_falls_through_to_next_source() {
        let all: Vec<Arc<dyn ManifestSource>> =
            vec![Arc::new(Unreachable), source("beta", &["starter"])];
        let candidates = sources::select(&all, None);

        let manifest = fetch_from_any(&candidates, "starter").await.unwrap();
        assert_eq!(manifest.set_name(), "starter");
    }
}
