use std::sync::Arc;

use anyhow::{Result, bail};
use template_sync::ManifestSource;

use crate::sources;

pub async fn run(all: &[Arc<dyn ManifestSource>], source_filter: Option<&str>) -> Result<()> {
    let selected = sources::select(all, source_filter);
    if selected.is_empty() {
        bail!("no configured source matches {:?}", source_filter.unwrap_or_default());
    }

    let mut failed = 0usize;

    for source in &selected {
        match source.list_sets().await {
            Ok(sets) => {
                println!("[{}] ({})", source.label(), sets.len());
                for set in sets {
                    println!("  {set}");
                }
            }
            Err(e) => {
                tracing::warn!(source = source.label(), error = %e, "could not list template sets");
                failed += 1;
            }
        }
    }

    if failed == selected.len() {
        bail!("all {failed} sources failed to list template sets");
    }

    Ok(())
}
