mod commands;
mod config;
mod logging;
mod prompt;
mod sources;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use template_sync::ManifestSource;

use crate::commands::format::OutputFormat;
use crate::commands::sync::SyncArgs;
use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "template-sync")]
#[command(about = "Sync template sets from remote sources into a working directory")]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy a template set into a directory, asking before overwriting local edits
    Sync {
        /// Template set name (prompted for when omitted in a terminal)
        set: Option<String>,
        /// Target directory (defaults to current directory)
        #[arg(long, default_value = ".")]
        target: PathBuf,
        /// Only look in the source with this label
        #[arg(long)]
        source: Option<String>,
        /// Never prompt; locally modified files are skipped
        #[arg(long, short = 'y', visible_alias = "yes")]
        non_interactive: bool,
        /// Show what would happen without writing anything
        #[arg(long)]
        dry_run: bool,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// List template sets offered by the configured sources
    List {
        /// Filter by source label
        #[arg(long)]
        source: Option<String>,
    },
    /// Show configured sources
    Sources,
}

fn build_from_config(app_config: &AppConfig) -> Result<Vec<Arc<dyn ManifestSource>>> {
    let built: Vec<Arc<dyn ManifestSource>> = app_config
        .enabled_sources()
        .map(sources::build_source_for)
        .collect();

    if built.is_empty() {
        let hint = config::config_path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "the config file".into());
        anyhow::bail!("no template sources configured; add a [[sources]] entry to {hint}");
    }

    Ok(built)
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("warning: could not initialize logging: {e}");
    }

    let app_config = config::load_config();

    match cli.command {
        Command::Sync {
            set,
            target,
            source,
            non_interactive,
            dry_run,
            format,
        } => {
            let all = build_from_config(&app_config)?;
            let args = SyncArgs {
                set,
                target,
                source,
                non_interactive,
                dry_run,
                format,
            };
            commands::sync::run(&all, args, &app_config.prompt_suffixes).await
        }
        Command::List { source } => {
            let all = build_from_config(&app_config)?;
            commands::list::run(&all, source.as_deref()).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Sources => {
            commands::sources::run(&app_config);
            Ok(ExitCode::SUCCESS)
        }
    }
}
