use std::fmt::Write as _;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use template_sync::{Classification, PlanLine, SyncReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Widest status word, for column alignment.
const STATUS_WIDTH: usize = 9;

pub fn render_report(report: &SyncReport, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonReport {
            report,
            summary: report.summary(),
        })?),
        OutputFormat::Text => {
            let mut out = String::new();
            for line in &report.lines {
                let status = line.status.to_string();
                let _ = writeln!(out, "  {status:<STATUS_WIDTH$}  {}", line.relative_path);
            }
            let _ = write!(
                out,
                "\n{} into {}: {}",
                report.set_name,
                report.target_root.display(),
                report.summary()
            );
            Ok(out)
        }
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a SyncReport,
    summary: template_sync::Summary,
}

pub fn render_plan(
    set_name: &str,
    target: &Path,
    lines: &[PlanLine],
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&JsonPlan {
            set_name,
            target_root: target,
            plan: lines,
        })?),
        OutputFormat::Text => {
            let mut out = String::new();
            for line in lines {
                let action = plan_action(line.classification);
                let _ = writeln!(out, "  {action:<STATUS_WIDTH$}  {}", line.relative_path);
            }
            let count = |class| lines.iter().filter(|l| l.classification == class).count();
            let _ = write!(
                out,
                "\n{set_name} into {} (dry run): {} new, {} changed, {} identical",
                target.display(),
                count(Classification::New),
                count(Classification::Changed),
                count(Classification::Identical),
            );
            Ok(out)
        }
    }
}

#[derive(Serialize)]
struct JsonPlan<'a> {
    set_name: &'a str,
    target_root: &'a Path,
    plan: &'a [PlanLine],
}

fn plan_action(class: Classification) -> &'static str {
    match class {
        Classification::New => "create",
        Classification::Changed => "differs",
        Classification::Identical => "same",
    }
}
