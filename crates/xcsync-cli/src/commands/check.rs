//! Check command implementation

use colored::Colorize;

use xcsync_core::{CheckStatus, SyncEngine};

use crate::error::{CliError, Result};

/// Run the check command
///
/// Audits cross-references in the manifest. Fails unless it is healthy.
pub fn run_check(engine: &SyncEngine, json: bool) -> Result<()> {
    let report = engine.check()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "{} Checking {}...",
            "=>".blue().bold(),
            engine.manifest_path()
        );
        match report.status {
            CheckStatus::Healthy => {
                println!("{} Manifest is healthy. No dangling references.", "OK".green().bold());
            }
            CheckStatus::Inconsistent => {
                println!("{} Manifest references disagree:", "INCONSISTENT".yellow().bold());
                for finding in &report.findings {
                    println!(
                        "   {} {} {}: {}",
                        "!".yellow(),
                        finding.id.cyan(),
                        finding.name.as_deref().unwrap_or("").dimmed(),
                        finding.description
                    );
                }
                println!();
                println!("Run {} to repair.", "xcsync sync".cyan());
            }
            CheckStatus::Broken => {
                println!("{} Manifest could not be parsed:", "BROKEN".red().bold());
                for msg in &report.messages {
                    println!("   {} {}", "!".red(), msg);
                }
                println!();
                println!("Manual intervention may be required.");
            }
        }
    }

    match report.status {
        CheckStatus::Healthy => Ok(()),
        CheckStatus::Inconsistent => Err(CliError::user(format!(
            "manifest has {} integrity problem(s)",
            report.findings.len()
        ))),
        CheckStatus::Broken => Err(CliError::user("manifest is broken")),
    }
}
