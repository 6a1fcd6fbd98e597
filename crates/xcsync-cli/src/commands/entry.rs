//! Add and remove command implementations

use std::path::Path;

use colored::Colorize;

use xcsync_core::{AddOptions, SyncEngine, SyncOptions};
use xcsync_pbx::ObjectId;

use super::sync::{print_changes, print_outcome};
use crate::error::{CliError, Result};

/// Arguments of the add command, after parsing
#[derive(Debug, Clone, Default)]
pub struct AddArgs<'a> {
    pub group: Option<&'a str>,
    pub file_id: Option<&'a str>,
    pub build_id: Option<&'a str>,
    pub dry_run: bool,
}

/// Run the add command
///
/// `file` is relative to `cwd`. With both identifiers, an existing entry of
/// the same name is replaced.
pub fn run_add(engine: &SyncEngine, cwd: &Path, file: &Path, args: AddArgs<'_>) -> Result<()> {
    let ids = match (args.file_id, args.build_id) {
        (Some(file_id), Some(build_id)) => {
            Some((ObjectId::parse(file_id)?, ObjectId::parse(build_id)?))
        }
        (None, None) => None,
        _ => {
            return Err(CliError::user(
                "--file-id and --build-id must be given together",
            ));
        }
    };

    let path = cwd.join(file);
    println!(
        "{} Adding {}...",
        "=>".blue().bold(),
        path.display()
    );

    let report = engine.add_file(
        &path.to_string_lossy(),
        AddOptions {
            group: args.group.map(str::to_string),
            ids,
        },
        SyncOptions {
            dry_run: args.dry_run,
        },
    )?;

    if report.changed() {
        for file in &report.plan.to_add {
            println!("   {} {}", "+".green(), file.name.cyan());
        }
    }
    for reason in &report.skipped {
        println!("   {} {}", "!".yellow(), reason);
    }
    print_outcome(&report);

    Ok(())
}

/// Run the remove command
pub fn run_remove(engine: &SyncEngine, names: &[String], dry_run: bool) -> Result<()> {
    println!(
        "{} Removing {} name(s) from {}...",
        "=>".blue().bold(),
        names.len(),
        engine.manifest_path()
    );

    let report = engine.remove_files(names, SyncOptions { dry_run })?;

    print_changes(&report);
    print_outcome(&report);

    Ok(())
}
