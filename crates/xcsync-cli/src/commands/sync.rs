//! Sync and plan command implementations
//!
//! Both run scan, diff, and apply; `plan` never writes and prints the
//! unified diff of the manifest.

use colored::Colorize;

use xcsync_core::{SyncEngine, SyncOptions, SyncReport};

use crate::error::Result;

/// Print planned removals, additions, and skipped edits.
pub fn print_changes(report: &SyncReport) {
    for removal in &report.plan.to_remove {
        println!(
            "   {} {} ({})",
            "-".red(),
            removal.name.cyan(),
            removal.reason.to_string().dimmed()
        );
    }
    for file in &report.plan.pinned {
        println!("   {} {} ({})", "*".blue(), file.name.cyan(), "pinned".dimmed());
    }
    for file in &report.plan.to_add {
        println!("   {} {}", "+".green(), file.relative.cyan());
    }
    for reason in &report.skipped {
        println!("   {} {}", "!".yellow(), reason);
    }
    for edit in &report.edits {
        tracing::debug!(%edit, "edit");
    }
}

fn print_diff(report: &SyncReport) {
    if report.diff.is_empty() {
        return;
    }
    println!();
    for line in report.diff.unified.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}

/// Print the outcome line shared by sync, add, and remove.
pub fn print_outcome(report: &SyncReport) {
    if report.dry_run {
        if report.changed() {
            println!(
                "{} Dry run: {} line(s) added, {} removed. Manifest not written.",
                "OK".green().bold(),
                report.diff.inserted,
                report.diff.deleted
            );
        } else {
            println!("{} Dry run: no changes needed.", "OK".green().bold());
        }
    } else if report.written {
        println!(
            "{} Manifest updated ({} edit(s)).",
            "OK".green().bold(),
            report.edits.iter().filter(|e| !e.is_skipped()).count()
        );
    } else {
        println!("{} Already synchronized. No changes needed.", "OK".green().bold());
    }
}

/// Run the sync command
///
/// Adds new files, removes denylisted and missing ones, and writes the
/// manifest once.
pub fn run_sync(engine: &SyncEngine, dry_run: bool, json: bool) -> Result<()> {
    if json {
        let report = engine.sync(SyncOptions { dry_run })?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Synchronizing {}...",
        "=>".blue().bold(),
        engine.manifest_path()
    );

    let report = engine.sync(SyncOptions { dry_run })?;

    println!(
        "   Found {} file(s) under {}",
        report.discovered,
        engine.source_root()
    );
    print_changes(&report);
    if dry_run {
        print_diff(&report);
    }
    print_outcome(&report);

    Ok(())
}

/// Run the plan command
///
/// Same as `sync --dry-run`, with the unified diff always shown.
pub fn run_plan(engine: &SyncEngine, json: bool) -> Result<()> {
    run_sync(engine, true, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsync_core::SyncConfig;
    use xcsync_fs::NormalizedPath;
    use xcsync_test_utils::pbxproj::canonical;
    use xcsync_test_utils::project::TestProject;

    fn engine(project: &TestProject) -> SyncEngine {
        let path = project.write_config("");
        SyncEngine::new(SyncConfig::load(&NormalizedPath::new(path)).unwrap()).unwrap()
    }

    #[test]
    fn test_sync_in_step_project() {
        let project = TestProject::standard();
        let result = run_sync(&engine(&project), false, false);
        assert!(result.is_ok(), "run_sync failed: {:?}", result.err());
        assert_eq!(project.read_manifest(), canonical());
    }

    #[test]
    fn test_sync_writes_new_file() {
        let project = TestProject::standard();
        project.write_source("Place.swift", "struct Place {}\n");

        run_sync(&engine(&project), false, false).unwrap();

        project.assert_manifest_count("Place.swift in Sources", 2);
    }

    #[test]
    fn test_plan_does_not_write() {
        let project = TestProject::standard();
        project.write_source("Place.swift", "struct Place {}\n");

        run_plan(&engine(&project), false).unwrap();
        run_plan(&engine(&project), true).unwrap();

        assert_eq!(project.read_manifest(), canonical());
    }

    #[test]
    fn test_sync_missing_manifest_fails() {
        let project = TestProject::new();
        let err = run_sync(&engine(&project), false, false).unwrap_err();
        assert!(err.to_string().contains("Manifest not found"), "got: {err}");
    }
}
