//! Scan command implementation

use colored::Colorize;

use xcsync_core::SyncEngine;

use crate::error::Result;

/// Run the scan command
///
/// Lists allow-listed files under the source root without reading the
/// manifest.
pub fn run_scan(engine: &SyncEngine, json: bool) -> Result<()> {
    let files = engine.scan()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    println!(
        "{} Scanning {}...",
        "=>".blue().bold(),
        engine.source_root()
    );
    for file in &files {
        let kind = if file.is_dir { " (bundle)" } else { "" };
        println!("   {}{}", file.relative.cyan(), kind.dimmed());
    }
    println!("{} Found {} file(s).", "OK".green().bold(), files.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcsync_core::SyncConfig;
    use xcsync_fs::NormalizedPath;
    use xcsync_test_utils::project::TestProject;

    #[test]
    fn test_scan_without_manifest() {
        let project = TestProject::new();
        project.write_source("App.swift", "");
        let path = project.write_config("");
        let engine = SyncEngine::new(SyncConfig::load(&NormalizedPath::new(path)).unwrap()).unwrap();

        assert!(run_scan(&engine, false).is_ok());
        assert!(run_scan(&engine, true).is_ok());
    }
}
