//! Project context detection
//!
//! Finds the config file from any directory below it, the way git finds its
//! repository, then layers command-line values on top.

use std::path::{Path, PathBuf};

use xcsync_core::{ConfigOverrides, SyncConfig, SyncEngine};
use xcsync_fs::NormalizedPath;

use crate::cli::SourceArgs;
use crate::error::{CliError, Result};

/// A loaded configuration and where it came from
#[derive(Debug, Clone)]
pub struct ProjectContext {
    /// `None` when no config file was found and flags alone are used
    pub config_path: Option<NormalizedPath>,
    pub config: SyncConfig,
}

impl ProjectContext {
    pub fn engine(self) -> Result<SyncEngine> {
        Ok(SyncEngine::new(self.config)?)
    }
}

/// Walk up from `cwd` looking for `xcsync.{toml,json,yaml,yml}`.
pub fn find_config(cwd: &Path) -> Option<NormalizedPath> {
    let mut current = Some(cwd);
    while let Some(dir) = current {
        if let Some(found) = SyncConfig::discover(&NormalizedPath::new(dir)) {
            return Some(found);
        }
        current = dir.parent();
    }
    None
}

/// Load the config (explicit, discovered, or default) and apply `args`.
///
/// Paths given on the command line are relative to `cwd`.
pub fn resolve(cwd: &Path, args: &SourceArgs) -> Result<ProjectContext> {
    let config_path = match &args.config {
        Some(path) => {
            let path = NormalizedPath::new(cwd.join(path));
            if !path.is_file() {
                return Err(CliError::user(format!("Config file not found: {path}")));
            }
            Some(path)
        }
        None => find_config(cwd),
    };

    let config = match &config_path {
        Some(path) => SyncConfig::load(path)?,
        None => {
            tracing::debug!(cwd = ?cwd, "no config file; using defaults");
            SyncConfig::default()
        }
    };

    let from_cwd = |path: &PathBuf| NormalizedPath::new(cwd.join(path)).as_str().to_string();
    let overrides = ConfigOverrides {
        manifest: args.manifest.as_ref().map(from_cwd),
        source_root: args.root.as_ref().map(from_cwd),
        extensions: args.extensions.clone(),
        deny: args.deny.clone(),
        prune_missing: args.no_prune.then_some(false),
    };

    Ok(ProjectContext {
        config_path,
        config: config.merge(overrides),
    })
}
