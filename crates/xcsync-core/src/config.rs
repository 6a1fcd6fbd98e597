//! Synchronizer configuration
//!
//! `SyncConfig` is read from `xcsync.toml` (or `.json`, `.yaml`, `.yml`) by
//! [`ConfigStore`]. Relative paths in the file are resolved against the
//! file's directory; command-line values are merged on top with
//! [`SyncConfig::merge`].

use std::collections::{BTreeMap, BTreeSet};

use regex::Regex;
use serde::{Deserialize, Serialize};
use xcsync_fs::{ConfigStore, NormalizedPath};
use xcsync_pbx::{IdGenerator, IdStrategy, ObjectId};

use crate::{Error, Result};

/// File stem looked up by [`SyncConfig::discover`].
pub const CONFIG_STEM: &str = "xcsync";

fn default_extensions() -> Vec<String> {
    ["swift", "mlmodel", "mlpackage"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_prune_missing() -> bool {
    true
}

/// Everything a sync run needs to know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Path to `project.pbxproj`
    #[serde(default)]
    pub manifest: Option<String>,

    /// Directory scanned for artifacts
    #[serde(default)]
    pub source_root: Option<String>,

    /// Allow-listed extensions, without the leading dot
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// File names purged from the manifest regardless of disk state
    #[serde(default)]
    pub denylist: Vec<String>,

    /// Regular expressions matched against file names, like `denylist`
    #[serde(default)]
    pub deny_patterns: Vec<String>,

    /// Directory names skipped while scanning
    #[serde(default)]
    pub exclude_dirs: Vec<String>,

    /// Remove entries whose file no longer exists on disk
    #[serde(default = "default_prune_missing")]
    pub prune_missing: bool,

    #[serde(default)]
    pub ids: IdStrategy,

    /// Extra seed material for seeded identifiers
    #[serde(default)]
    pub seed_salt: String,

    #[serde(default)]
    pub placement: Placement,

    /// File names bound to fixed identifiers
    #[serde(default)]
    pub pinned: BTreeMap<String, PinnedEntry>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            manifest: None,
            source_root: None,
            extensions: default_extensions(),
            denylist: Vec::new(),
            deny_patterns: Vec::new(),
            exclude_dirs: Vec::new(),
            prune_missing: default_prune_missing(),
            ids: IdStrategy::default(),
            seed_salt: String::new(),
            placement: Placement::default(),
            pinned: BTreeMap::new(),
        }
    }
}

/// Where new entries go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Placement {
    /// Fallback group, by display name or identifier
    pub group: Option<String>,
    /// Native target whose build phases receive build entries
    pub target: Option<String>,
    pub sources_phase: Option<ObjectId>,
    pub resources_phase: Option<ObjectId>,
}

/// Fixed identifiers for one file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PinnedEntry {
    pub file_id: ObjectId,
    pub build_id: ObjectId,
    /// Group by display name or identifier
    #[serde(default)]
    pub group: Option<String>,
}

/// Command-line values layered over a loaded config.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub manifest: Option<String>,
    pub source_root: Option<String>,
    /// Replaces the configured allow-list when non-empty
    pub extensions: Vec<String>,
    /// Appended to the configured denylist
    pub deny: Vec<String>,
    pub prune_missing: Option<bool>,
}

impl SyncConfig {
    /// Find `xcsync.{toml,json,yaml,yml}` in `dir`.
    pub fn discover(dir: &NormalizedPath) -> Option<NormalizedPath> {
        ConfigStore::new().discover(dir, CONFIG_STEM)
    }

    /// Load a config file and resolve its relative paths against its directory.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let config: Self = ConfigStore::new().load(path)?;
        let base = path.parent().unwrap_or_else(|| NormalizedPath::new("."));
        tracing::debug!(path = %path, "loaded config");
        Ok(config.resolve_paths(&base))
    }

    /// Make `manifest` and `source_root` absolute relative to `base`.
    pub fn resolve_paths(mut self, base: &NormalizedPath) -> Self {
        let resolve = |value: String| NormalizedPath::new(&value).resolve_against(base).as_str().to_string();
        self.manifest = self.manifest.map(resolve);
        self.source_root = self.source_root.map(resolve);
        self
    }

    /// Layer command-line values on top of this config.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(manifest) = overrides.manifest {
            self.manifest = Some(manifest);
        }
        if let Some(root) = overrides.source_root {
            self.source_root = Some(root);
        }
        if !overrides.extensions.is_empty() {
            self.extensions = overrides.extensions;
        }
        for name in overrides.deny {
            if !self.denylist.contains(&name) {
                self.denylist.push(name);
            }
        }
        if let Some(prune) = overrides.prune_missing {
            self.prune_missing = prune;
        }
        self
    }

    pub fn manifest_path(&self) -> Result<NormalizedPath> {
        self.manifest
            .as_deref()
            .map(NormalizedPath::new)
            .ok_or(Error::MissingSetting { setting: "manifest" })
    }

    pub fn source_root_path(&self) -> Result<NormalizedPath> {
        self.source_root
            .as_deref()
            .map(NormalizedPath::new)
            .ok_or(Error::MissingSetting {
                setting: "source_root",
            })
    }

    /// Lowercased allow-list with leading dots stripped.
    pub fn extension_set(&self) -> BTreeSet<String> {
        self.extensions
            .iter()
            .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn denylist(&self) -> Result<Denylist> {
        Denylist::new(&self.denylist, &self.deny_patterns)
    }

    pub fn id_generator(&self) -> IdGenerator {
        IdGenerator::new(self.ids, self.seed_salt.clone())
    }
}

/// Compiled denylist: exact names plus regular expressions.
#[derive(Debug, Clone, Default)]
pub struct Denylist {
    names: BTreeSet<String>,
    patterns: Vec<Regex>,
}

impl Denylist {
    pub fn new(names: &[String], patterns: &[String]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| Error::InvalidConfig {
                    value: p.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            names: names.iter().cloned().collect(),
            patterns,
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.names.contains(name) || self.patterns.iter().any(|p| p.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::default();
        assert_eq!(config.extensions, vec!["swift", "mlmodel", "mlpackage"]);
        assert!(config.prune_missing);
        assert_eq!(config.ids, IdStrategy::Seeded);
    }

    #[test]
    fn merge_replaces_extensions_and_appends_deny() {
        let config = SyncConfig {
            denylist: vec!["A.swift".into()],
            ..SyncConfig::default()
        };
        let merged = config.merge(ConfigOverrides {
            extensions: vec!["json".into()],
            deny: vec!["A.swift".into(), "B.swift".into()],
            prune_missing: Some(false),
            ..ConfigOverrides::default()
        });
        assert_eq!(merged.extensions, vec!["json"]);
        assert_eq!(merged.denylist, vec!["A.swift", "B.swift"]);
        assert!(!merged.prune_missing);
    }

    #[test]
    fn extension_set_normalizes() {
        let config = SyncConfig {
            extensions: vec![".Swift".into(), "MLPACKAGE".into(), " ".into()],
            ..SyncConfig::default()
        };
        let set: Vec<String> = config.extension_set().into_iter().collect();
        assert_eq!(set, vec!["mlpackage", "swift"]);
    }

    #[test]
    fn denylist_matches_names_and_patterns() {
        let deny = Denylist::new(&["Stale.swift".into()], &["^Legacy.*\\.swift$".into()]).unwrap();
        assert!(deny.matches("Stale.swift"));
        assert!(deny.matches("LegacyMap.swift"));
        assert!(!deny.matches("Map.swift"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = Denylist::new(&[], &["(".into()]).unwrap_err();
        assert!(err.to_string().contains("\"(\""), "got: {err}");
    }

    #[test]
    fn missing_manifest_setting() {
        let err = SyncConfig::default().manifest_path().unwrap_err();
        assert!(matches!(err, Error::MissingSetting { setting: "manifest" }));
    }

    #[test]
    fn resolve_paths_against_base() {
        let config = SyncConfig {
            manifest: Some("App.xcodeproj/project.pbxproj".into()),
            source_root: Some("/abs/root".into()),
            ..SyncConfig::default()
        }
        .resolve_paths(&NormalizedPath::new("/work"));
        assert_eq!(config.manifest.as_deref(), Some("/work/App.xcodeproj/project.pbxproj"));
        assert_eq!(config.source_root.as_deref(), Some("/abs/root"));
    }
}
