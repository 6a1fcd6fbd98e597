//! SyncEngine implementation
//!
//! The SyncEngine coordinates the manifest (what Xcode builds) and the source
//! tree (what exists on disk).

use std::collections::BTreeSet;

use serde::Serialize;
use xcsync_fs::checksum::compute_content_checksum;
use xcsync_fs::{NormalizedPath, io};
use xcsync_pbx::{Edit, Manifest, ObjectId, TextDiff};

use crate::apply::{self, EntryContext};
use crate::check::{CheckReport, check_manifest};
use crate::config::{Denylist, SyncConfig};
use crate::plan::{self, DiffRules, Removal, RemovalReason, SyncPlan};
use crate::scan::{self, DiscoveredFile, extension_of};
use crate::{Error, Result};

/// Options for sync and edit operations
#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// If true, compute the result without writing the manifest.
    pub dry_run: bool,
}

/// Options for adding a single file
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    /// Group by display name or identifier
    pub group: Option<String>,
    /// Fixed identifiers; both or neither
    pub ids: Option<(ObjectId, ObjectId)>,
}

/// Report from a sync or edit operation
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    /// Number of allow-listed files found on disk
    pub discovered: usize,
    pub plan: SyncPlan,
    pub edits: Vec<Edit>,
    /// Reasons for edits that could not be made
    pub skipped: Vec<String>,
    /// Whether the manifest file was rewritten
    pub written: bool,
    pub checksum_before: String,
    pub checksum_after: String,
    pub diff: TextDiff,
}

impl SyncReport {
    /// Whether the manifest content changed (or would change, in a dry run).
    pub fn changed(&self) -> bool {
        self.checksum_before != self.checksum_after
    }
}

/// Engine for synchronizing a manifest with its source tree
///
/// - **scan** / **diff** / **apply**: the three stages, usable on their own
/// - **sync**: all three, then one atomic write
/// - **check**: referential-integrity audit
pub struct SyncEngine {
    config: SyncConfig,
    manifest_path: NormalizedPath,
    source_root: NormalizedPath,
    extensions: BTreeSet<String>,
    denylist: Denylist,
}

impl SyncEngine {
    /// Create an engine from a fully merged configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest or source root is not configured or
    /// a deny pattern does not compile.
    pub fn new(config: SyncConfig) -> Result<Self> {
        let manifest_path = config.manifest_path()?;
        let source_root = config.source_root_path()?;
        let extensions = config.extension_set();
        let denylist = config.denylist()?;
        Ok(Self {
            config,
            manifest_path,
            source_root,
            extensions,
            denylist,
        })
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn manifest_path(&self) -> &NormalizedPath {
        &self.manifest_path
    }

    pub fn source_root(&self) -> &NormalizedPath {
        &self.source_root
    }

    fn root_name(&self) -> Option<&str> {
        self.source_root.file_name()
    }

    fn entry_context(&self) -> EntryContext<'_> {
        EntryContext {
            placement: &self.config.placement,
            root_name: self.root_name(),
        }
    }

    /// Read and parse the manifest.
    ///
    /// # Errors
    ///
    /// [`Error::MissingPath`] when the file does not exist; parse errors when
    /// it is not a property list.
    pub fn load_manifest(&self) -> Result<Manifest> {
        let text = io::read_text(&self.manifest_path).map_err(|e| {
            if e.is_not_found() {
                Error::MissingPath {
                    what: "Manifest",
                    path: self.manifest_path.to_native(),
                }
            } else {
                Error::Fs(e)
            }
        })?;
        Ok(Manifest::parse(&text)?)
    }

    /// Allow-listed files under the source root.
    pub fn scan(&self) -> Result<Vec<DiscoveredFile>> {
        scan::scan(&self.source_root, &self.extensions, &self.config.exclude_dirs)
    }

    /// Directory whose contents count as "on disk" when pruning.
    ///
    /// This is the directory holding the `.xcodeproj` bundle when the source
    /// root lives inside it, so sources of other targets are never pruned.
    fn presence_root(&self) -> NormalizedPath {
        self.manifest_path
            .parent()
            .and_then(|bundle| bundle.parent())
            .filter(|project| self.source_root.relative_to(project).is_some())
            .unwrap_or_else(|| self.source_root.clone())
    }

    /// Every name present on disk, or nothing when pruning is off.
    pub fn names_on_disk(&self) -> Result<BTreeSet<String>> {
        if !self.config.prune_missing {
            return Ok(BTreeSet::new());
        }
        scan::names_on_disk(&self.presence_root())
    }

    pub fn diff(
        &self,
        manifest: &Manifest,
        discovered: &[DiscoveredFile],
        present: &BTreeSet<String>,
    ) -> SyncPlan {
        plan::diff(
            manifest,
            discovered,
            DiffRules {
                extensions: &self.extensions,
                denylist: &self.denylist,
                prune_missing: self.config.prune_missing,
                pinned: &self.config.pinned,
                present,
            },
        )
    }

    pub fn apply(&self, manifest: &mut Manifest, plan: &SyncPlan) -> Result<Vec<Edit>> {
        apply::apply(manifest, plan, &self.config, self.root_name())
    }

    /// Scan, diff, and apply without writing.
    pub fn plan(&self) -> Result<SyncReport> {
        self.sync(SyncOptions { dry_run: true })
    }

    /// Scan, diff, apply, and write the manifest once.
    pub fn sync(&self, options: SyncOptions) -> Result<SyncReport> {
        let mut manifest = self.load_manifest()?;
        let discovered = self.scan()?;
        let present = self.names_on_disk()?;
        let plan = self.diff(&manifest, &discovered, &present);
        let edits = self.apply(&mut manifest, &plan)?;
        let mut report = self.finish(&manifest, plan, edits, options)?;
        report.discovered = discovered.len();
        Ok(report)
    }

    /// Audit the manifest; an unparseable manifest yields a broken report.
    ///
    /// # Errors
    ///
    /// Returns an error only when the manifest cannot be read.
    pub fn check(&self) -> Result<CheckReport> {
        match self.load_manifest() {
            Ok(manifest) => Ok(check_manifest(&manifest)),
            Err(Error::Manifest(e)) => Ok(CheckReport::broken(format!(
                "Failed to parse manifest: {e}"
            ))),
            Err(e) => Err(e),
        }
    }

    /// Add one file, by path relative to the working directory or absolute.
    ///
    /// A file whose name is already present is left alone unless fixed
    /// identifiers are given, in which case the old entry is replaced.
    pub fn add_file(&self, path: &str, add: AddOptions, options: SyncOptions) -> Result<SyncReport> {
        let native = NormalizedPath::new(path);
        let name = native
            .file_name()
            .ok_or_else(|| Error::InvalidConfig {
                value: path.to_string(),
                reason: "not a file path".to_string(),
            })?
            .to_string();
        let relative = native
            .relative_to(&self.source_root)
            .unwrap_or_else(|| native.clone());
        let file = DiscoveredFile {
            relative: relative.as_str().to_string(),
            extension: extension_of(&name).unwrap_or_default(),
            is_dir: native.is_dir(),
            name,
        };

        let mut manifest = self.load_manifest()?;
        let mut edits = Vec::new();
        let present = manifest
            .file_entries()
            .iter()
            .any(|f| f.matches_name(&file.name));

        let ids = match add.ids {
            Some((file_id, build_id)) => {
                edits.extend(manifest.remove_entry(&file.name));
                edits.extend(manifest.purge_id(&file_id));
                edits.extend(manifest.purge_id(&build_id));
                Some((file_id, build_id))
            }
            None if present => {
                tracing::info!(file = %file.name, "already in manifest");
                edits.push(Edit::skipped(format!("{} is already in the manifest", file.name)));
                None
            }
            None => Some(apply::generate_ids(
                &manifest,
                &self.config.id_generator(),
                &file.name,
            )),
        };

        if let Some((file_id, build_id)) = ids {
            let entry = self.entry_context().new_entry(
                &manifest,
                &file,
                file_id,
                build_id,
                add.group.as_deref(),
            );
            edits.extend(manifest.add_entry(&entry)?);
        }

        let plan = SyncPlan {
            to_add: vec![file],
            ..SyncPlan::default()
        };
        self.finish(&manifest, plan, edits, options)
    }

    /// Remove every entry named in `names`.
    pub fn remove_files(&self, names: &[String], options: SyncOptions) -> Result<SyncReport> {
        let mut manifest = self.load_manifest()?;
        let mut edits = Vec::new();
        let mut plan = SyncPlan::default();
        for name in names {
            let removed = manifest.remove_entry(name);
            if removed.is_empty() {
                edits.push(Edit::skipped(format!("{name} is not in the manifest")));
                continue;
            }
            plan.to_remove.push(Removal {
                name: name.clone(),
                reason: RemovalReason::Requested,
            });
            edits.extend(removed);
        }
        self.finish(&manifest, plan, edits, options)
    }

    /// Render, diff, and (unless dry-run or unchanged) write the manifest.
    fn finish(
        &self,
        manifest: &Manifest,
        plan: SyncPlan,
        edits: Vec<Edit>,
        options: SyncOptions,
    ) -> Result<SyncReport> {
        let before = manifest.original_source();
        let after = manifest.render();
        let label = self.manifest_path.file_name().unwrap_or("project.pbxproj");
        let diff = TextDiff::between(before, &after, label);

        let written = !options.dry_run && after != before;
        if written {
            io::write_text(&self.manifest_path, &after)?;
            tracing::info!(path = %self.manifest_path, edits = edits.len(), "wrote manifest");
        }

        let skipped = edits
            .iter()
            .filter_map(|e| match e {
                Edit::Skipped { reason } => Some(reason.clone()),
                _ => None,
            })
            .collect();

        Ok(SyncReport {
            dry_run: options.dry_run,
            discovered: 0,
            plan,
            edits,
            skipped,
            written,
            checksum_before: compute_content_checksum(before),
            checksum_after: compute_content_checksum(&after),
            diff,
        })
    }
}
