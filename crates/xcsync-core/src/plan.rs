//! Diff between a manifest and the files on disk

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use xcsync_pbx::{Manifest, ObjectId};

use crate::config::{Denylist, PinnedEntry};
use crate::scan::{DiscoveredFile, extension_of};

/// Why an entry is scheduled for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    Denylisted,
    MissingOnDisk,
    /// Named explicitly by the caller
    Requested,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Denylisted => write!(f, "denylisted"),
            Self::MissingOnDisk => write!(f, "missing on disk"),
            Self::Requested => write!(f, "requested"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Removal {
    pub name: String,
    pub reason: RemovalReason,
}

/// What a sync would change. Removals are applied before additions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncPlan {
    pub to_remove: Vec<Removal>,
    pub to_add: Vec<DiscoveredFile>,
    /// Pinned files to purge and re-add with their fixed identifiers
    pub pinned: Vec<DiscoveredFile>,
}

impl SyncPlan {
    pub fn is_empty(&self) -> bool {
        self.to_remove.is_empty() && self.to_add.is_empty() && self.pinned.is_empty()
    }
}

/// Inputs to [`diff`] besides the manifest and the scan result.
#[derive(Debug, Clone, Copy)]
pub struct DiffRules<'a> {
    pub extensions: &'a BTreeSet<String>,
    pub denylist: &'a Denylist,
    pub prune_missing: bool,
    pub pinned: &'a BTreeMap<String, PinnedEntry>,
    /// Every file and directory name present on disk, including hidden and
    /// excluded ones. Entries named here are never pruned.
    pub present: &'a BTreeSet<String>,
}

fn base_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Compute additions and removals.
///
/// Matching is by base file name only: a manifest entry named `Foo.swift`
/// satisfies every `Foo.swift` on disk, whatever its directory. An entry
/// answers to its display name and to the base name of its path.
pub fn diff(manifest: &Manifest, discovered: &[DiscoveredFile], rules: DiffRules<'_>) -> SyncPlan {
    let entries = manifest.file_entries();
    let existing: BTreeSet<&str> = entries
        .iter()
        .flat_map(|f| [base_name(&f.name), f.file_name()])
        .collect();
    let on_disk: BTreeSet<&str> = discovered.iter().map(|f| f.name.as_str()).collect();
    let exists = |name: &str| on_disk.contains(name) || rules.present.contains(name);

    let mut plan = SyncPlan::default();

    let mut seen = BTreeSet::new();
    for entry in &entries {
        let name = entry.file_name();
        let display = base_name(&entry.name);
        if name.is_empty() || !seen.insert(name) {
            continue;
        }
        let reason = if rules.denylist.matches(name) || rules.denylist.matches(display) {
            Some(RemovalReason::Denylisted)
        } else if rules.prune_missing
            && !exists(name)
            && !exists(display)
            && !rules.pinned.contains_key(name)
            && !rules.pinned.contains_key(display)
            && extension_of(name).is_some_and(|ext| rules.extensions.contains(&ext))
        {
            Some(RemovalReason::MissingOnDisk)
        } else {
            None
        };
        if let Some(reason) = reason {
            plan.to_remove.push(Removal {
                name: name.to_string(),
                reason,
            });
        }
    }

    let mut queued = BTreeSet::new();
    for file in discovered {
        let name = file.name.as_str();
        if rules.denylist.matches(name)
            || existing.contains(name)
            || rules.pinned.contains_key(name)
        {
            continue;
        }
        if !queued.insert(name) {
            tracing::warn!(file = %file.relative, "name already queued from another directory; skipping");
            continue;
        }
        plan.to_add.push(file.clone());
    }

    for (name, pin) in rules.pinned {
        if rules.denylist.matches(name) {
            tracing::warn!(file = %name, "pinned file is denylisted; denylist wins");
            continue;
        }
        if pin_satisfied(manifest, name, pin) {
            continue;
        }
        let file = discovered
            .iter()
            .find(|f| f.name == *name)
            .cloned()
            .unwrap_or_else(|| DiscoveredFile {
                relative: name.clone(),
                name: name.clone(),
                extension: extension_of(name).unwrap_or_default(),
                is_dir: false,
            });
        plan.pinned.push(file);
    }

    tracing::debug!(
        add = plan.to_add.len(),
        remove = plan.to_remove.len(),
        pinned = plan.pinned.len(),
        "computed plan"
    );
    plan
}

/// A pinned file is in place when it is the only entry with its name, carries
/// the pinned identifiers, and both records are listed where they belong.
fn pin_satisfied(manifest: &Manifest, name: &str, pin: &PinnedEntry) -> bool {
    let named: Vec<ObjectId> = manifest
        .file_entries()
        .into_iter()
        .filter(|f| f.matches_name(name))
        .map(|f| f.id)
        .collect();
    if named != [pin.file_id.clone()] {
        return false;
    }

    let build_ok = manifest
        .build_entries()
        .iter()
        .any(|b| b.id == pin.build_id && b.file_ref.as_ref() == Some(&pin.file_id));
    if !build_ok {
        return false;
    }

    let wanted_group = pin.group.as_deref().and_then(|g| manifest.find_group(g));
    let grouped = manifest.groups().iter().any(|g| {
        g.children.contains(&pin.file_id) && wanted_group.as_ref().is_none_or(|w| *w == g.id)
    });
    let phased = manifest
        .phases()
        .iter()
        .filter(|p| p.files.contains(&pin.build_id))
        .count()
        == 1;

    grouped && phased
}
