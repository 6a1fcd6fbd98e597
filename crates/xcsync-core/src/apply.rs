//! Applying a [`SyncPlan`] to a manifest

use xcsync_pbx::{Edit, IdGenerator, Manifest, NewEntry, ObjectId};

use crate::Result;
use crate::config::{Placement, SyncConfig};
use crate::filetype;
use crate::placement::{resolve_group, resolve_phase};
use crate::plan::SyncPlan;
use crate::scan::DiscoveredFile;

/// Everything needed to build a new entry besides the file itself.
#[derive(Debug, Clone, Copy)]
pub struct EntryContext<'a> {
    pub placement: &'a Placement,
    /// Name of the source root, used as the parent of files at its top level
    pub root_name: Option<&'a str>,
}

impl EntryContext<'_> {
    /// Build the entry for `file`, resolving its group and phase.
    pub fn new_entry(
        &self,
        manifest: &Manifest,
        file: &DiscoveredFile,
        file_id: ObjectId,
        build_id: ObjectId,
        group: Option<&str>,
    ) -> NewEntry {
        let parent = file.parent_dir_name().or(self.root_name);
        let kind = filetype::phase_kind(&file.extension);
        NewEntry::new(
            file.name.clone(),
            filetype::file_type(&file.extension),
            file_id,
            build_id,
        )
        .in_group(resolve_group(manifest, self.placement, group, parent))
        .in_phase(resolve_phase(manifest, self.placement, kind))
    }
}

/// Fresh file and build identifiers for `name`.
pub fn generate_ids(manifest: &Manifest, generator: &IdGenerator, name: &str) -> (ObjectId, ObjectId) {
    let file_id = generator.generate(name, "ref", |c| manifest.contains_id(c));
    let build_id = generator.generate(name, "build", |c| manifest.contains_id(c) || *c == file_id);
    (file_id, build_id)
}

/// Apply removals, then pinned re-adds, then additions.
pub fn apply(
    manifest: &mut Manifest,
    plan: &SyncPlan,
    config: &SyncConfig,
    root_name: Option<&str>,
) -> Result<Vec<Edit>> {
    let ctx = EntryContext {
        placement: &config.placement,
        root_name,
    };
    let generator = config.id_generator();
    let mut edits = Vec::new();

    for removal in &plan.to_remove {
        tracing::info!(file = %removal.name, reason = %removal.reason, "removing entry");
        edits.extend(manifest.remove_entry(&removal.name));
    }

    for file in &plan.pinned {
        let Some(pin) = config.pinned.get(&file.name) else {
            continue;
        };
        tracing::info!(file = %file.name, file_id = %pin.file_id, "re-pinning entry");
        edits.extend(manifest.remove_entry(&file.name));
        edits.extend(manifest.purge_id(&pin.file_id));
        edits.extend(manifest.purge_id(&pin.build_id));
        let entry = ctx.new_entry(
            manifest,
            file,
            pin.file_id.clone(),
            pin.build_id.clone(),
            pin.group.as_deref(),
        );
        edits.extend(manifest.add_entry(&entry)?);
    }

    for file in &plan.to_add {
        let (file_id, build_id) = generate_ids(manifest, &generator, &file.name);
        tracing::info!(file = %file.relative, file_id = %file_id, "adding entry");
        let entry = ctx.new_entry(manifest, file, file_id, build_id, None);
        edits.extend(manifest.add_entry(&entry)?);
    }

    Ok(edits)
}
