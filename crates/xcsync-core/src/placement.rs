//! Choosing the group and build phase for a new entry

use xcsync_pbx::{Manifest, ObjectId, PhaseKind, PhaseSlot};

use crate::config::Placement;

/// Resolve the group a new file entry is listed in.
///
/// Tried in order: the pinned group, the group named after the file's parent
/// directory, the configured default group, the project's main group.
pub fn resolve_group(
    manifest: &Manifest,
    placement: &Placement,
    pinned_group: Option<&str>,
    parent_dir: Option<&str>,
) -> Option<ObjectId> {
    if let Some(selector) = pinned_group {
        match manifest.find_group(selector) {
            Some(id) => return Some(id),
            None => tracing::warn!(group = selector, "pinned group not found; falling back"),
        }
    }
    if let Some(id) = parent_dir.and_then(|dir| manifest.find_group(dir)) {
        return Some(id);
    }
    if let Some(selector) = placement.group.as_deref() {
        match manifest.find_group(selector) {
            Some(id) => return Some(id),
            None => tracing::warn!(group = selector, "configured group not found; falling back"),
        }
    }
    manifest.main_group()
}

/// Resolve the build phase receiving a build entry of `kind`.
///
/// An explicitly configured phase identifier wins, then the first phase of
/// that kind in the configured target, then the first such phase anywhere.
pub fn resolve_phase(manifest: &Manifest, placement: &Placement, kind: PhaseKind) -> Option<PhaseSlot> {
    let phases = manifest.phases();

    let explicit = match kind {
        PhaseKind::Sources => placement.sources_phase.as_ref(),
        PhaseKind::Resources => placement.resources_phase.as_ref(),
        PhaseKind::Frameworks => None,
    };
    if let Some(id) = explicit {
        if let Some(phase) = phases.iter().find(|p| p.id == *id && p.kind == kind) {
            return Some(PhaseSlot {
                id: phase.id.clone(),
                kind,
            });
        }
        tracing::warn!(phase = %id, ?kind, "configured phase not found; falling back");
    }

    if let Some(target_name) = placement.target.as_deref() {
        match manifest.targets().into_iter().find(|t| t.name == target_name) {
            Some(target) => {
                let owned = target
                    .build_phases
                    .iter()
                    .find(|id| phases.iter().any(|p| p.id == **id && p.kind == kind));
                if let Some(id) = owned {
                    return Some(PhaseSlot {
                        id: id.clone(),
                        kind,
                    });
                }
                tracing::warn!(target = target_name, ?kind, "target has no such phase");
            }
            None => tracing::warn!(target = target_name, "configured target not found"),
        }
    }

    phases.into_iter().find(|p| p.kind == kind).map(|p| PhaseSlot { id: p.id, kind })
}
