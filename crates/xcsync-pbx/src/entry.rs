//! Adding and removing file entries

use crate::document::Manifest;
use crate::edit::Edit;
use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::record::{PhaseKind, Record};
use crate::value::{Dict, Scalar, Value};

pub const FILE_REFERENCE_SECTION: &str = "PBXFileReference";
pub const BUILD_FILE_SECTION: &str = "PBXBuildFile";

/// The build phase a new build entry is listed in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseSlot {
    pub id: ObjectId,
    pub kind: PhaseKind,
}

/// Everything needed to insert one file into a manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEntry {
    /// Display name, also used for annotations
    pub name: String,
    /// Path relative to the containing group
    pub path: String,
    /// `lastKnownFileType`, e.g. `sourcecode.swift`
    pub file_type: String,
    pub source_tree: String,
    pub file_id: ObjectId,
    pub build_id: ObjectId,
    pub group: Option<ObjectId>,
    pub phase: Option<PhaseSlot>,
}

impl NewEntry {
    pub fn new(
        name: impl Into<String>,
        file_type: impl Into<String>,
        file_id: ObjectId,
        build_id: ObjectId,
    ) -> Self {
        let name = name.into();
        Self {
            path: name.clone(),
            name,
            file_type: file_type.into(),
            source_tree: "<group>".to_string(),
            file_id,
            build_id,
            group: None,
            phase: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn in_group(mut self, group: Option<ObjectId>) -> Self {
        self.group = group;
        self
    }

    pub fn in_phase(mut self, phase: Option<PhaseSlot>) -> Self {
        self.phase = phase;
        self
    }

    fn file_record(&self) -> Record {
        let mut body = Dict::new();
        body.insert("isa", Value::string("PBXFileReference"));
        body.insert("lastKnownFileType", Value::string(&self.file_type));
        if self.name != self.path {
            body.insert("name", Value::string(&self.name));
        }
        body.insert("path", Value::string(&self.path));
        body.insert("sourceTree", Value::string(&self.source_tree));
        Record::new(self.file_id.clone(), Some(self.name.clone()), body)
    }

    fn build_record(&self, kind: PhaseKind) -> Record {
        let mut body = Dict::new();
        body.insert("isa", Value::string("PBXBuildFile"));
        body.insert(
            "fileRef",
            Value::Scalar(Scalar::reference(&self.file_id, Some(&self.name))),
        );
        Record::new(self.build_id.clone(), Some(self.build_comment(kind)), body)
    }

    fn build_comment(&self, kind: PhaseKind) -> String {
        format!("{} in {}", self.name, kind.label())
    }
}

impl Manifest {
    /// Insert a file entry, its build entry, and their list memberships.
    ///
    /// Missing structure (section, group, or phase) skips the dependent edits
    /// instead of failing. An identifier already present in the document is an
    /// error and leaves the manifest untouched.
    pub fn add_entry(&mut self, entry: &NewEntry) -> Result<Vec<Edit>> {
        if entry.file_id == entry.build_id {
            return Err(Error::DuplicateIdentifier {
                id: entry.file_id.to_string(),
            });
        }
        for id in [&entry.file_id, &entry.build_id] {
            if self.contains_id(id) {
                return Err(Error::DuplicateIdentifier { id: id.to_string() });
            }
        }

        let mut edits = Vec::new();
        let inserted = self.insert_record(FILE_REFERENCE_SECTION, entry.file_record());
        let file_skipped = inserted.is_skipped();
        edits.push(inserted);
        if file_skipped {
            return Ok(edits);
        }

        let phase = entry
            .phase
            .as_ref()
            .filter(|slot| self.record(&slot.id).is_some());
        let mut build_inserted = false;
        match phase {
            Some(slot) => {
                let edit = self.insert_record(BUILD_FILE_SECTION, entry.build_record(slot.kind));
                build_inserted = !edit.is_skipped();
                edits.push(edit);
            }
            None => {
                tracing::warn!(file = %entry.name, "no build phase; build entry not inserted");
                edits.push(Edit::skipped(format!(
                    "no build phase for {}; build entry not inserted",
                    entry.name
                )));
            }
        }

        match &entry.group {
            Some(group) => edits.push(self.add_member(
                group,
                "children",
                Scalar::reference(&entry.file_id, Some(&entry.name)),
            )),
            None => {
                tracing::warn!(file = %entry.name, "no group; file entry left ungrouped");
                edits.push(Edit::skipped(format!("no group for {}", entry.name)));
            }
        }

        if let (true, Some(slot)) = (build_inserted, phase) {
            let comment = entry.build_comment(slot.kind);
            let slot_id = slot.id.clone();
            edits.push(self.add_member(
                &slot_id,
                "files",
                Scalar::reference(&entry.build_id, Some(&comment)),
            ));
        }

        tracing::debug!(file = %entry.name, edits = edits.len(), "added entry");
        Ok(edits)
    }

    /// Remove every file entry named `filename`, with its build entries and
    /// every list line that mentions any of them.
    ///
    /// A name that matches nothing yields no edits.
    pub fn remove_entry(&mut self, filename: &str) -> Vec<Edit> {
        let file_ids: Vec<ObjectId> = self
            .file_entries()
            .into_iter()
            .filter(|f| f.matches_name(filename))
            .map(|f| f.id)
            .collect();

        if file_ids.is_empty() {
            tracing::debug!(file = filename, "no entry to remove");
            return Vec::new();
        }

        let mut edits = Vec::new();
        for file_id in file_ids {
            let build_ids: Vec<ObjectId> = self
                .build_entries()
                .into_iter()
                .filter(|b| b.file_ref.as_ref() == Some(&file_id))
                .map(|b| b.id)
                .collect();
            for build_id in build_ids {
                edits.extend(self.purge_id(&build_id));
            }
            edits.extend(self.purge_id(&file_id));
        }

        tracing::debug!(file = filename, edits = edits.len(), "removed entry");
        edits
    }

    /// Delete the record keyed by `id` and every list membership of it.
    pub fn purge_id(&mut self, id: &ObjectId) -> Vec<Edit> {
        let mut edits = self.remove_record(id);
        edits.extend(self.remove_member(id));
        edits
    }
}
