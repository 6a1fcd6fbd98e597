//! Referential-integrity audit of a manifest
//!
//! Provides types for reporting whether file entries, build entries, groups,
//! and build phases agree with each other.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use xcsync_pbx::{Isa, Manifest, ObjectId};

/// Status of the integrity check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Every reference resolves
    Healthy,
    /// The manifest parses but references disagree
    Inconsistent,
    /// The manifest could not be read or parsed
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    /// A build entry whose `fileRef` names no record
    DanglingReference,
    /// A build entry listed in zero or several build phases
    PhaseMembership,
    /// A file entry listed in no group
    Ungrouped,
    /// An identifier keying more than one record
    DuplicateIdentifier,
    /// A group or phase list naming an identifier with no record
    UnknownMember,
}

/// One integrity problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    /// The identifier the problem is about
    pub id: String,
    /// Display name, when known
    pub name: Option<String>,
    /// Human-readable description
    pub description: String,
}

/// Report from an integrity check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub findings: Vec<Finding>,
    /// Additional messages about the check
    pub messages: Vec<String>,
}

impl CheckReport {
    /// Create a healthy check report with no issues
    pub fn healthy() -> Self {
        Self {
            status: CheckStatus::Healthy,
            findings: Vec::new(),
            messages: Vec::new(),
        }
    }

    /// Create a check report indicating the manifest is unusable
    pub fn broken(message: String) -> Self {
        Self {
            status: CheckStatus::Broken,
            findings: Vec::new(),
            messages: vec![message],
        }
    }

    pub fn from_findings(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            return Self::healthy();
        }
        Self {
            status: CheckStatus::Inconsistent,
            findings,
            messages: Vec::new(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }

    pub fn count(&self, kind: FindingKind) -> usize {
        self.findings.iter().filter(|f| f.kind == kind).count()
    }
}

/// Audit every cross-reference in `manifest`.
pub fn check_manifest(manifest: &Manifest) -> CheckReport {
    let mut findings = Vec::new();

    for id in manifest.duplicate_ids() {
        findings.push(Finding {
            kind: FindingKind::DuplicateIdentifier,
            name: manifest.record(&id).and_then(|r| r.display_name()).map(str::to_string),
            description: format!("identifier {id} keys more than one record"),
            id: id.to_string(),
        });
    }

    // Every list a build entry or file entry can be a member of
    let mut grouped: BTreeSet<ObjectId> = BTreeSet::new();
    for record in manifest.records() {
        let Some(isa) = record.isa() else {
            continue;
        };
        let list = if isa.as_str().ends_with("BuildPhase") {
            "files"
        } else if isa.as_str().ends_with("Group") {
            "children"
        } else {
            continue;
        };
        for member in record.id_list(list) {
            if manifest.record(&member).is_none() {
                findings.push(Finding {
                    kind: FindingKind::UnknownMember,
                    description: format!(
                        "{} {} lists {member}, which has no record",
                        isa.as_str(),
                        record.id()
                    ),
                    id: member.to_string(),
                    name: None,
                });
            }
            if list == "children" {
                grouped.insert(member);
            }
        }
    }
    let phase_lists: Vec<Vec<ObjectId>> = manifest
        .records()
        .filter(|r| r.isa().is_some_and(|isa| isa.as_str().ends_with("BuildPhase")))
        .map(|r| r.id_list("files"))
        .collect();
    let mut phase_counts: BTreeMap<&ObjectId, usize> = BTreeMap::new();
    for files in &phase_lists {
        for member in files {
            *phase_counts.entry(member).or_default() += 1;
        }
    }

    for record in manifest.records_of(Isa::BuildFile) {
        let name = record.comment().map(str::to_string);
        match record.body().get_str("fileRef") {
            Some(file_ref) => {
                if !manifest.records().any(|r| r.id().as_str() == file_ref) {
                    findings.push(Finding {
                        kind: FindingKind::DanglingReference,
                        id: record.id().to_string(),
                        name: name.clone(),
                        description: format!("fileRef {file_ref} names no record"),
                    });
                }
            }
            None if record.body().get("productRef").is_none() => {
                findings.push(Finding {
                    kind: FindingKind::DanglingReference,
                    id: record.id().to_string(),
                    name: name.clone(),
                    description: "build entry has no fileRef".to_string(),
                });
            }
            None => {}
        }

        let count = phase_counts.get(record.id()).copied().unwrap_or(0);
        if count != 1 {
            findings.push(Finding {
                kind: FindingKind::PhaseMembership,
                id: record.id().to_string(),
                name,
                description: format!("listed in {count} build phases, expected 1"),
            });
        }
    }

    for entry in manifest.file_entries() {
        if !grouped.contains(&entry.id) {
            findings.push(Finding {
                kind: FindingKind::Ungrouped,
                description: format!("{} is not listed in any group", entry.name),
                id: entry.id.to_string(),
                name: Some(entry.name),
            });
        }
    }

    tracing::debug!(findings = findings.len(), "checked manifest");
    CheckReport::from_findings(findings)
}
