//! Edits applied to a manifest.

use std::fmt;

use serde::Serialize;

use crate::id::ObjectId;

/// A single change made (or declined) by a manifest operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Edit {
    /// A record was appended to a section.
    InsertRecord {
        section: String,
        id: ObjectId,
        name: Option<String>,
    },
    /// A record was deleted from a section.
    RemoveRecord {
        section: String,
        id: ObjectId,
        name: Option<String>,
    },
    /// An identifier was appended to a list such as `children` or `files`.
    AddMember {
        owner: ObjectId,
        list: String,
        member: ObjectId,
    },
    /// An identifier was dropped from a list.
    RemoveMember {
        owner: ObjectId,
        list: String,
        member: ObjectId,
    },
    /// The structure an operation needed was absent; nothing changed.
    Skipped { reason: String },
}

impl Edit {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsertRecord { section, id, name } => {
                write!(f, "insert {section} {id}")?;
                if let Some(name) = name {
                    write!(f, " ({name})")?;
                }
                Ok(())
            }
            Self::RemoveRecord { section, id, name } => {
                write!(f, "remove {section} {id}")?;
                if let Some(name) = name {
                    write!(f, " ({name})")?;
                }
                Ok(())
            }
            Self::AddMember { owner, list, member } => {
                write!(f, "add {member} to {owner}.{list}")
            }
            Self::RemoveMember { owner, list, member } => {
                write!(f, "remove {member} from {owner}.{list}")
            }
            Self::Skipped { reason } => write!(f, "skipped: {reason}"),
        }
    }
}
