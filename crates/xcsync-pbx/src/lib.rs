//! Parsing, editing, and diffing of Xcode `project.pbxproj` manifests
//!
//! A [`Manifest`] keeps everything it does not understand as raw text and
//! parses the `/* Begin X section */` blocks into typed [`Record`]s. Edits go
//! through typed operations and the document is serialized once; records
//! nobody touched are written back byte-for-byte.

pub mod diff;
pub mod document;
pub mod edit;
pub mod entry;
pub mod error;
pub mod id;
mod lexer;
mod parser;
pub mod record;
pub mod value;

pub use diff::{TextDiff, unified_diff};
pub use document::{Manifest, Section};
pub use edit::Edit;
pub use entry::{NewEntry, PhaseSlot};
pub use error::{Error, Result};
pub use id::{IdGenerator, IdStrategy, ObjectId};
pub use record::{BuildEntry, FileEntry, Group, Isa, Phase, PhaseKind, Record, Target};
pub use value::{Dict, Scalar, Value};
