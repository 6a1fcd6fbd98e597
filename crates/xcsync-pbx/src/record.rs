//! Typed records and the read-only views built on top of them

use crate::id::ObjectId;
use crate::value::{Dict, Scalar, Value};

/// The `isa` of a record, for the kinds the synchronizer reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Isa {
    BuildFile,
    FileReference,
    Group,
    VariantGroup,
    SourcesBuildPhase,
    ResourcesBuildPhase,
    FrameworksBuildPhase,
    NativeTarget,
    Project,
    Other(String),
}

impl Isa {
    pub fn parse(value: &str) -> Self {
        match value {
            "PBXBuildFile" => Self::BuildFile,
            "PBXFileReference" => Self::FileReference,
            "PBXGroup" => Self::Group,
            "PBXVariantGroup" => Self::VariantGroup,
            "PBXSourcesBuildPhase" => Self::SourcesBuildPhase,
            "PBXResourcesBuildPhase" => Self::ResourcesBuildPhase,
            "PBXFrameworksBuildPhase" => Self::FrameworksBuildPhase,
            "PBXNativeTarget" => Self::NativeTarget,
            "PBXProject" => Self::Project,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::BuildFile => "PBXBuildFile",
            Self::FileReference => "PBXFileReference",
            Self::Group => "PBXGroup",
            Self::VariantGroup => "PBXVariantGroup",
            Self::SourcesBuildPhase => "PBXSourcesBuildPhase",
            Self::ResourcesBuildPhase => "PBXResourcesBuildPhase",
            Self::FrameworksBuildPhase => "PBXFrameworksBuildPhase",
            Self::NativeTarget => "PBXNativeTarget",
            Self::Project => "PBXProject",
            Self::Other(name) => name,
        }
    }

    /// Xcode writes these kinds on a single line.
    pub fn is_single_line(&self) -> bool {
        matches!(self, Self::BuildFile | Self::FileReference)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group | Self::VariantGroup)
    }
}

/// Build phase kinds that receive build entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum PhaseKind {
    Sources,
    Resources,
    Frameworks,
}

impl PhaseKind {
    pub fn from_isa(isa: &Isa) -> Option<Self> {
        match isa {
            Isa::SourcesBuildPhase => Some(Self::Sources),
            Isa::ResourcesBuildPhase => Some(Self::Resources),
            Isa::FrameworksBuildPhase => Some(Self::Frameworks),
            _ => None,
        }
    }

    /// Name used in build-file annotations, as in `Foo.swift in Sources`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Sources => "Sources",
            Self::Resources => "Resources",
            Self::Frameworks => "Frameworks",
        }
    }
}

/// Where a record sits in the source text, and its verbatim text while clean.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Layout {
    /// Blank lines preceding the record
    pub leading: String,
    /// Whitespace before the key on its own line
    pub indent: String,
    /// Original text; dropped as soon as the record is edited
    pub raw: Option<String>,
}

/// One `ID /* comment */ = { ... };` object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    id: ObjectId,
    comment: Option<String>,
    body: Dict,
    pub(crate) layout: Layout,
}

impl Record {
    pub fn new(id: ObjectId, comment: Option<String>, body: Dict) -> Self {
        Self {
            id,
            comment,
            body,
            layout: Layout::default(),
        }
    }

    pub(crate) fn parsed(key: Scalar, body: Dict, layout: Layout) -> Self {
        Self {
            id: ObjectId::from_key(&key.text),
            comment: key.comment,
            body,
            layout,
        }
    }

    pub fn id(&self) -> &ObjectId {
        &self.id
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    pub fn body(&self) -> &Dict {
        &self.body
    }

    /// Mutable access marks the record for re-rendering.
    pub fn body_mut(&mut self) -> &mut Dict {
        self.layout.raw = None;
        &mut self.body
    }

    pub fn isa(&self) -> Option<Isa> {
        self.body.get_str("isa").map(Isa::parse)
    }

    /// `name`, else the last component of `path`, else the annotation.
    pub fn display_name(&self) -> Option<&str> {
        self.body
            .get_str("name")
            .or_else(|| {
                self.body
                    .get_str("path")
                    .and_then(|p| p.trim_end_matches('/').rsplit('/').next())
            })
            .or(self.comment.as_deref())
    }

    /// Identifiers listed under `key`, e.g. `children` or `files`.
    pub fn id_list(&self, key: &str) -> Vec<ObjectId> {
        self.body
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(ObjectId::from_key)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn is_dirty(&self) -> bool {
        self.layout.raw.is_none()
    }

    pub(crate) fn render(&self, default_indent: &str, out: &mut String) {
        if let Some(raw) = &self.layout.raw {
            out.push_str(raw);
            return;
        }
        let indent = if self.layout.indent.is_empty() {
            default_indent
        } else {
            self.layout.indent.as_str()
        };
        out.push_str(&self.layout.leading);
        out.push_str(indent);
        Scalar::reference(&self.id, self.comment.as_deref()).write(out);
        out.push_str(" = ");
        let body = Value::Dict(self.body.clone());
        if self.isa().is_some_and(|isa| isa.is_single_line()) {
            body.write_inline(out);
        } else {
            body.write_block(indent, indent_unit(indent), out);
        }
        out.push_str(";\n");
    }
}

/// Tabs for tab-indented files, otherwise half the record indent in spaces.
fn indent_unit(indent: &str) -> &str {
    const SPACES: &str = "                ";
    if indent.is_empty() || indent.contains('\t') {
        return "\t";
    }
    let width = (indent.len() / 2).clamp(1, SPACES.len());
    &SPACES[..width]
}

/// A `PBXFileReference`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub id: ObjectId,
    pub name: String,
    pub path: Option<String>,
    pub file_type: Option<String>,
    pub source_tree: Option<String>,
}

impl FileEntry {
    pub(crate) fn from_record(record: &Record) -> Self {
        let body = record.body();
        Self {
            id: record.id().clone(),
            name: record.display_name().unwrap_or_default().to_string(),
            path: body.get_str("path").map(str::to_string),
            file_type: body
                .get_str("lastKnownFileType")
                .or_else(|| body.get_str("explicitFileType"))
                .map(str::to_string),
            source_tree: body.get_str("sourceTree").map(str::to_string),
        }
    }

    /// Base name of `path`, falling back to the display name.
    pub fn file_name(&self) -> &str {
        self.path
            .as_deref()
            .and_then(|p| p.trim_end_matches('/').rsplit('/').next())
            .filter(|base| !base.is_empty())
            .unwrap_or_else(|| self.name.rsplit('/').next().unwrap_or(&self.name))
    }

    /// Whether this entry answers to `filename`, by display name or by the
    /// base name of its path.
    pub fn matches_name(&self, filename: &str) -> bool {
        self.name == filename
            || self.name.rsplit('/').next() == Some(filename)
            || self.file_name() == filename
    }
}

/// A `PBXBuildFile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    pub id: ObjectId,
    pub file_ref: Option<ObjectId>,
    pub name: Option<String>,
}

impl BuildEntry {
    pub(crate) fn from_record(record: &Record) -> Self {
        Self {
            id: record.id().clone(),
            file_ref: record
                .body()
                .get_str("fileRef")
                .map(ObjectId::from_key),
            name: record.comment().map(str::to_string),
        }
    }
}

/// A `PBXGroup` or `PBXVariantGroup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub id: ObjectId,
    pub name: Option<String>,
    pub children: Vec<ObjectId>,
}

/// A build phase that owns a `files` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phase {
    pub id: ObjectId,
    pub kind: PhaseKind,
    pub files: Vec<ObjectId>,
}

/// A `PBXNativeTarget`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub id: ObjectId,
    pub name: String,
    pub build_phases: Vec<ObjectId>,
}
