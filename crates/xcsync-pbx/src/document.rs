//! The manifest document: raw text interleaved with parsed sections

use std::collections::BTreeMap;

use crate::edit::Edit;
use crate::error::{Error, Result};
use crate::id::ObjectId;
use crate::parser::Parser;
use crate::record::{BuildEntry, FileEntry, Group, Isa, Layout, Phase, PhaseKind, Record, Target};
use crate::value::{Scalar, Value};

const DEFAULT_INDENT: &str = "\t\t";

/// A `/* Begin NAME section */ ... /* End NAME section */` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    name: String,
    begin: String,
    records: Vec<Record>,
    trailing: String,
    end: String,
}

impl Section {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    fn default_indent(&self) -> &str {
        self.records
            .iter()
            .map(|r| r.layout.indent.as_str())
            .find(|indent| !indent.is_empty() && indent.trim().is_empty())
            .unwrap_or(DEFAULT_INDENT)
    }

    fn render(&self, out: &mut String) {
        out.push_str(&self.begin);
        let indent = self.default_indent().to_string();
        for record in &self.records {
            record.render(&indent, out);
        }
        out.push_str(&self.trailing);
        out.push_str(&self.end);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Raw(String),
    Section(Section),
}

/// A parsed `project.pbxproj`.
#[derive(Debug, Clone)]
pub struct Manifest {
    original_source: String,
    nodes: Vec<Node>,
}

impl Manifest {
    /// Parse manifest text.
    ///
    /// Only the outer shape is mandatory: the document must be a property
    /// list. A section whose body does not parse is kept as raw text, with a
    /// warning, and is invisible to typed operations.
    pub fn parse(source: &str) -> Result<Self> {
        check_property_list(source)?;

        let mut nodes = Vec::new();
        let mut raw_start = 0;
        let mut cursor = 0;

        while cursor < source.len() {
            let line_end = source[cursor..]
                .find('\n')
                .map_or(source.len(), |i| cursor + i + 1);
            let line = &source[cursor..line_end];

            let Some(name) = section_begin(line) else {
                cursor = line_end;
                continue;
            };

            let end_marker = format!("/* End {name} section */");
            let Some(rel) = source[line_end..].find(&end_marker) else {
                tracing::warn!(section = name, "section has no end marker; keeping it as raw text");
                cursor = line_end;
                continue;
            };
            let marker_pos = line_end + rel;
            let end_start = source[..marker_pos].rfind('\n').map_or(0, |i| i + 1).max(line_end);
            let end_stop = source[marker_pos..]
                .find('\n')
                .map_or(source.len(), |i| marker_pos + i + 1);

            if raw_start < cursor {
                nodes.push(Node::Raw(source[raw_start..cursor].to_string()));
            }

            let body = &source[line_end..end_start];
            let body_line = source[..line_end].matches('\n').count() + 1;
            match parse_section_body(body, body_line) {
                Ok((records, trailing)) => {
                    tracing::trace!(section = name, records = records.len(), "parsed section");
                    nodes.push(Node::Section(Section {
                        name: name.to_string(),
                        begin: line.to_string(),
                        records,
                        trailing,
                        end: source[end_start..end_stop].to_string(),
                    }));
                }
                Err(e) => {
                    tracing::warn!(section = name, error = %e, "unparseable section kept as raw text");
                    nodes.push(Node::Raw(source[cursor..end_stop].to_string()));
                }
            }

            cursor = end_stop;
            raw_start = cursor;
        }

        if raw_start < source.len() {
            nodes.push(Node::Raw(source[raw_start..].to_string()));
        }

        let manifest = Self {
            original_source: source.to_string(),
            nodes,
        };
        tracing::debug!(
            sections = manifest.sections().count(),
            records = manifest.records().count(),
            "parsed manifest"
        );
        Ok(manifest)
    }

    /// Serialize the document.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(self.original_source.len() + 256);
        for node in &self.nodes {
            match node {
                Node::Raw(text) => out.push_str(text),
                Node::Section(section) => section.render(&mut out),
            }
        }
        out
    }

    pub fn original_source(&self) -> &str {
        &self.original_source
    }

    /// Whether rendering would produce something other than the parsed input.
    pub fn is_modified(&self) -> bool {
        self.render() != self.original_source
    }

    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Section(section) => Some(section),
            Node::Raw(_) => None,
        })
    }

    fn sections_mut(&mut self) -> impl Iterator<Item = &mut Section> {
        self.nodes.iter_mut().filter_map(|node| match node {
            Node::Section(section) => Some(section),
            Node::Raw(_) => None,
        })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections().find(|s| s.name == name)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.sections().flat_map(|s| s.records.iter())
    }

    pub fn records_of(&self, isa: Isa) -> impl Iterator<Item = &Record> {
        self.records()
            .filter(move |r| r.isa().as_ref() == Some(&isa))
    }

    pub fn record(&self, id: &ObjectId) -> Option<&Record> {
        self.records().find(|r| r.id() == id)
    }

    pub fn record_mut(&mut self, id: &ObjectId) -> Option<&mut Record> {
        self.sections_mut()
            .flat_map(|s| s.records.iter_mut())
            .find(|r| r.id() == id)
    }

    /// Whether the identifier is used anywhere, including unparsed text.
    pub fn contains_id(&self, id: &ObjectId) -> bool {
        self.record(id).is_some()
            || self.nodes.iter().any(|node| match node {
                Node::Raw(text) => text.contains(id.as_str()),
                Node::Section(_) => false,
            })
    }

    /// Identifiers that key more than one record.
    pub fn duplicate_ids(&self) -> Vec<ObjectId> {
        let mut counts: BTreeMap<&ObjectId, usize> = BTreeMap::new();
        for record in self.records() {
            *counts.entry(record.id()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn file_entries(&self) -> Vec<FileEntry> {
        self.records_of(Isa::FileReference)
            .map(FileEntry::from_record)
            .collect()
    }

    pub fn build_entries(&self) -> Vec<BuildEntry> {
        self.records_of(Isa::BuildFile)
            .map(BuildEntry::from_record)
            .collect()
    }

    /// Groups and variant groups.
    pub fn groups(&self) -> Vec<Group> {
        self.records()
            .filter(|r| r.isa().is_some_and(|isa| isa.is_group()))
            .map(|r| Group {
                id: r.id().clone(),
                name: r.display_name().map(str::to_string),
                children: r.id_list("children"),
            })
            .collect()
    }

    pub fn phases(&self) -> Vec<Phase> {
        self.records()
            .filter_map(|r| {
                let kind = PhaseKind::from_isa(&r.isa()?)?;
                Some(Phase {
                    id: r.id().clone(),
                    kind,
                    files: r.id_list("files"),
                })
            })
            .collect()
    }

    pub fn targets(&self) -> Vec<Target> {
        self.records_of(Isa::NativeTarget)
            .map(|r| Target {
                id: r.id().clone(),
                name: r
                    .body()
                    .get_str("name")
                    .or(r.comment())
                    .unwrap_or_default()
                    .to_string(),
                build_phases: r.id_list("buildPhases"),
            })
            .collect()
    }

    /// The project's `mainGroup`.
    pub fn main_group(&self) -> Option<ObjectId> {
        self.records_of(Isa::Project)
            .find_map(|r| r.body().get_str("mainGroup"))
            .map(ObjectId::from_key)
    }

    /// Resolve a group by identifier or by display name.
    pub fn find_group(&self, selector: &str) -> Option<ObjectId> {
        let groups = self.groups();
        if let Ok(id) = ObjectId::parse(selector)
            && let Some(group) = groups.iter().find(|g| g.id == id)
        {
            return Some(group.id.clone());
        }
        groups
            .into_iter()
            .find(|g| g.name.as_deref() == Some(selector))
            .map(|g| g.id)
    }

    /// Append a record at the end of `section`.
    ///
    /// A missing section makes this a no-op, reported as [`Edit::Skipped`].
    pub fn insert_record(&mut self, section: &str, record: Record) -> Edit {
        let id = record.id().clone();
        let name = record.comment().map(str::to_string);
        match self.sections_mut().find(|s| s.name == section) {
            Some(target) => {
                target.records.push(record);
                Edit::InsertRecord {
                    section: section.to_string(),
                    id,
                    name,
                }
            }
            None => {
                tracing::warn!(section, id = %id, "section not found; record not inserted");
                Edit::skipped(format!("section {section} not found; {id} not inserted"))
            }
        }
    }

    /// Delete every record keyed by `id`.
    pub fn remove_record(&mut self, id: &ObjectId) -> Vec<Edit> {
        let mut edits = Vec::new();
        for section in self.sections_mut() {
            let name = section.name.clone();
            section.records.retain(|record| {
                if record.id() != id {
                    return true;
                }
                edits.push(Edit::RemoveRecord {
                    section: name.clone(),
                    id: id.clone(),
                    name: record.comment().map(str::to_string),
                });
                false
            });
        }
        edits
    }

    /// Append `member` to the `list` array of the `owner` record.
    ///
    /// A missing owner or list makes this a no-op, reported as [`Edit::Skipped`].
    pub fn add_member(&mut self, owner: &ObjectId, list: &str, member: Scalar) -> Edit {
        let member_id = ObjectId::from_key(&member.text);
        let Some(record) = self.record_mut(owner) else {
            tracing::warn!(owner = %owner, list, "owner record not found; member not added");
            return Edit::skipped(format!("{owner} not found; {member_id} not added to {list}"));
        };
        if record.body().get(list).and_then(Value::as_array).is_none() {
            tracing::warn!(owner = %owner, list, "owner has no such list; member not added");
            return Edit::skipped(format!("{owner} has no {list} list; {member_id} not added"));
        }
        if let Some(items) = record.body_mut().get_mut(list).and_then(Value::as_array_mut) {
            items.push(Value::Scalar(member));
        }
        Edit::AddMember {
            owner: owner.clone(),
            list: list.to_string(),
            member: member_id,
        }
    }

    /// Remove `member` from every identifier list in the document.
    pub fn remove_member(&mut self, member: &ObjectId) -> Vec<Edit> {
        let mut edits = Vec::new();
        for section in self.sections_mut() {
            for record in &mut section.records {
                let lists: Vec<String> = record
                    .body()
                    .iter()
                    .filter(|(_, value)| {
                        value.as_array().is_some_and(|items| {
                            items.iter().any(|i| i.as_str() == Some(member.as_str()))
                        })
                    })
                    .map(|(key, _)| key.text.clone())
                    .collect();
                if lists.is_empty() {
                    continue;
                }

                let owner = record.id().clone();
                let body = record.body_mut();
                for list in lists {
                    let Some(items) = body.get_mut(&list).and_then(Value::as_array_mut) else {
                        continue;
                    };
                    let before = items.len();
                    items.retain(|i| i.as_str() != Some(member.as_str()));
                    for _ in items.len()..before {
                        edits.push(Edit::RemoveMember {
                            owner: owner.clone(),
                            list: list.clone(),
                            member: member.clone(),
                        });
                    }
                }
            }
        }
        edits
    }
}

/// A pbxproj must open with `{`, after an optional `// !$*UTF8*$!` line.
fn check_property_list(source: &str) -> Result<()> {
    for (idx, line) in source.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with("//") {
            continue;
        }
        if trimmed.starts_with('{') {
            return Ok(());
        }
        return Err(Error::parse(idx + 1, "expected '{' opening a property list"));
    }
    Err(Error::parse(1, "manifest is empty"))
}

fn section_begin(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("/* Begin ")?
        .strip_suffix(" section */")
        .filter(|name| !name.is_empty())
}

fn parse_section_body(body: &str, first_line: usize) -> Result<(Vec<Record>, String)> {
    let mut records = Vec::new();
    let mut cursor = 0;

    loop {
        let parsed = Parser::new(body, cursor)
            .parse_record()
            .map_err(|e| match e {
                Error::Parse { line, message } => Error::Parse {
                    line: line + first_line - 1,
                    message,
                },
                other => other,
            })?;
        let Some(parsed) = parsed else {
            break;
        };

        let line_start = body[..parsed.start]
            .rfind('\n')
            .map_or(0, |i| i + 1)
            .max(cursor);

        let mut end = parsed.end;
        let after = &body[end..];
        let spaces = after.len() - after.trim_start_matches([' ', '\t', '\r']).len();
        if after[spaces..].starts_with('\n') {
            end += spaces + 1;
        }

        let layout = Layout {
            leading: body[cursor..line_start].to_string(),
            indent: body[line_start..parsed.start].to_string(),
            raw: Some(body[cursor..end].to_string()),
        };
        records.push(Record::parsed(parsed.key, parsed.body, layout));
        cursor = end;
    }

    Ok((records, body[cursor..].to_string()))
}
