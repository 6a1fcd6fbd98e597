//! Property-list values found inside manifest records

use crate::id::ObjectId;

/// A string token, with its quoting and optional `/* annotation */`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    pub text: String,
    pub quoted: bool,
    pub comment: Option<String>,
}

impl Scalar {
    /// A scalar quoted the way Xcode would quote it.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let quoted = needs_quotes(&text);
        Self {
            text,
            quoted,
            comment: None,
        }
    }

    /// An object reference, annotated with the referenced object's name.
    pub fn reference(id: &ObjectId, comment: Option<&str>) -> Self {
        Self {
            text: id.as_str().to_string(),
            quoted: false,
            comment: comment.map(str::to_string),
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub(crate) fn write(&self, out: &mut String) {
        if self.quoted {
            out.push('"');
            for c in self.text.chars() {
                match c {
                    '"' => out.push_str("\\\""),
                    '\\' => out.push_str("\\\\"),
                    '\n' => out.push_str("\\n"),
                    '\t' => out.push_str("\\t"),
                    _ => out.push(c),
                }
            }
            out.push('"');
        } else {
            out.push_str(&self.text);
        }
        if let Some(comment) = &self.comment {
            out.push_str(" /* ");
            out.push_str(comment);
            out.push_str(" */");
        }
    }
}

/// Xcode leaves a string bare only when it is made of ASCII alphanumerics and
/// `_$/:.-`.
pub fn needs_quotes(text: &str) -> bool {
    text.is_empty()
        || text.contains("___")
        || text.contains("//")
        || !text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '/' | ':' | '.' | '-'))
}

/// A value: string, array, or dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Scalar(Scalar),
    Array(Vec<Value>),
    Dict(Dict),
}

impl Value {
    pub fn string(text: impl Into<String>) -> Self {
        Self::Scalar(Scalar::new(text))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().map(Scalar::as_str)
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Write on a single line: `{isa = PBXBuildFile; fileRef = X; }`.
    pub(crate) fn write_inline(&self, out: &mut String) {
        match self {
            Self::Scalar(s) => s.write(out),
            Self::Array(items) => {
                out.push('(');
                for item in items {
                    item.write_inline(out);
                    out.push_str(", ");
                }
                out.push(')');
            }
            Self::Dict(dict) => {
                out.push('{');
                for (key, value) in dict.iter() {
                    key.write(out);
                    out.push_str(" = ");
                    value.write_inline(out);
                    out.push_str("; ");
                }
                out.push('}');
            }
        }
    }

    /// Write one entry per line, nested under `indent`.
    pub(crate) fn write_block(&self, indent: &str, unit: &str, out: &mut String) {
        let inner = format!("{indent}{unit}");
        match self {
            Self::Scalar(s) => s.write(out),
            Self::Array(items) => {
                out.push_str("(\n");
                for item in items {
                    out.push_str(&inner);
                    item.write_block(&inner, unit, out);
                    out.push_str(",\n");
                }
                out.push_str(indent);
                out.push(')');
            }
            Self::Dict(dict) => {
                out.push_str("{\n");
                for (key, value) in dict.iter() {
                    out.push_str(&inner);
                    key.write(out);
                    out.push_str(" = ");
                    value.write_block(&inner, unit, out);
                    out.push_str(";\n");
                }
                out.push_str(indent);
                out.push('}');
            }
        }
    }
}

/// An ordered dictionary; key order is preserved on output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dict {
    entries: Vec<(Scalar, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Scalar, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.text == key)
            .map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k.text == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Replace the value for `key`, or append the entry if absent.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((Scalar::new(key), value)),
        }
    }

    pub(crate) fn push(&mut self, key: Scalar, value: Value) {
        self.entries.push((key, value));
    }
}
