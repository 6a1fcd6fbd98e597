//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

/// A path normalized to use forward slashes internally.
///
/// Manifests and source trees are compared by file name, so every path the
/// synchronizer touches goes through this type. Conversion back to a native
/// `PathBuf` happens only at I/O boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        Self {
            inner: path_str.replace('\\', "/"),
        }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = segment.replace('\\', "/");
        if self.inner.is_empty() || self.inner == "." {
            return Self { inner: segment };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the final path component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present, without the leading dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }

    /// Whether the path is absolute on this platform.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/') || self.to_native().is_absolute()
    }

    /// Express this path relative to `base`, if it lives underneath it.
    pub fn relative_to(&self, base: &NormalizedPath) -> Option<Self> {
        let base = base.inner.trim_end_matches('/');
        let rest = self.inner.strip_prefix(base)?;
        if rest.is_empty() {
            return Some(Self {
                inner: String::new(),
            });
        }
        let rest = rest.strip_prefix('/')?;
        Some(Self {
            inner: rest.to_string(),
        })
    }

    /// Resolve a relative path against `base`; absolute paths are returned unchanged.
    pub fn resolve_against(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(&self.inner)
        }
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Know Maps Prod/View/MainUI.swift", Some("MainUI.swift"))]
    #[case("Model.mlpackage/", Some("Model.mlpackage"))]
    #[case("/", None)]
    fn file_name_component(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(NormalizedPath::new(input).file_name(), expected);
    }

    #[rstest]
    #[case("View/MainUI.swift", Some("swift"))]
    #[case("Embedding.mlpackage", Some("mlpackage"))]
    #[case(".gitignore", None)]
    #[case("Makefile", None)]
    fn extension_component(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(NormalizedPath::new(input).extension(), expected);
    }

    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("Know Maps Prod\\View\\MainUI.swift");
        assert_eq!(path.as_str(), "Know Maps Prod/View/MainUI.swift");
    }

    #[test]
    fn relative_to_strips_base() {
        let base = NormalizedPath::new("/work/Know Maps Prod");
        let file = NormalizedPath::new("/work/Know Maps Prod/View/MainUI.swift");
        assert_eq!(
            file.relative_to(&base).unwrap().as_str(),
            "View/MainUI.swift"
        );
    }

    #[test]
    fn relative_to_rejects_sibling_prefix() {
        let base = NormalizedPath::new("/work/View");
        let file = NormalizedPath::new("/work/ViewModels/Foo.swift");
        assert!(file.relative_to(&base).is_none());
    }

    #[test]
    fn resolve_against_keeps_absolute() {
        let base = NormalizedPath::new("/work");
        assert_eq!(
            NormalizedPath::new("/etc/project.pbxproj")
                .resolve_against(&base)
                .as_str(),
            "/etc/project.pbxproj"
        );
        assert_eq!(
            NormalizedPath::new("App.xcodeproj/project.pbxproj")
                .resolve_against(&base)
                .as_str(),
            "/work/App.xcodeproj/project.pbxproj"
        );
    }

    #[test]
    fn parent_of_nested_path() {
        let path = NormalizedPath::new("Know Maps Prod/View/MainUI.swift");
        assert_eq!(path.parent().unwrap().as_str(), "Know Maps Prod/View");
        assert_eq!(
            NormalizedPath::new("MainUI.swift").parent(),
            None
        );
    }
}
