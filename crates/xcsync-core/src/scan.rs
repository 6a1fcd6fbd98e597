//! Source-tree scanning

use std::collections::BTreeSet;
use std::path::Path;

use serde::Serialize;
use walkdir::{DirEntry, WalkDir};
use xcsync_fs::NormalizedPath;

use crate::{Error, Result};

/// An allow-listed artifact found under the source root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct DiscoveredFile {
    /// Forward-slash path relative to the source root
    pub relative: String,
    /// Base file name
    pub name: String,
    /// Lowercased extension
    pub extension: String,
    /// Bundles such as `.mlpackage` are directories reported as one artifact
    pub is_dir: bool,
}

impl DiscoveredFile {
    /// Name of the directory holding the file, `None` at the source root.
    pub fn parent_dir_name(&self) -> Option<&str> {
        let (parent, _) = self.relative.rsplit_once('/')?;
        parent.rsplit('/').next()
    }
}

/// Lowercased extension of a file name, ignoring leading dots.
pub fn extension_of(name: &str) -> Option<String> {
    let idx = name.rfind('.').filter(|&i| i > 0)?;
    let ext = &name[idx + 1..];
    (!ext.is_empty()).then(|| ext.to_ascii_lowercase())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Walk `root` and collect artifacts whose extension is allow-listed.
///
/// Hidden entries and directories named in `exclude_dirs` are skipped.
/// Results are sorted by relative path.
pub fn scan(
    root: &NormalizedPath,
    extensions: &BTreeSet<String>,
    exclude_dirs: &[String],
) -> Result<Vec<DiscoveredFile>> {
    let native = root.to_native();
    if !native.is_dir() {
        return Err(Error::MissingPath {
            what: "Source root",
            path: native,
        });
    }

    let mut walker = WalkDir::new(&native)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if is_hidden(entry) {
                return false;
            }
            let excluded = entry.file_type().is_dir()
                && exclude_dirs
                    .iter()
                    .any(|d| entry.file_name().to_string_lossy() == d.as_str());
            !excluded
        });

    let mut found = Vec::new();
    while let Some(entry) = walker.next() {
        let entry = entry.map_err(|source| {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| native.clone());
            Error::Scan { path, source }
        })?;

        let name = entry.file_name().to_string_lossy().to_string();
        let Some(extension) = extension_of(&name) else {
            continue;
        };
        if !extensions.contains(&extension) {
            continue;
        }

        let is_dir = entry.file_type().is_dir();
        if is_dir {
            walker.skip_current_dir();
        }

        let Ok(relative) = entry.path().strip_prefix(&native) else {
            continue;
        };
        found.push(DiscoveredFile {
            relative: NormalizedPath::new(relative).as_str().to_string(),
            name,
            extension,
            is_dir,
        });
    }

    found.sort();
    tracing::debug!(root = %root, found = found.len(), "scanned source root");
    Ok(found)
}

/// Every file and directory name under `root`, hidden and excluded ones
/// included.
///
/// Pruning consults this set so that only entries whose name is gone from
/// disk are removed.
pub fn names_on_disk(root: &NormalizedPath) -> Result<BTreeSet<String>> {
    let native = root.to_native();
    if !native.is_dir() {
        return Err(Error::MissingPath {
            what: "Source root",
            path: native,
        });
    }

    let mut names = BTreeSet::new();
    for entry in WalkDir::new(&native).min_depth(1) {
        let entry = entry.map_err(|source| {
            let path = source
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| native.clone());
            Error::Scan { path, source }
        })?;
        names.insert(entry.file_name().to_string_lossy().to_string());
    }

    tracing::debug!(root = %root, names = names.len(), "collected names on disk");
    Ok(names)
}
