//! [`TestProject`]: a temporary Xcode project tree.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::pbxproj::{self, APP_NAME};

/// Temporary directory laid out like an Xcode project:
///
/// ```text
/// <root>/
///   KnowMaps.xcodeproj/project.pbxproj
///   KnowMaps/...
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// An empty source root with no manifest.
    pub fn new() -> Self {
        let project = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        fs::create_dir_all(project.source_root()).unwrap();
        project
    }

    /// The standard fixture manifest and matching files on disk.
    pub fn standard() -> Self {
        let project = Self::new();
        project.write_manifest(&pbxproj::canonical());
        project.write_source("AppDelegate.swift", "import UIKit\n");
        project.write_source("ContentView.swift", "import SwiftUI\n");
        project.write_source("Assets.xcassets/Contents.json", "{}\n");
        project
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn source_root(&self) -> PathBuf {
        self.root().join(APP_NAME)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root()
            .join(format!("{APP_NAME}.xcodeproj"))
            .join("project.pbxproj")
    }

    /// Relative manifest path as it would appear in a config file.
    pub fn manifest_rel(&self) -> String {
        format!("{APP_NAME}.xcodeproj/project.pbxproj")
    }

    pub fn write_manifest(&self, text: &str) {
        let path = self.manifest_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    pub fn read_manifest(&self) -> String {
        fs::read_to_string(self.manifest_path())
            .unwrap_or_else(|e| panic!("Could not read manifest: {e}"))
    }

    /// Write a file under the source root, creating parent directories.
    pub fn write_source(&self, rel: &str, contents: &str) {
        let path = self.source_root().join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    pub fn remove_source(&self, rel: &str) {
        let path = self.source_root().join(rel);
        if path.is_dir() {
            fs::remove_dir_all(path).unwrap();
        } else {
            fs::remove_file(path).unwrap();
        }
    }

    /// Write `xcsync.toml` at the project root pointing at the fixture
    /// manifest and source root, followed by `extra` TOML.
    pub fn write_config(&self, extra: &str) -> PathBuf {
        let path = self.root().join("xcsync.toml");
        let config = format!(
            "manifest = \"{}\"\nsource_root = \"{APP_NAME}\"\n{extra}",
            self.manifest_rel()
        );
        fs::write(&path, config).unwrap();
        path
    }

    /// Assert that the manifest mentions `needle` exactly `count` times.
    ///
    /// # Panics
    /// Panics with the manifest text when the count differs.
    pub fn assert_manifest_count(&self, needle: &str, count: usize) {
        let text = self.read_manifest();
        let actual = text.matches(needle).count();
        assert_eq!(
            actual, count,
            "Expected {count} occurrence(s) of {needle:?} in manifest, found {actual}.\n{text}"
        );
    }
}
