use std::fs;

use pretty_assertions::assert_eq;
use rstest::rstest;
use tempfile::TempDir;
use xcsync_core::{ConfigOverrides, Error, SyncConfig, SyncEngine};
use xcsync_fs::NormalizedPath;
use xcsync_pbx::IdStrategy;

const TOML: &str = r#"
manifest = "App.xcodeproj/project.pbxproj"
source_root = "App"
extensions = ["swift", "json"]
denylist = ["Stale.swift"]
ids = "random"

[placement]
group = "Sources"
target = "App"

[pinned."MainUI.swift"]
file_id = "A1B2C3D4E5F6789012345678"
build_id = "B1C2D3E4F5A6789012345678"
"#;

const JSON: &str = r#"{
  "manifest": "App.xcodeproj/project.pbxproj",
  "source_root": "App",
  "extensions": ["swift", "json"],
  "denylist": ["Stale.swift"],
  "ids": "random",
  "placement": {"group": "Sources", "target": "App"},
  "pinned": {
    "MainUI.swift": {
      "file_id": "A1B2C3D4E5F6789012345678",
      "build_id": "B1C2D3E4F5A6789012345678"
    }
  }
}"#;

const YAML: &str = r#"
manifest: App.xcodeproj/project.pbxproj
source_root: App
extensions: [swift, json]
denylist: [Stale.swift]
ids: random
placement:
  group: Sources
  target: App
pinned:
  MainUI.swift:
    file_id: A1B2C3D4E5F6789012345678
    build_id: B1C2D3E4F5A6789012345678
"#;

fn write(dir: &TempDir, name: &str, content: &str) -> NormalizedPath {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    NormalizedPath::new(path)
}

#[rstest]
#[case("xcsync.toml", TOML)]
#[case("xcsync.json", JSON)]
#[case("xcsync.yaml", YAML)]
fn test_load_every_format(#[case] name: &str, #[case] content: &str) {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, name, content);
    let base = NormalizedPath::new(temp.path());

    let config = SyncConfig::load(&path).unwrap();

    assert_eq!(
        config.manifest.as_deref(),
        Some(base.join("App.xcodeproj/project.pbxproj").as_str())
    );
    assert_eq!(config.source_root.as_deref(), Some(base.join("App").as_str()));
    assert_eq!(config.extensions, vec!["swift", "json"]);
    assert_eq!(config.denylist, vec!["Stale.swift"]);
    assert_eq!(config.ids, IdStrategy::Random);
    assert!(config.prune_missing);
    assert_eq!(config.placement.group.as_deref(), Some("Sources"));
    assert_eq!(config.placement.target.as_deref(), Some("App"));
    let pin = &config.pinned["MainUI.swift"];
    assert_eq!(pin.file_id.as_str(), "A1B2C3D4E5F6789012345678");
    assert_eq!(pin.group, None);
}

#[test]
fn test_discover_prefers_toml() {
    let temp = TempDir::new().unwrap();
    write(&temp, "xcsync.yaml", YAML);
    write(&temp, "xcsync.toml", TOML);

    let found = SyncConfig::discover(&NormalizedPath::new(temp.path())).unwrap();

    assert_eq!(found.file_name(), Some("xcsync.toml"));
}

#[test]
fn test_discover_nothing() {
    let temp = TempDir::new().unwrap();
    assert!(SyncConfig::discover(&NormalizedPath::new(temp.path())).is_none());
}

#[test]
fn test_unknown_key_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "xcsync.toml", "manifest = \"a\"\nmanifset = \"b\"\n");

    let err = SyncConfig::load(&path).unwrap_err();

    assert!(matches!(err, Error::Fs(_)), "got: {err:?}");
    assert!(err.to_string().contains("manifset"), "got: {err}");
}

#[test]
fn test_invalid_pinned_identifier_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write(
        &temp,
        "xcsync.toml",
        "[pinned.\"A.swift\"]\nfile_id = \"not-hex\"\nbuild_id = \"B1C2D3E4F5A6789012345678\"\n",
    );

    assert!(SyncConfig::load(&path).is_err());
}

#[test]
fn test_overrides_take_precedence() {
    let temp = TempDir::new().unwrap();
    let path = write(&temp, "xcsync.toml", TOML);

    let config = SyncConfig::load(&path).unwrap().merge(ConfigOverrides {
        source_root: Some("/elsewhere".into()),
        deny: vec!["Old.swift".into()],
        ..ConfigOverrides::default()
    });

    assert_eq!(config.source_root.as_deref(), Some("/elsewhere"));
    assert_eq!(config.denylist, vec!["Stale.swift", "Old.swift"]);
    assert_eq!(config.extensions, vec!["swift", "json"]);
}

#[test]
fn test_engine_requires_manifest_and_root() {
    let err = SyncEngine::new(SyncConfig::default()).err().unwrap();
    assert!(matches!(err, Error::MissingSetting { setting: "manifest" }));

    let err = SyncEngine::new(SyncConfig {
        manifest: Some("/p/project.pbxproj".into()),
        ..SyncConfig::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, Error::MissingSetting { setting: "source_root" }));
}

#[test]
fn test_engine_rejects_bad_pattern() {
    let config = SyncConfig {
        manifest: Some("/p/project.pbxproj".into()),
        source_root: Some("/p/App".into()),
        deny_patterns: vec!["[".into()],
        ..SyncConfig::default()
    };

    let err = SyncEngine::new(config).err().unwrap();

    assert!(matches!(err, Error::InvalidConfig { .. }), "got: {err}");
}

#[test]
fn test_serialized_config_reloads() {
    let temp = TempDir::new().unwrap();
    let original = SyncConfig::load(&write(&temp, "xcsync.toml", TOML)).unwrap();

    let json = serde_json::to_string(&original).unwrap();
    let reparsed: SyncConfig = serde_json::from_str(&json).unwrap();
    let yaml = serde_yaml::to_string(&original).unwrap();
    let from_yaml: SyncConfig = serde_yaml::from_str(&yaml).unwrap();
    let text = toml::to_string(&original).unwrap();
    let from_toml: SyncConfig = toml::from_str(&text).unwrap();

    assert_eq!(reparsed, original);
    assert_eq!(from_yaml, original);
    assert_eq!(from_toml, original);
}
