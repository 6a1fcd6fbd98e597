//! Tests for the SyncEngine against temporary Xcode projects

use pretty_assertions::assert_eq;
use xcsync_core::{
    AddOptions, CheckStatus, Error, RemovalReason, SyncConfig, SyncEngine, SyncOptions,
};
use xcsync_fs::NormalizedPath;
use xcsync_pbx::{Edit, IdGenerator, ObjectId};
use xcsync_test_utils::pbxproj::{
    APP_DELEGATE_REF, PbxprojBuilder, SOURCES_PHASE, canonical,
};
use xcsync_test_utils::project::TestProject;

const VIEWS_GROUP: &str = "1E15EDE12EF96C5900000201";
const STALE_REF: &str = "1E15EDE12EF96C5900000301";
const STALE_BUILD: &str = "1E15EDE12EF96C5900000302";
const OLD_REF: &str = "1E15EDE12EF96C5900000303";
const OLD_BUILD: &str = "1E15EDE12EF96C5900000304";
const FOO_REF: &str = "1E15EDE12EF96C5900000305";
const PIN_REF: &str = "A1B2C3D4E5F6789012345678";
const PIN_BUILD: &str = "B1C2D3E4F5A6789012345678";

const WRITE: SyncOptions = SyncOptions { dry_run: false };

fn engine(project: &TestProject, extra: &str) -> SyncEngine {
    let path = project.write_config(extra);
    let config = SyncConfig::load(&NormalizedPath::new(&path)).unwrap();
    SyncEngine::new(config).unwrap()
}

fn seeded_ids(name: &str) -> (String, String) {
    let generator = IdGenerator::seeded("");
    let file_id = generator.generate(name, "ref", |_| false);
    let build_id = generator.generate(name, "build", |c| *c == file_id);
    (file_id.to_string(), build_id.to_string())
}

fn id(value: &str) -> ObjectId {
    ObjectId::parse(value).unwrap()
}

#[test]
fn test_standard_project_is_in_sync() {
    let project = TestProject::standard();
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert!(report.plan.is_empty(), "unexpected plan: {:?}", report.plan);
    assert!(report.edits.is_empty());
    assert!(!report.written);
    assert!(!report.changed());
    assert!(report.diff.is_empty());
    assert_eq!(report.discovered, 2);
    assert_eq!(project.read_manifest(), canonical());
}

#[test]
fn test_new_file_lands_in_parent_directory_group() {
    let project = TestProject::standard();
    project.write_manifest(&PbxprojBuilder::standard().group(VIEWS_GROUP, "Views").build());
    project.write_source("Views/Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert_eq!(report.plan.to_add.len(), 1);
    assert_eq!(report.plan.to_add[0].relative, "Views/Place.swift");
    assert!(report.written);

    let (file_id, build_id) = seeded_ids("Place.swift");
    let expected = PbxprojBuilder::standard()
        .group(VIEWS_GROUP, "Views")
        .source_in(VIEWS_GROUP, "Place.swift", &file_id, &build_id)
        .build();
    assert_eq!(project.read_manifest(), expected);
}

#[test]
fn test_root_level_file_lands_in_app_group() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");

    engine.sync(WRITE).unwrap();

    let (file_id, build_id) = seeded_ids("Place.swift");
    let expected = PbxprojBuilder::standard()
        .source("Place.swift", &file_id, &build_id)
        .build();
    assert_eq!(project.read_manifest(), expected);
}

#[test]
fn test_second_sync_is_a_noop() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    project.write_source("Map/MapView.swift", "struct MapView {}\n");
    let engine = engine(&project, "");

    let first = engine.sync(WRITE).unwrap();
    assert!(first.written);
    let after_first = project.read_manifest();

    let second = engine.sync(WRITE).unwrap();
    assert!(second.plan.is_empty(), "unexpected plan: {:?}", second.plan);
    assert!(!second.written);
    assert_eq!(project.read_manifest(), after_first);
}

#[test]
fn test_plan_is_stable_without_apply() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");

    let manifest = engine.load_manifest().unwrap();
    let discovered = engine.scan().unwrap();
    let present = engine.names_on_disk().unwrap();

    assert_eq!(
        engine.diff(&manifest, &discovered, &present),
        engine.diff(&manifest, &discovered, &present)
    );
}

#[test]
fn test_sync_leaves_manifest_healthy() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .source("Old.swift", OLD_REF, OLD_BUILD)
            .build(),
    );
    project.write_source("Place.swift", "struct Place {}\n");
    project.write_source("Models/Classifier.mlmodel", "model");
    let engine = engine(&project, "");

    engine.sync(WRITE).unwrap();

    let report = engine.check().unwrap();
    assert_eq!(report.status, CheckStatus::Healthy, "{:?}", report.findings);
}

#[test]
fn test_file_entry_alone_counts_as_present() {
    let project = TestProject::standard();
    project.write_manifest(&PbxprojBuilder::standard().orphan("Foo.swift", FOO_REF).build());
    project.write_source("Foo.swift", "struct Foo {}\n");
    let engine = engine(&project, "");

    let report = engine.plan().unwrap();

    assert!(report.plan.to_add.is_empty());
    assert!(report.plan.to_remove.is_empty());
}

#[test]
fn test_denylisted_entry_is_fully_purged() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .source("Stale.swift", STALE_REF, STALE_BUILD)
            .build(),
    );
    project.write_source("Stale.swift", "struct Stale {}\n");
    let engine = engine(&project, "denylist = [\"Stale.swift\"]\n");

    let report = engine.sync(WRITE).unwrap();

    assert_eq!(report.plan.to_remove.len(), 1);
    assert_eq!(report.plan.to_remove[0].reason, RemovalReason::Denylisted);
    assert!(report.plan.to_add.is_empty());
    project.assert_manifest_count("Stale.swift", 0);
    project.assert_manifest_count(STALE_REF, 0);
    project.assert_manifest_count(STALE_BUILD, 0);
    assert_eq!(project.read_manifest(), canonical());
}

#[test]
fn test_deny_pattern_blocks_addition() {
    let project = TestProject::standard();
    project.write_source("LegacyMap.swift", "struct LegacyMap {}\n");
    let engine = engine(&project, "deny_patterns = [\"^Legacy\"]\n");

    let report = engine.plan().unwrap();

    assert!(report.plan.is_empty());
}

#[test]
fn test_missing_file_is_pruned() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .source("Old.swift", OLD_REF, OLD_BUILD)
            .build(),
    );
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert_eq!(report.plan.to_remove[0].name, "Old.swift");
    assert_eq!(report.plan.to_remove[0].reason, RemovalReason::MissingOnDisk);
    assert_eq!(project.read_manifest(), canonical());
}

#[test]
fn test_entry_in_excluded_directory_survives_sync() {
    let project = TestProject::standard();
    let text = PbxprojBuilder::standard()
        .source("Legacy.swift", OLD_REF, OLD_BUILD)
        .build();
    project.write_manifest(&text);
    project.write_source("Old/Legacy.swift", "struct Legacy {}\n");
    let engine = engine(&project, "exclude_dirs = [\"Old\"]\n");

    let report = engine.sync(WRITE).unwrap();

    assert!(report.plan.is_empty(), "unexpected plan: {:?}", report.plan);
    assert!(!report.written);
    assert_eq!(project.read_manifest(), text);
    project.assert_manifest_count("Legacy.swift in Sources", 2);
}

#[test]
fn test_entry_named_apart_from_its_path_is_present() {
    let project = TestProject::standard();
    let text = PbxprojBuilder::standard()
        .source("Foo.swift", FOO_REF, OLD_BUILD)
        .build()
        .replace("path = Foo.swift;", "name = Foo; path = Foo.swift;");
    project.write_manifest(&text);
    project.write_source("Foo.swift", "struct Foo {}\n");
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert!(report.plan.is_empty(), "unexpected plan: {:?}", report.plan);
    assert_eq!(project.read_manifest(), text);
}

#[test]
fn test_entry_named_apart_from_its_path_is_pruned_by_path() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .source("Foo.swift", FOO_REF, OLD_BUILD)
            .build()
            .replace("path = Foo.swift;", "name = Foo; path = Foo.swift;"),
    );
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert_eq!(report.plan.to_remove.len(), 1);
    assert_eq!(report.plan.to_remove[0].name, "Foo.swift");
    project.assert_manifest_count(FOO_REF, 0);
    project.assert_manifest_count(OLD_BUILD, 0);
}

#[test]
fn test_prune_missing_disabled_keeps_entry() {
    let project = TestProject::standard();
    let text = PbxprojBuilder::standard()
        .source("Old.swift", OLD_REF, OLD_BUILD)
        .build();
    project.write_manifest(&text);
    let engine = engine(&project, "prune_missing = false\n");

    let report = engine.sync(WRITE).unwrap();

    assert!(report.plan.is_empty());
    assert_eq!(project.read_manifest(), text);
}

#[test]
fn test_non_allowlisted_entries_are_not_pruned() {
    let project = TestProject::standard();
    // Assets.xcassets is in the manifest; remove it from disk
    project.remove_source("Assets.xcassets");
    let engine = engine(&project, "");

    let report = engine.plan().unwrap();

    assert!(report.plan.is_empty());
}

#[test]
fn test_pinned_ids_survive_repeated_syncs() {
    let project = TestProject::standard();
    project.write_source("MainUI.swift", "struct MainUI {}\n");
    let extra = format!(
        "[pinned.\"MainUI.swift\"]\nfile_id = \"{PIN_REF}\"\nbuild_id = \"{PIN_BUILD}\"\ngroup = \"KnowMaps\"\n"
    );
    let engine = engine(&project, &extra);

    let first = engine.sync(WRITE).unwrap();
    assert_eq!(first.plan.pinned.len(), 1);
    assert!(first.plan.to_add.is_empty());

    let expected = PbxprojBuilder::standard()
        .source("MainUI.swift", PIN_REF, PIN_BUILD)
        .build();
    assert_eq!(project.read_manifest(), expected);

    for _ in 0..2 {
        let report = engine.sync(WRITE).unwrap();
        assert!(report.plan.is_empty(), "unexpected plan: {:?}", report.plan);
        assert!(!report.written);
    }
    // record key, build fileRef, group child
    project.assert_manifest_count(PIN_REF, 3);
    // record key, phase member
    project.assert_manifest_count(PIN_BUILD, 2);
}

#[test]
fn test_pinned_entry_replaces_generated_ids() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .source("MainUI.swift", OLD_REF, OLD_BUILD)
            .build(),
    );
    project.write_source("MainUI.swift", "struct MainUI {}\n");
    let extra = format!(
        "[pinned.\"MainUI.swift\"]\nfile_id = \"{PIN_REF}\"\nbuild_id = \"{PIN_BUILD}\"\n"
    );
    let engine = engine(&project, &extra);

    engine.sync(WRITE).unwrap();

    project.assert_manifest_count(OLD_REF, 0);
    project.assert_manifest_count(OLD_BUILD, 0);
    project.assert_manifest_count(PIN_REF, 3);
    assert!(engine.check().unwrap().is_healthy());
}

#[test]
fn test_denylist_wins_over_pin() {
    let project = TestProject::standard();
    project.write_source("MainUI.swift", "struct MainUI {}\n");
    let extra = format!(
        "denylist = [\"MainUI.swift\"]\n[pinned.\"MainUI.swift\"]\nfile_id = \"{PIN_REF}\"\nbuild_id = \"{PIN_BUILD}\"\n"
    );
    let engine = engine(&project, &extra);

    let report = engine.plan().unwrap();

    assert!(report.plan.is_empty());
}

#[test]
fn test_dry_run_does_not_write() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");

    let report = engine.plan().unwrap();

    assert!(report.dry_run);
    assert!(!report.written);
    assert!(report.changed());
    assert_eq!(report.diff.inserted, 4);
    assert!(report.diff.unified.contains("+\t\t"));
    assert_eq!(project.read_manifest(), canonical());
}

#[test]
fn test_resources_go_to_resources_phase() {
    let project = TestProject::standard();
    project.write_source("cities.json", "[]\n");
    let engine = engine(
        &project,
        "extensions = [\"swift\", \"json\"]\nexclude_dirs = [\"Assets.xcassets\"]\n",
    );

    engine.sync(WRITE).unwrap();

    let (file_id, build_id) = seeded_ids("cities.json");
    let expected = PbxprojBuilder::standard()
        .resource("cities.json", "text.json", &file_id, &build_id)
        .build();
    assert_eq!(project.read_manifest(), expected);
}

#[test]
fn test_missing_phase_skips_build_entry() {
    let project = TestProject::standard();
    project.write_manifest(
        &PbxprojBuilder::standard()
            .without_section("PBXSourcesBuildPhase")
            .build(),
    );
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");

    let report = engine.sync(WRITE).unwrap();

    assert_eq!(report.skipped.len(), 1, "{:?}", report.skipped);
    assert!(report.written);
    let text = project.read_manifest();
    assert!(text.contains("/* Place.swift */ = {isa = PBXFileReference;"));
    assert!(!text.contains("Place.swift in Sources"));
}

#[test]
fn test_missing_manifest_is_reported() {
    let project = TestProject::new();
    let engine = engine(&project, "");

    let err = engine.sync(WRITE).unwrap_err();

    assert!(matches!(err, Error::MissingPath { what: "Manifest", .. }), "got: {err}");
}

#[test]
fn test_missing_source_root_is_reported() {
    let project = TestProject::standard();
    let path = project.write_config("");
    let mut config = SyncConfig::load(&NormalizedPath::new(&path)).unwrap();
    config.source_root = Some(project.root().join("Nowhere").to_string_lossy().into_owned());
    let engine = SyncEngine::new(config).unwrap();

    let err = engine.sync(WRITE).unwrap_err();

    assert!(matches!(err, Error::MissingPath { what: "Source root", .. }), "got: {err}");
}

#[test]
fn test_check_reports_unparseable_manifest_as_broken() {
    let project = TestProject::standard();
    project.write_manifest("this is not a property list\n");
    let engine = engine(&project, "");

    let report = engine.check().unwrap();

    assert_eq!(report.status, CheckStatus::Broken);
    assert_eq!(report.messages.len(), 1);
}

#[test]
fn test_check_reports_orphan_as_inconsistent() {
    let project = TestProject::standard();
    project.write_manifest(&PbxprojBuilder::standard().orphan("Foo.swift", FOO_REF).build());
    let engine = engine(&project, "");

    let report = engine.check().unwrap();

    assert_eq!(report.status, CheckStatus::Inconsistent);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].id, FOO_REF);
}

#[test]
fn test_add_file_with_explicit_ids() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");
    let path = project.source_root().join("Place.swift");

    let report = engine
        .add_file(
            &path.to_string_lossy(),
            AddOptions {
                group: None,
                ids: Some((id(PIN_REF), id(PIN_BUILD))),
            },
            WRITE,
        )
        .unwrap();

    assert!(report.written);
    let expected = PbxprojBuilder::standard()
        .source("Place.swift", PIN_REF, PIN_BUILD)
        .build();
    assert_eq!(project.read_manifest(), expected);
}

#[test]
fn test_add_existing_file_is_skipped() {
    let project = TestProject::standard();
    let engine = engine(&project, "");
    let path = project.source_root().join("AppDelegate.swift");

    let report = engine
        .add_file(&path.to_string_lossy(), AddOptions::default(), WRITE)
        .unwrap();

    assert!(!report.written);
    assert_eq!(report.skipped.len(), 1);
    project.assert_manifest_count(APP_DELEGATE_REF, 3);
}

#[test]
fn test_remove_files_reports_unknown_names() {
    let project = TestProject::standard();
    let engine = engine(&project, "");

    let report = engine
        .remove_files(&["ContentView.swift".to_string(), "Nope.swift".to_string()], WRITE)
        .unwrap();

    assert_eq!(report.plan.to_remove.len(), 1);
    assert_eq!(report.plan.to_remove[0].reason, RemovalReason::Requested);
    assert_eq!(report.skipped, vec!["Nope.swift is not in the manifest"]);
    assert!(report.edits.iter().any(|e| matches!(e, Edit::RemoveRecord { .. })));
    project.assert_manifest_count("ContentView.swift", 0);
    assert!(engine.check().unwrap().is_healthy());
}

#[test]
fn test_add_then_remove_restores_manifest() {
    let project = TestProject::standard();
    project.write_source("Place.swift", "struct Place {}\n");
    let engine = engine(&project, "");
    let path = project.source_root().join("Place.swift");

    engine
        .add_file(&path.to_string_lossy(), AddOptions::default(), WRITE)
        .unwrap();
    assert!(project.read_manifest().contains(SOURCES_PHASE));
    engine.remove_files(&["Place.swift".to_string()], WRITE).unwrap();

    assert_eq!(project.read_manifest(), canonical());
    assert!(!project.read_manifest().contains("Place.swift"));
}
