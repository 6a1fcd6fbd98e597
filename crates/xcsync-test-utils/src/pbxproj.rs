//! Canonical `project.pbxproj` fixtures.
//!
//! [`PbxprojBuilder`] writes a small single-target application project in the
//! exact layout Xcode produces, so tests can assert byte-level round trips.
//! Structural identifiers are fixed constants.

pub const APP_NAME: &str = "KnowMaps";

pub const MAIN_GROUP: &str = "1E15EDE12EF96C5900000001";
pub const APP_GROUP: &str = "1E15EDE12EF96C5900000002";
pub const PRODUCTS_GROUP: &str = "1E15EDE12EF96C5900000003";
pub const TARGET: &str = "1E15EDE12EF96C5900000004";
pub const PROJECT: &str = "1E15EDE12EF96C5900000005";
pub const SOURCES_PHASE: &str = "1E15EDE12EF96C5900000006";
pub const RESOURCES_PHASE: &str = "1E15EDE12EF96C5900000007";
pub const FRAMEWORKS_PHASE: &str = "1E15EDE12EF96C5900000008";
pub const PRODUCT_REF: &str = "1E15EDE12EF96C5900000009";
pub const TARGET_CONFIG_LIST: &str = "1E15EDE12EF96C590000000A";
pub const TARGET_DEBUG_CONFIG: &str = "1E15EDE12EF96C590000000B";
pub const PROJECT_CONFIG_LIST: &str = "1E15EDE12EF96C590000000C";
pub const PROJECT_DEBUG_CONFIG: &str = "1E15EDE12EF96C590000000D";

pub const APP_DELEGATE_REF: &str = "1E15EDE12EF96C5900000101";
pub const APP_DELEGATE_BUILD: &str = "1E15EDE12EF96C5900000102";
pub const CONTENT_VIEW_REF: &str = "1E15EDE12EF96C5900000103";
pub const CONTENT_VIEW_BUILD: &str = "1E15EDE12EF96C5900000104";
pub const ASSETS_REF: &str = "1E15EDE12EF96C5900000105";
pub const ASSETS_BUILD: &str = "1E15EDE12EF96C5900000106";

/// Which build phase lists a fixture file's build entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixturePhase {
    Sources,
    Resources,
}

impl FixturePhase {
    fn label(self) -> &'static str {
        match self {
            Self::Sources => "Sources",
            Self::Resources => "Resources",
        }
    }
}

#[derive(Debug, Clone)]
pub struct FixtureFile {
    pub name: String,
    pub file_type: String,
    pub file_id: String,
    /// Build entry identifier and the phase listing it
    pub build: Option<(String, FixturePhase)>,
    /// Owning group identifier; `None` leaves the file ungrouped
    pub group: Option<String>,
}

#[derive(Debug, Clone)]
struct FixtureGroup {
    id: String,
    name: String,
}

/// Builds pbxproj text for a `KnowMaps` application target.
///
/// # Example
///
/// ```rust
/// use xcsync_test_utils::pbxproj::{PbxprojBuilder, SOURCES_PHASE};
///
/// let text = PbxprojBuilder::standard()
///     .source("Place.swift", "AAAAAAAAAAAAAAAAAAAA0001", "AAAAAAAAAAAAAAAAAAAA0002")
///     .build();
/// assert!(text.contains("Place.swift in Sources"));
/// assert!(text.contains(SOURCES_PHASE));
/// ```
#[derive(Debug, Clone)]
pub struct PbxprojBuilder {
    files: Vec<FixtureFile>,
    groups: Vec<FixtureGroup>,
    unit: String,
    omitted: Vec<String>,
}

impl Default for PbxprojBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PbxprojBuilder {
    /// A project with no source files.
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            groups: Vec::new(),
            unit: "\t".to_string(),
            omitted: Vec::new(),
        }
    }

    /// `AppDelegate.swift`, `ContentView.swift`, and `Assets.xcassets`.
    pub fn standard() -> Self {
        Self::new()
            .source("AppDelegate.swift", APP_DELEGATE_REF, APP_DELEGATE_BUILD)
            .source("ContentView.swift", CONTENT_VIEW_REF, CONTENT_VIEW_BUILD)
            .resource("Assets.xcassets", "folder.assetcatalog", ASSETS_REF, ASSETS_BUILD)
    }

    /// A Swift file compiled in Sources, listed in the app group.
    pub fn source(self, name: &str, file_id: &str, build_id: &str) -> Self {
        self.source_in(APP_GROUP, name, file_id, build_id)
    }

    /// A Swift file compiled in Sources, listed in `group`.
    pub fn source_in(self, group: &str, name: &str, file_id: &str, build_id: &str) -> Self {
        self.file(FixtureFile {
            name: name.to_string(),
            file_type: "sourcecode.swift".to_string(),
            file_id: file_id.to_string(),
            build: Some((build_id.to_string(), FixturePhase::Sources)),
            group: Some(group.to_string()),
        })
    }

    /// A file copied in Resources, listed in the app group.
    pub fn resource(self, name: &str, file_type: &str, file_id: &str, build_id: &str) -> Self {
        self.file(FixtureFile {
            name: name.to_string(),
            file_type: file_type.to_string(),
            file_id: file_id.to_string(),
            build: Some((build_id.to_string(), FixturePhase::Resources)),
            group: Some(APP_GROUP.to_string()),
        })
    }

    /// A file entry with no build entry and no group.
    pub fn orphan(self, name: &str, file_id: &str) -> Self {
        self.file(FixtureFile {
            name: name.to_string(),
            file_type: "sourcecode.swift".to_string(),
            file_id: file_id.to_string(),
            build: None,
            group: None,
        })
    }

    pub fn file(mut self, file: FixtureFile) -> Self {
        self.files.push(file);
        self
    }

    /// A subgroup of the app group with `path = name`.
    pub fn group(mut self, id: &str, name: &str) -> Self {
        self.groups.push(FixtureGroup {
            id: id.to_string(),
            name: name.to_string(),
        });
        self
    }

    /// Indentation unit; Xcode writes tabs.
    pub fn indent(mut self, unit: &str) -> Self {
        self.unit = unit.to_string();
        self
    }

    /// Leave out a whole `/* Begin NAME section */` block.
    pub fn without_section(mut self, name: &str) -> Self {
        self.omitted.push(name.to_string());
        self
    }

    pub fn build(&self) -> String {
        let u = self.unit.as_str();
        let rec = u.repeat(2);
        let mut out = String::new();

        out.push_str("// !$*UTF8*$!\n{\n");
        out.push_str(&format!("{u}archiveVersion = 1;\n{u}classes = {{\n{u}}};\n"));
        out.push_str(&format!("{u}objectVersion = 56;\n{u}objects = {{\n"));

        // PBXBuildFile
        let mut body = String::new();
        for file in &self.files {
            if let Some((build_id, phase)) = &file.build {
                body.push_str(&format!(
                    "{rec}{build_id} /* {name} in {label} */ = {{isa = PBXBuildFile; fileRef = {file_id} /* {name} */; }};\n",
                    name = file.name,
                    label = phase.label(),
                    file_id = file.file_id,
                ));
            }
        }
        self.section(&mut out, "PBXBuildFile", &body);

        // PBXFileReference
        let mut body = format!(
            "{rec}{PRODUCT_REF} /* {APP_NAME}.app */ = {{isa = PBXFileReference; explicitFileType = wrapper.application; includeInIndex = 0; path = {APP_NAME}.app; sourceTree = BUILT_PRODUCTS_DIR; }};\n"
        );
        for file in &self.files {
            body.push_str(&format!(
                "{rec}{id} /* {name} */ = {{isa = PBXFileReference; lastKnownFileType = {file_type}; path = {name}; sourceTree = \"<group>\"; }};\n",
                id = file.file_id,
                name = file.name,
                file_type = file.file_type,
            ));
        }
        self.section(&mut out, "PBXFileReference", &body);

        // PBXFrameworksBuildPhase
        let mut body = String::new();
        self.object(&mut body, FRAMEWORKS_PHASE, Some("Frameworks"), |b, i| {
            b.push_str(&format!("{i}isa = PBXFrameworksBuildPhase;\n"));
            b.push_str(&format!("{i}buildActionMask = 2147483647;\n"));
            self.list(b, "files", &[]);
            b.push_str(&format!("{i}runOnlyForDeploymentPostprocessing = 0;\n"));
        });
        self.section(&mut out, "PBXFrameworksBuildPhase", &body);

        // PBXGroup
        let mut body = String::new();
        self.object(&mut body, MAIN_GROUP, None, |b, i| {
            b.push_str(&format!("{i}isa = PBXGroup;\n"));
            self.list(
                b,
                "children",
                &[(APP_GROUP.to_string(), APP_NAME.to_string()), (PRODUCTS_GROUP.to_string(), "Products".to_string())],
            );
            b.push_str(&format!("{i}sourceTree = \"<group>\";\n"));
        });
        self.object(&mut body, APP_GROUP, Some(APP_NAME), |b, i| {
            b.push_str(&format!("{i}isa = PBXGroup;\n"));
            let mut children: Vec<(String, String)> = self
                .groups
                .iter()
                .map(|g| (g.id.clone(), g.name.clone()))
                .collect();
            children.extend(self.members_of(APP_GROUP));
            self.list(b, "children", &children);
            b.push_str(&format!("{i}path = {APP_NAME};\n"));
            b.push_str(&format!("{i}sourceTree = \"<group>\";\n"));
        });
        self.object(&mut body, PRODUCTS_GROUP, Some("Products"), |b, i| {
            b.push_str(&format!("{i}isa = PBXGroup;\n"));
            self.list(b, "children", &[(PRODUCT_REF.to_string(), format!("{APP_NAME}.app"))]);
            b.push_str(&format!("{i}name = Products;\n"));
            b.push_str(&format!("{i}sourceTree = \"<group>\";\n"));
        });
        for group in &self.groups {
            self.object(&mut body, &group.id, Some(&group.name), |b, i| {
                b.push_str(&format!("{i}isa = PBXGroup;\n"));
                self.list(b, "children", &self.members_of(&group.id));
                b.push_str(&format!("{i}path = {};\n", group.name));
                b.push_str(&format!("{i}sourceTree = \"<group>\";\n"));
            });
        }
        self.section(&mut out, "PBXGroup", &body);

        // PBXNativeTarget
        let mut body = String::new();
        self.object(&mut body, TARGET, Some(APP_NAME), |b, i| {
            b.push_str(&format!("{i}isa = PBXNativeTarget;\n"));
            b.push_str(&format!(
                "{i}buildConfigurationList = {TARGET_CONFIG_LIST} /* Build configuration list for PBXNativeTarget \"{APP_NAME}\" */;\n"
            ));
            self.list(
                b,
                "buildPhases",
                &[
                    (SOURCES_PHASE.to_string(), "Sources".to_string()),
                    (FRAMEWORKS_PHASE.to_string(), "Frameworks".to_string()),
                    (RESOURCES_PHASE.to_string(), "Resources".to_string()),
                ],
            );
            self.list(b, "buildRules", &[]);
            self.list(b, "dependencies", &[]);
            b.push_str(&format!("{i}name = {APP_NAME};\n"));
            b.push_str(&format!("{i}productName = {APP_NAME};\n"));
            b.push_str(&format!("{i}productReference = {PRODUCT_REF} /* {APP_NAME}.app */;\n"));
            b.push_str(&format!("{i}productType = \"com.apple.product-type.application\";\n"));
        });
        self.section(&mut out, "PBXNativeTarget", &body);

        // PBXProject
        let mut body = String::new();
        self.object(&mut body, PROJECT, Some("Project object"), |b, i| {
            let i2 = format!("{i}{u}");
            b.push_str(&format!("{i}isa = PBXProject;\n"));
            b.push_str(&format!("{i}attributes = {{\n"));
            b.push_str(&format!("{i2}BuildIndependentTargetsInParallel = 1;\n"));
            b.push_str(&format!("{i2}LastSwiftUpdateCheck = 1500;\n"));
            b.push_str(&format!("{i}}};\n"));
            b.push_str(&format!(
                "{i}buildConfigurationList = {PROJECT_CONFIG_LIST} /* Build configuration list for PBXProject \"{APP_NAME}\" */;\n"
            ));
            b.push_str(&format!("{i}compatibilityVersion = \"Xcode 14.0\";\n"));
            b.push_str(&format!("{i}developmentRegion = en;\n"));
            b.push_str(&format!("{i}hasScannedForEncodings = 0;\n"));
            b.push_str(&format!("{i}knownRegions = (\n{i2}en,\n{i2}Base,\n{i});\n"));
            b.push_str(&format!("{i}mainGroup = {MAIN_GROUP};\n"));
            b.push_str(&format!("{i}productRefGroup = {PRODUCTS_GROUP} /* Products */;\n"));
            b.push_str(&format!("{i}projectDirPath = \"\";\n"));
            b.push_str(&format!("{i}projectRoot = \"\";\n"));
            self.list(b, "targets", &[(TARGET.to_string(), APP_NAME.to_string())]);
        });
        self.section(&mut out, "PBXProject", &body);

        // PBXResourcesBuildPhase / PBXSourcesBuildPhase
        for (isa, id, phase) in [
            ("PBXResourcesBuildPhase", RESOURCES_PHASE, FixturePhase::Resources),
            ("PBXSourcesBuildPhase", SOURCES_PHASE, FixturePhase::Sources),
        ] {
            let members: Vec<(String, String)> = self
                .files
                .iter()
                .filter_map(|f| match &f.build {
                    Some((build_id, p)) if *p == phase => {
                        Some((build_id.clone(), format!("{} in {}", f.name, p.label())))
                    }
                    _ => None,
                })
                .collect();
            let mut body = String::new();
            self.object(&mut body, id, Some(phase.label()), |b, i| {
                b.push_str(&format!("{i}isa = {isa};\n"));
                b.push_str(&format!("{i}buildActionMask = 2147483647;\n"));
                self.list(b, "files", &members);
                b.push_str(&format!("{i}runOnlyForDeploymentPostprocessing = 0;\n"));
            });
            self.section(&mut out, isa, &body);
        }

        // XCBuildConfiguration
        let mut body = String::new();
        for id in [PROJECT_DEBUG_CONFIG, TARGET_DEBUG_CONFIG] {
            self.object(&mut body, id, Some("Debug"), |b, i| {
                let i2 = format!("{i}{u}");
                b.push_str(&format!("{i}isa = XCBuildConfiguration;\n"));
                b.push_str(&format!("{i}buildSettings = {{\n"));
                b.push_str(&format!("{i2}PRODUCT_NAME = \"$(TARGET_NAME)\";\n"));
                b.push_str(&format!("{i2}SWIFT_VERSION = 5.0;\n"));
                b.push_str(&format!("{i}}};\n"));
                b.push_str(&format!("{i}name = Debug;\n"));
            });
        }
        self.section(&mut out, "XCBuildConfiguration", &body);

        // XCConfigurationList
        let mut body = String::new();
        for (id, owner, config) in [
            (PROJECT_CONFIG_LIST, "PBXProject", PROJECT_DEBUG_CONFIG),
            (TARGET_CONFIG_LIST, "PBXNativeTarget", TARGET_DEBUG_CONFIG),
        ] {
            let comment = format!("Build configuration list for {owner} \"{APP_NAME}\"");
            self.object(&mut body, id, Some(&comment), |b, i| {
                b.push_str(&format!("{i}isa = XCConfigurationList;\n"));
                self.list(b, "buildConfigurations", &[(config.to_string(), "Debug".to_string())]);
                b.push_str(&format!("{i}defaultConfigurationIsVisible = 0;\n"));
                b.push_str(&format!("{i}defaultConfigurationName = Debug;\n"));
            });
        }
        self.section(&mut out, "XCConfigurationList", &body);

        out.push_str(&format!("{u}}};\n{u}rootObject = {PROJECT} /* Project object */;\n}}\n"));
        out
    }

    fn members_of(&self, group: &str) -> Vec<(String, String)> {
        self.files
            .iter()
            .filter(|f| f.group.as_deref() == Some(group))
            .map(|f| (f.file_id.clone(), f.name.clone()))
            .collect()
    }

    fn section(&self, out: &mut String, name: &str, body: &str) {
        if self.omitted.iter().any(|o| o == name) {
            return;
        }
        out.push_str(&format!("\n/* Begin {name} section */\n"));
        out.push_str(body);
        out.push_str(&format!("/* End {name} section */\n"));
    }

    fn object(
        &self,
        out: &mut String,
        id: &str,
        comment: Option<&str>,
        fill: impl FnOnce(&mut String, &str),
    ) {
        let u = self.unit.as_str();
        let rec = u.repeat(2);
        let inner = u.repeat(3);
        match comment {
            Some(c) => out.push_str(&format!("{rec}{id} /* {c} */ = {{\n")),
            None => out.push_str(&format!("{rec}{id} = {{\n")),
        }
        fill(out, &inner);
        out.push_str(&format!("{rec}}};\n"));
    }

    fn list(&self, out: &mut String, key: &str, items: &[(String, String)]) {
        let inner = self.unit.repeat(3);
        let item = self.unit.repeat(4);
        out.push_str(&format!("{inner}{key} = (\n"));
        for (id, comment) in items {
            out.push_str(&format!("{item}{id} /* {comment} */,\n"));
        }
        out.push_str(&format!("{inner});\n"));
    }
}

/// The standard fixture as text.
pub fn canonical() -> String {
    PbxprojBuilder::standard().build()
}
