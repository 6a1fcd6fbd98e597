//! Artifact kinds: Xcode file types and the build phase each belongs in

use xcsync_pbx::PhaseKind;

/// Extensions compiled by a Sources phase; everything else is a resource.
pub const COMPILED_EXTENSIONS: &[&str] = &[
    "swift",
    "m",
    "mm",
    "c",
    "cpp",
    "metal",
    "mlmodel",
    "mlpackage",
    "intentdefinition",
];

/// The phase a file with this extension is built in.
pub fn phase_kind(extension: &str) -> PhaseKind {
    let ext = extension.to_ascii_lowercase();
    if COMPILED_EXTENSIONS.contains(&ext.as_str()) {
        PhaseKind::Sources
    } else {
        PhaseKind::Resources
    }
}

/// The `lastKnownFileType` Xcode records for this extension.
pub fn file_type(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "swift" => "sourcecode.swift",
        "m" => "sourcecode.c.objc",
        "mm" => "sourcecode.cpp.objcpp",
        "c" => "sourcecode.c.c",
        "cpp" | "cc" => "sourcecode.cpp.cpp",
        "h" => "sourcecode.c.h",
        "metal" => "sourcecode.metal",
        "mlmodel" => "file.mlmodel",
        "mlpackage" => "folder.mlpackage",
        "intentdefinition" => "file.intentdefinition",
        "xcassets" => "folder.assetcatalog",
        "storyboard" => "file.storyboard",
        "xib" => "file.xib",
        "json" => "text.json",
        "plist" => "text.plist.xml",
        "strings" => "text.plist.strings",
        "xcstrings" => "text.json.xcstrings",
        "png" => "image.png",
        "jpg" | "jpeg" => "image.jpeg",
        "txt" => "text",
        _ => "file",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("swift", PhaseKind::Sources, "sourcecode.swift")]
    #[case("MLPackage", PhaseKind::Sources, "folder.mlpackage")]
    #[case("mlmodel", PhaseKind::Sources, "file.mlmodel")]
    #[case("xcassets", PhaseKind::Resources, "folder.assetcatalog")]
    #[case("json", PhaseKind::Resources, "text.json")]
    #[case("bin", PhaseKind::Resources, "file")]
    fn classifies(#[case] ext: &str, #[case] phase: PhaseKind, #[case] file_type_: &str) {
        assert_eq!(phase_kind(ext), phase);
        assert_eq!(file_type(ext), file_type_);
    }
}
