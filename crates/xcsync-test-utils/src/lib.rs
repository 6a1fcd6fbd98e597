//! Shared test utilities for the xcsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`pbxproj`]: canonical `project.pbxproj` text with known identifiers
//! - [`project`]: [`TestProject`](project::TestProject), a temporary Xcode project tree

pub mod pbxproj;
pub mod project;
