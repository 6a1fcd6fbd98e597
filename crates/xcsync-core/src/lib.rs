//! Orchestration layer for xcsync
//!
//! This crate ties the manifest model to the source tree:
//!
//! - **Configuration**: `SyncConfig` loading, path resolution, CLI overrides
//! - **Scan**: allow-listed artifacts under the source root
//! - **Plan**: additions and removals by base file name
//! - **Apply**: removals, pinned re-adds, then additions, with group and phase placement
//! - **Check**: referential-integrity audit
//! - **SyncEngine**: all of the above plus one atomic write
//!
//! ```text
//!        xcsync-cli
//!            |
//!       xcsync-core
//!        /       \
//! xcsync-pbx   xcsync-fs
//! ```

pub mod apply;
pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod filetype;
pub mod placement;
pub mod plan;
pub mod scan;

pub use check::{CheckReport, CheckStatus, Finding, FindingKind, check_manifest};
pub use config::{ConfigOverrides, Denylist, PinnedEntry, Placement, SyncConfig};
pub use engine::{AddOptions, SyncEngine, SyncOptions, SyncReport};
pub use error::{Error, Result};
pub use plan::{Removal, RemovalReason, SyncPlan};
pub use scan::DiscoveredFile;
