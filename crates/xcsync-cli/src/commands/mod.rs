//! Command implementations for xcsync-cli

pub mod check;
pub mod entry;
pub mod scan;
pub mod sync;

pub use check::run_check;
pub use entry::{AddArgs, run_add, run_remove};
pub use scan::run_scan;
pub use sync::{run_plan, run_sync};
