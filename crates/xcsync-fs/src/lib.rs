//! Filesystem primitives for xcsync
//!
//! Provides normalized path handling, atomic manifest writes, and
//! format-agnostic configuration loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use path::NormalizedPath;
