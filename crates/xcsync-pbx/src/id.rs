//! Object identifiers and their generation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xcsync_fs::checksum::sha256_hex;

use crate::error::{Error, Result};

/// A 24-character hexadecimal object identifier.
///
/// Identifiers supplied by users go through [`ObjectId::parse`], which
/// validates and uppercases them. Keys read from a manifest are taken as-is so
/// that unusual generators do not make the document unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId(String);

impl ObjectId {
    pub const LEN: usize = 24;

    /// Validate and normalize an identifier.
    pub fn parse(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.len() != Self::LEN || !trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidIdentifier {
                value: value.to_string(),
            });
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub(crate) fn from_key(key: &str) -> Self {
        Self(key.to_string())
    }

    fn from_digest(hex: &str) -> Self {
        Self(hex[..Self::LEN].to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ObjectId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.0
    }
}

/// How fresh identifiers are produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// SHA-256 of `<name>_<role>[_<salt>]`; stable across runs
    #[default]
    Seeded,
    /// UUID v4
    Random,
}

/// Produces identifiers that are not yet taken.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    strategy: IdStrategy,
    salt: String,
}

impl IdGenerator {
    pub fn new(strategy: IdStrategy, salt: impl Into<String>) -> Self {
        Self {
            strategy,
            salt: salt.into(),
        }
    }

    pub fn seeded(salt: impl Into<String>) -> Self {
        Self::new(IdStrategy::Seeded, salt)
    }

    pub fn random() -> Self {
        Self::new(IdStrategy::Random, "")
    }

    /// Generate an identifier for `name` in the given role (`ref`, `build`).
    ///
    /// Collisions are resolved by re-salting the seed with an attempt counter,
    /// so the result never satisfies `is_taken`.
    pub fn generate(&self, name: &str, role: &str, is_taken: impl Fn(&ObjectId) -> bool) -> ObjectId {
        let base = if self.salt.is_empty() {
            format!("{name}_{role}")
        } else {
            format!("{name}_{role}_{}", self.salt)
        };

        let mut attempt = 0u32;
        loop {
            let candidate = match self.strategy {
                IdStrategy::Seeded => {
                    let seed = if attempt == 0 {
                        base.clone()
                    } else {
                        format!("{base}#{attempt}")
                    };
                    ObjectId::from_digest(&sha256_hex(seed.as_bytes()))
                }
                IdStrategy::Random => ObjectId::from_digest(&Uuid::new_v4().simple().to_string()),
            };
            if !is_taken(&candidate) {
                return candidate;
            }
            tracing::debug!(id = %candidate, seed = %base, attempt, "identifier collision, retrying");
            attempt += 1;
        }
    }
}
