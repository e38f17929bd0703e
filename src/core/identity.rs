//! Product identity
//!
//! Ids are opaque strings. Ids generated by this tool are `PRD-<ULID>`, but
//! imported data may carry ids minted elsewhere, so any non-empty string is
//! accepted and preserved.

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Prefix used for ids generated by this tool
pub const ID_PREFIX: &str = "PRD";

/// An opaque product identifier, immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Generate a fresh id (`PRD-<ULID>`)
    pub fn generate() -> Self {
        Self(format!("{}-{}", ID_PREFIX, Ulid::new()))
    }

    /// Accept an id from external data; empty or whitespace-only is rejected
    pub fn from_external(s: &str) -> Option<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
