//! Migration identifiers and loaded migration units.

use crate::checksum::compute_checksum;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;

/// Strongly-typed identifier of one migration unit (e.g. `001_init.sql`).
///
/// The identifier is both the ledger key and the sort key. Ordering is the
/// byte-wise lexicographic ordering of the full string, which is what the
/// derived `Ord` on the inner `String` gives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MigrationId(String);

impl<'de> Deserialize<'de> for MigrationId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        MigrationId::try_new(s)
            .ok_or_else(|| serde::de::Error::custom("MigrationId must not be empty"))
    }
}

impl MigrationId {
    /// Create a new `MigrationId`, panicking if the identifier is empty.
    ///
    /// Prefer [`try_new`](Self::try_new) when handling untrusted input.
    pub fn new(identifier: impl Into<String>) -> Self {
        let s = identifier.into();
        assert!(!s.is_empty(), "MigrationId must not be empty");
        Self(s)
    }

    /// Try to create a new `MigrationId`, returning `None` if it is empty.
    pub fn try_new(identifier: impl Into<String>) -> Option<Self> {
        let s = identifier.into();
        if s.is_empty() {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for MigrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for MigrationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for MigrationId {
    type Target = str;
    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for MigrationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for MigrationId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for MigrationId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<String> for MigrationId {
    fn eq(&self, other: &String) -> bool {
        self.0 == *other
    }
}

/// One migration with its content loaded.
///
/// Units are built on demand right before they are applied or hashed, so
/// content is never kept around for the whole discovered set.
#[derive(Debug, Clone)]
pub struct MigrationUnit {
    /// Identifier as reported by the definition source
    pub identifier: MigrationId,
    /// Raw executable payload (one or more statements)
    pub content: String,
}

impl MigrationUnit {
    /// Create a unit from an identifier and its raw content
    pub fn new(identifier: MigrationId, content: impl Into<String>) -> Self {
        Self {
            identifier,
            content: content.into(),
        }
    }

    /// SHA-256 checksum of the content
    pub fn checksum(&self) -> String {
        compute_checksum(&self.content)
    }

    /// Returns `true` when the content has no statements to execute
    pub fn is_blank(&self) -> bool {
        self.content.trim().is_empty()
    }
}
