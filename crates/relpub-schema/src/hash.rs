//! Integrity metadata carried by a release.

use serde::{Deserialize, Serialize};

/// Base64 (no padding) encoded SHA-512 digest of a release artifact.
///
/// Either computed from the artifact bytes or supplied by the caller, in
/// which case it is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Wrap an already-encoded checksum (stored as-is).
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the encoded checksum as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Checksum {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Checksum {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Base64 (no padding) encoded detached signature over a release artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    /// Wrap an already-encoded signature (stored as-is).
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the encoded signature as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Signature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Signature {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Signature {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
