//! Identifiers and records exchanged with the registry.

use serde::{Deserialize, Serialize};

/// Distribution channel of a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// General availability (default).
    #[default]
    Stable,
    /// Release candidate.
    Rc,
    /// Beta.
    Beta,
    /// Alpha.
    Alpha,
    /// Development builds.
    Dev,
}

impl Channel {
    /// All channels, in order of decreasing stability.
    pub const ALL: [Self; 5] = [Self::Stable, Self::Rc, Self::Beta, Self::Alpha, Self::Dev];

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stable => "stable",
            Self::Rc => "rc",
            Self::Beta => "beta",
            Self::Alpha => "alpha",
            Self::Dev => "dev",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("channel \"{s}\" is not supported (one of: stable, rc, beta, alpha, dev)")
            })
    }
}

/// Registry identifier of the product a release belongs to.
///
/// Also used as the signing context, which scopes signatures to a single
/// product.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(String);

impl ProductId {
    /// Create a new product identifier (stored as-is).
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Return the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Where the artifact bytes of a registered release must be sent.
///
/// Handed out by the registry on upsert and used exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UploadTarget(String);

impl UploadTarget {
    /// Wrap an upload URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    /// Return the upload URL.
    pub fn url(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UploadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A release as persisted by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Opaque identifier assigned by the registry.
    pub id: String,
    /// Target for the artifact upload.
    pub upload_target: UploadTarget,
}
