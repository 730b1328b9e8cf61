//! Filetype resolution for release artifacts.

use serde::{Deserialize, Serialize};

/// The filetype recorded for a release.
///
/// Auto-detected values keep the leading dot of the extension (`.gz`,
/// `.dmg`). Filenames without a usable extension map to
/// [`Filetype::BINARY`].
///
/// # Example
///
/// ```
/// use relpub_schema::Filetype;
///
/// assert_eq!(Filetype::detect("app.tar.gz").as_str(), ".gz");
/// assert_eq!(Filetype::detect("app-1.0.1").as_str(), "bin");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filetype(String);

impl Filetype {
    /// Generic marker for artifacts with no meaningful extension.
    pub const BINARY: &'static str = "bin";

    /// Sentinel requesting detection from the filename.
    pub const AUTO: &'static str = "auto";

    /// Use an explicit filetype verbatim.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Resolve a user choice: [`Filetype::AUTO`] detects from `filename`,
    /// anything else is taken as given.
    pub fn resolve(choice: &str, filename: &str) -> Self {
        if choice == Self::AUTO {
            Self::detect(filename)
        } else {
            Self::new(choice)
        }
    }

    /// Derive the filetype from a filename's final extension.
    ///
    /// An empty or purely numeric extension is not an extension: version
    /// segments like the `.1` in `app-1.0.1` would otherwise be picked up.
    pub fn detect(filename: &str) -> Self {
        let ext = extension(filename);
        let bare = ext.strip_prefix('.').unwrap_or(ext);

        if bare.is_empty() || bare.parse::<i64>().is_ok() {
            Self::new(Self::BINARY)
        } else {
            Self::new(ext)
        }
    }

    /// Return the filetype as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Final extension of the last path element, including the dot.
fn extension(filename: &str) -> &str {
    let base = filename.rsplit('/').next().unwrap_or(filename);
    base.rfind('.').map_or("", |i| &base[i..])
}

impl std::fmt::Display for Filetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Filetype {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
