//! Release version parsing.

use serde::{Deserialize, Serialize};

/// A release version, validated against the semantic versioning grammar.
///
/// Parsing is strict: prefixes such as `v1` and partial versions are
/// rejected rather than coerced.
///
/// # Example
///
/// ```
/// use relpub_schema::ReleaseVersion;
///
/// let version = ReleaseVersion::parse("1.0.0").unwrap();
/// assert_eq!(version.to_string(), "1.0.0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseVersion(semver::Version);

/// The version string given for a release could not be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("version \"{input}\" is not acceptable ({reason})")]
pub struct VersionError {
    /// The offending input, verbatim.
    pub input: String,
    /// Lowercased parser error.
    pub reason: String,
}

impl ReleaseVersion {
    /// Parse a semantic version.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionError`] naming the original string when it does
    /// not match the semver grammar.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        semver::Version::parse(input)
            .map(Self)
            .map_err(|e| VersionError {
                input: input.to_string(),
                reason: e.to_string().to_lowercase(),
            })
    }

    /// Whether this is a pre-release (e.g. `1.0.0-beta.1`).
    pub fn is_prerelease(&self) -> bool {
        !self.0.pre.is_empty()
    }
}

impl std::fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ReleaseVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_and_round_trips_plain_version() {
        let v = ReleaseVersion::parse("1.0.0").unwrap();
        assert_eq!(v.to_string(), "1.0.0");
        assert!(!v.is_prerelease());
    }

    #[test]
    fn keeps_prerelease_and_build_metadata() {
        let v = ReleaseVersion::parse("2.1.0-rc.1+build.7").unwrap();
        assert_eq!(v.to_string(), "2.1.0-rc.1+build.7");
        assert!(v.is_prerelease());
    }

    #[test]
    fn rejects_prefixed_version() {
        let err = ReleaseVersion::parse("v1").unwrap_err();
        assert_eq!(err.input, "v1");
        assert!(err.to_string().starts_with("version \"v1\" is not acceptable ("));
    }

    #[test]
    fn rejects_garbage_with_lowercase_reason() {
        let err = ReleaseVersion::parse("abc").unwrap_err();
        assert!(err.to_string().contains("\"abc\""));
        assert_eq!(err.reason, err.reason.to_lowercase());
    }

    #[test]
    fn serializes_as_plain_string() {
        let v = ReleaseVersion::parse("3.4.5").unwrap();
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"3.4.5\"");
    }
}
