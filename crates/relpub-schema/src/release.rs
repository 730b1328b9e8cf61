//! The release descriptor sent to the registry.

use serde::{Deserialize, Serialize};

use crate::{
    Channel, Checksum, EntitlementConstraints, Filetype, ProductId, ReleaseVersion, Signature,
};

/// Validated metadata for one release artifact.
///
/// Built once all inputs are resolved and only read afterwards: the
/// registry client and the uploader take it by shared reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseDescriptor {
    /// Product the release belongs to.
    pub product: ProductId,
    /// Semantic version of the release.
    pub version: ReleaseVersion,
    /// Filename presented to downloaders.
    pub filename: String,
    /// Artifact size in bytes.
    pub filesize: u64,
    /// Filetype (`.gz`, `bin`, ...).
    pub filetype: Filetype,
    /// Distribution channel.
    pub channel: Channel,
    /// Target platform (e.g. `linux/amd64`), if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Description, e.g. release notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Entitlements required to access the release.
    #[serde(default, skip_serializing_if = "EntitlementConstraints::is_empty")]
    pub constraints: EntitlementConstraints,
    /// Checksum of the artifact bytes.
    pub checksum: Checksum,
    /// Detached signature, absent when no signing key was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Signature>,
}
