//! Shared types for relpub releases.
//!
//! Everything that describes a release on the wire lives here: the
//! validated version, integrity metadata (checksum and signature),
//! filetype detection, entitlement constraints, and the
//! [`ReleaseDescriptor`] sent to the registry. The crate performs no I/O.

pub mod constraints;
pub mod filetype;
pub mod hash;
pub mod release;
pub mod types;
pub mod version;

// Re-exports
pub use constraints::EntitlementConstraints;
pub use filetype::Filetype;
pub use hash::{Checksum, Signature};
pub use release::ReleaseDescriptor;
pub use types::*;
pub use version::{ReleaseVersion, VersionError};
