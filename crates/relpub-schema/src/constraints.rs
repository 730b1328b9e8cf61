//! Entitlement constraint sets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Entitlements a licensee must hold to access a release.
///
/// The identifiers are opaque to relpub. Order is irrelevant and
/// duplicates collapse.
///
/// # Example
///
/// ```
/// use relpub_schema::EntitlementConstraints;
///
/// let c = EntitlementConstraints::parse("b, a,,b");
/// assert_eq!(c.iter().collect::<Vec<_>>(), ["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntitlementConstraints(BTreeSet<String>);

impl EntitlementConstraints {
    /// Parse a comma-separated list. Entries are trimmed and empty
    /// entries dropped, so an empty string yields an empty set.
    pub fn parse(list: &str) -> Self {
        list.split(',').map(str::to_string).collect()
    }

    /// Parse several comma-separated lists (e.g. a repeated flag).
    pub fn from_lists<I, S>(lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lists
            .into_iter()
            .flat_map(|l| Self::parse(l.as_ref()).0)
            .collect()
    }

    /// Whether no entitlement is required.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct entitlements.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the identifiers in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl FromIterator<String> for EntitlementConstraints {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}
