//! Deciding which API groups are worth discovering
use std::collections::BTreeSet;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIGroup;
use serde::{Deserialize, Serialize};

/// Groups discovered by default
///
/// The core group plus the cluster management groups this crate is commonly used against.
/// Embedding tools extend or replace it through [`AllowList`].
pub const FAST_MAPPER_ALLOWED_API_GROUPS: &[&str] = &[
    "", // core
    "apiextensions.k8s.io",
    "apps",
    "batch",
    "rbac.authorization.k8s.io",
    "console.openshift.io",
    "operators.coreos.com",  // OLM
    "monitoring.coreos.com", // prometheus-operator
];

/// Predicate choosing the API groups to discover
///
/// Evaluated once per advertised group, before any request for that group's resources.
/// Must not have side effects.
pub trait GroupFilter: Send + Sync {
    /// Whether resources of `group` should be discovered
    fn included(&self, group: &APIGroup) -> bool;
}

impl<F> GroupFilter for F
where
    F: Fn(&APIGroup) -> bool + Send + Sync,
{
    fn included(&self, group: &APIGroup) -> bool {
        self(group)
    }
}

/// Only discover the listed groups
///
/// Names match exactly and case-sensitively; `""` is the core group.
/// (De)serializes as a plain list of group names.
///
/// ```
/// use fastmapper_client::discovery::AllowList;
/// let allow = AllowList::default().with_group("cert-manager.io");
/// assert!(allow.contains("apps"));
/// assert!(allow.contains("cert-manager.io"));
/// assert!(!allow.contains("Apps"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllowList(BTreeSet<String>);

impl AllowList {
    /// An allow-list admitting nothing
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    /// Also admit `group`
    #[must_use]
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.0.insert(group.into());
        self
    }

    /// Whether `group` is admitted
    pub fn contains(&self, group: &str) -> bool {
        self.0.contains(group)
    }

    /// Admitted group names in alphabetical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl Default for AllowList {
    fn default() -> Self {
        FAST_MAPPER_ALLOWED_API_GROUPS.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for AllowList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<S: Into<String>> Extend<S> for AllowList {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.0.extend(iter.into_iter().map(Into::into));
    }
}

impl GroupFilter for AllowList {
    fn included(&self, group: &APIGroup) -> bool {
        self.contains(&group.name)
    }
}

/// Discover every group except the listed ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockList(BTreeSet<String>);

impl<S: Into<String>> FromIterator<S> for BlockList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl GroupFilter for BlockList {
    fn included(&self, group: &APIGroup) -> bool {
        !self.0.contains(&group.name)
    }
}
