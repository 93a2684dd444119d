//! Discovery results and resource type information
use std::{cmp::Reverse, collections::HashMap};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIResource};
use serde::{Deserialize, Serialize};

use crate::{gvk::GroupVersionKind, Version};

/// Name of the legacy core group served under `/api`
pub const CORE_GROUP: &str = "";

/// Resources discovered for one API group, keyed by version
///
/// Each version the group declares gets exactly one entry once discovery for the
/// group has run. A version whose listing failed is kept with an empty list.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupResources {
    /// The group as advertised by the API server
    pub group: APIGroup,
    /// Resources served at each version of the group
    pub versioned_resources: HashMap<String, Vec<APIResource>>,
}

impl GroupResources {
    /// Bind a group with no discovered versions yet
    pub fn new(group: APIGroup) -> Self {
        Self {
            group,
            versioned_resources: HashMap::new(),
        }
    }

    /// Name of the group, empty for the core group
    pub fn name(&self) -> &str {
        &self.group.name
    }

    /// Resources stored for a version, `None` if the version was never discovered
    pub fn resources(&self, version: &str) -> Option<&[APIResource]> {
        self.versioned_resources.get(version).map(Vec::as_slice)
    }

    /// Declared versions, preferred first, then by descending [`Version`] priority
    pub fn versions_by_priority(&self) -> Vec<&str> {
        let preferred = self.group.preferred_version.as_ref().map(|p| p.version.as_str());
        let mut rest: Vec<&str> = self
            .group
            .versions
            .iter()
            .map(|v| v.version.as_str())
            .filter(|v| Some(*v) != preferred)
            .collect();
        rest.sort_by_cached_key(|v| Reverse(Version::parse(v)));
        rest.dedup();
        preferred
            .filter(|p| self.group.versions.iter().any(|v| v.version == *p))
            .into_iter()
            .chain(rest)
            .collect()
    }
}

/// Information about a Kubernetes API resource
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct ApiResource {
    /// Resource group, empty for core group.
    pub group: String,
    /// group version
    pub version: String,
    /// apiVersion of the resource (v1 for core group,
    /// groupName/groupVersions for other).
    pub api_version: String,
    /// Singular PascalCase name of the resource
    pub kind: String,
    /// Plural name of the resource
    pub plural: String,
    /// Whether objects of this resource live in a namespace
    pub namespaced: bool,
    /// Supported verbs, see [`verbs`]
    pub verbs: Vec<String>,
}

impl ApiResource {
    /// Creates an ApiResource from a discovered `meta::v1::APIResource` and its group version kind
    pub fn from_discovered(ar: &APIResource, gvk: &GroupVersionKind) -> Self {
        ApiResource {
            group: gvk.group.clone(),
            version: gvk.version.clone(),
            api_version: gvk.api_version(),
            kind: gvk.kind.clone(),
            plural: ar.name.clone(),
            namespaced: ar.namespaced,
            verbs: ar.verbs.clone(),
        }
    }

    /// Checks that given verb is supported on this resource.
    pub fn supports_operation(&self, operation: &str) -> bool {
        self.verbs.iter().any(|op| op == operation)
    }
}

/// Resource scope
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Scope {
    /// Objects are global
    Cluster,
    /// Each object lives in namespace.
    Namespaced,
}

impl From<bool> for Scope {
    fn from(namespaced: bool) -> Self {
        if namespaced {
            Scope::Namespaced
        } else {
            Scope::Cluster
        }
    }
}

/// Rbac verbs advertised by discovery
pub mod verbs {
    /// Create a resource
    pub const CREATE: &str = "create";
    /// Get single resource
    pub const GET: &str = "get";
    /// List objects
    pub const LIST: &str = "list";
    /// Watch for objects changes
    pub const WATCH: &str = "watch";
    /// Delete single object
    pub const DELETE: &str = "delete";
    /// Delete multiple objects at once
    pub const DELETE_COLLECTION: &str = "deletecollection";
    /// Update an object
    pub const UPDATE: &str = "update";
    /// Patch an object
    pub const PATCH: &str = "patch";
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::GroupVersionForDiscovery;

    fn group(name: &str, versions: &[&str], preferred: Option<&str>) -> APIGroup {
        let gvfd = |v: &str| GroupVersionForDiscovery {
            group_version: format!("{name}/{v}"),
            version: v.to_string(),
        };
        APIGroup {
            name: name.to_string(),
            versions: versions.iter().map(|v| gvfd(*v)).collect(),
            preferred_version: preferred.map(gvfd),
            ..APIGroup::default()
        }
    }

    #[test]
    fn preferred_version_leads() {
        let gr = GroupResources::new(group("kube.rs", &["v1alpha1", "v1", "v2beta1"], Some("v2beta1")));
        assert_eq!(gr.versions_by_priority(), vec!["v2beta1", "v1", "v1alpha1"]);
    }

    #[test]
    fn falls_back_to_version_priority() {
        let gr = GroupResources::new(group("kube.rs", &["v1beta1", "v1alpha1", "v1"], None));
        assert_eq!(gr.versions_by_priority(), vec!["v1", "v1beta1", "v1alpha1"]);

        // a preferred version the group does not declare is ignored
        let gr = GroupResources::new(group("kube.rs", &["v1"], Some("v9")));
        assert_eq!(gr.versions_by_priority(), vec!["v1"]);
    }

    #[test]
    fn undiscovered_versions_are_absent() {
        let mut gr = GroupResources::new(group("apps", &["v1", "v1beta1"], Some("v1")));
        gr.versioned_resources.insert("v1beta1".into(), vec![]);
        assert_eq!(gr.resources("v1"), None);
        assert_eq!(gr.resources("v1beta1"), Some(&[][..]));
    }
}
