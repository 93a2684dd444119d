//! Translation between kinds and REST resources built from discovery results
//!
//! A [`DiscoveryRestMapper`] is assembled once from a list of [`GroupResources`]
//! and is immutable afterwards, so it can be shared freely between threads.
//!
//! Lookups resolve in priority order: groups in the order they were handed in,
//! versions within a group preferred-first (see [`GroupResources::versions_by_priority`]),
//! and resources in the order the API server listed them.
use crate::{
    discovery::{ApiResource, GroupResources, Scope},
    error::MappingError,
    gvk::{GroupKind, GroupVersionKind, GroupVersionResource},
};

/// Query interface shared by built and lazily loaded mappers
///
/// Empty `group` or `version` fields on a [`GroupVersionResource`] input match anything.
/// Resource names match case-insensitively against plural and singular names.
pub trait RestMapper {
    /// All kinds served for a partially specified resource, best match first
    fn kinds_for(&self, resource: &GroupVersionResource) -> Result<Vec<GroupVersionKind>, MappingError>;

    /// All fully specified resources matching a partial one, best match first
    fn resources_for(&self, resource: &GroupVersionResource)
        -> Result<Vec<GroupVersionResource>, MappingError>;

    /// All mappings for a group kind
    ///
    /// With `versions` given, mappings follow the order of the requested versions.
    /// Without, every served version is returned in priority order.
    fn rest_mappings(&self, gk: &GroupKind, versions: &[&str]) -> Result<Vec<RestMapping>, MappingError>;

    /// Singular name of a resource
    fn resource_singularizer(&self, resource: &str) -> Result<String, MappingError>;

    /// Best kind for a partially specified resource
    fn kind_for(&self, resource: &GroupVersionResource) -> Result<GroupVersionKind, MappingError> {
        first(self.kinds_for(resource)?, || MappingError::NoResourceMatch(resource.clone()))
    }

    /// Best fully specified resource for a partial one
    fn resource_for(&self, resource: &GroupVersionResource) -> Result<GroupVersionResource, MappingError> {
        first(self.resources_for(resource)?, || {
            MappingError::NoResourceMatch(resource.clone())
        })
    }

    /// Best mapping for a group kind, trying `versions` in order when given
    fn rest_mapping(&self, gk: &GroupKind, versions: &[&str]) -> Result<RestMapping, MappingError> {
        first(self.rest_mappings(gk, versions)?, || no_kind_match(gk, versions))
    }
}

fn first<T>(items: Vec<T>, err: impl FnOnce() -> MappingError) -> Result<T, MappingError> {
    items.into_iter().next().ok_or_else(err)
}

fn no_kind_match(gk: &GroupKind, versions: &[&str]) -> MappingError {
    MappingError::NoKindMatch {
        group_kind: gk.clone(),
        versions: versions.iter().map(ToString::to_string).collect(),
    }
}

/// Everything needed to address a kind over REST
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RestMapping {
    /// Fully specified resource
    pub resource: GroupVersionResource,
    /// Fully specified kind
    pub gvk: GroupVersionKind,
    /// Whether the resource is namespaced
    pub scope: Scope,
    /// Verbs the server allows on the resource
    pub verbs: Vec<String>,
}

impl RestMapping {
    /// Type information for this mapping
    pub fn api_resource(&self) -> ApiResource {
        ApiResource {
            group: self.gvk.group.clone(),
            version: self.gvk.version.clone(),
            api_version: self.gvk.api_version(),
            kind: self.gvk.kind.clone(),
            plural: self.resource.resource.clone(),
            namespaced: self.scope == Scope::Namespaced,
            verbs: self.verbs.clone(),
        }
    }

    /// Checks that given verb is supported on this resource.
    pub fn supports_operation(&self, operation: &str) -> bool {
        self.verbs.iter().any(|op| op == operation)
    }

    /// Collection path of the resource, optionally inside a namespace
    ///
    /// The namespace is ignored for cluster scoped resources.
    ///
    /// ```
    /// use fastmapper_core::{mapper::RestMapping, discovery::Scope, GroupVersionKind, GroupVersionResource};
    /// let mapping = RestMapping {
    ///     resource: GroupVersionResource::gvr("apps", "v1", "deployments"),
    ///     gvk: GroupVersionKind::gvk("apps", "v1", "Deployment"),
    ///     scope: Scope::Namespaced,
    ///     verbs: vec![],
    /// };
    /// assert_eq!(mapping.url_path(Some("dev")), "/apis/apps/v1/namespaces/dev/deployments");
    /// assert_eq!(mapping.url_path(None), "/apis/apps/v1/deployments");
    /// ```
    pub fn url_path(&self, namespace: Option<&str>) -> String {
        let prefix = if self.resource.group.is_empty() { "api" } else { "apis" };
        let namespaces = match (self.scope, namespace) {
            (Scope::Namespaced, Some(ns)) => format!("namespaces/{ns}/"),
            _ => String::new(),
        };
        format!(
            "/{prefix}/{api_version}/{namespaces}{plural}",
            api_version = self.resource.api_version(),
            plural = self.resource.resource,
        )
    }
}

#[derive(Debug, Clone)]
struct Entry {
    mapping: RestMapping,
    singular: String,
}

impl Entry {
    fn matches_resource(&self, input: &GroupVersionResource, name: &str) -> bool {
        let res = &self.mapping.resource;
        (input.group.is_empty() || input.group == res.group)
            && (input.version.is_empty() || input.version == res.version)
            && (res.resource == name || self.singular == name)
    }

    fn matches_kind(&self, gk: &GroupKind) -> bool {
        self.mapping.gvk.group == gk.group && self.mapping.gvk.kind == gk.kind
    }
}

/// A [`RestMapper`] assembled from discovered [`GroupResources`]
#[derive(Debug, Clone, Default)]
pub struct DiscoveryRestMapper {
    // priority order
    entries: Vec<Entry>,
}

impl DiscoveryRestMapper {
    /// Build lookup tables from discovery results
    ///
    /// Subresources (names containing `/`) are skipped. Versions without resources
    /// simply contribute nothing.
    pub fn new(groups: &[GroupResources]) -> Self {
        let mut entries = vec![];
        for gr in groups {
            for version in gr.versions_by_priority() {
                for ar in gr.resources(version).unwrap_or_default() {
                    if ar.name.contains('/') {
                        continue;
                    }
                    let gvk = GroupVersionKind::gvk(
                        ar.group.as_deref().unwrap_or(gr.name()),
                        ar.version.as_deref().unwrap_or(version),
                        &ar.kind,
                    );
                    let singular = if ar.singular_name.is_empty() {
                        ar.kind.to_lowercase()
                    } else {
                        ar.singular_name.clone()
                    };
                    entries.push(Entry {
                        mapping: RestMapping {
                            resource: GroupVersionResource::gvr(&gvk.group, &gvk.version, &ar.name),
                            gvk,
                            scope: Scope::from(ar.namespaced),
                            verbs: ar.verbs.clone(),
                        },
                        singular,
                    });
                }
            }
        }
        Self { entries }
    }

    /// Number of mapped resources across all groups and versions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every mapped resource in priority order
    pub fn api_resources(&self) -> impl Iterator<Item = ApiResource> + '_ {
        self.entries.iter().map(|e| e.mapping.api_resource())
    }

    fn matching_resources<'a>(
        &'a self,
        input: &'a GroupVersionResource,
    ) -> Result<impl Iterator<Item = &'a Entry> + 'a, MappingError> {
        if input.resource.is_empty() {
            return Err(MappingError::NoResourceMatch(input.clone()));
        }
        let name = input.resource.to_lowercase();
        Ok(self
            .entries
            .iter()
            .filter(move |e| e.matches_resource(input, &name)))
    }
}

impl RestMapper for DiscoveryRestMapper {
    fn kinds_for(&self, resource: &GroupVersionResource) -> Result<Vec<GroupVersionKind>, MappingError> {
        let kinds: Vec<_> = self
            .matching_resources(resource)?
            .map(|e| e.mapping.gvk.clone())
            .collect();
        if kinds.is_empty() {
            return Err(MappingError::NoResourceMatch(resource.clone()));
        }
        Ok(kinds)
    }

    fn resources_for(
        &self,
        resource: &GroupVersionResource,
    ) -> Result<Vec<GroupVersionResource>, MappingError> {
        let resources: Vec<_> = self
            .matching_resources(resource)?
            .map(|e| e.mapping.resource.clone())
            .collect();
        if resources.is_empty() {
            return Err(MappingError::NoResourceMatch(resource.clone()));
        }
        Ok(resources)
    }

    fn rest_mappings(&self, gk: &GroupKind, versions: &[&str]) -> Result<Vec<RestMapping>, MappingError> {
        let candidates = self.entries.iter().filter(|e| e.matches_kind(gk));
        let mappings: Vec<_> = if versions.is_empty() {
            candidates.map(|e| e.mapping.clone()).collect()
        } else {
            let candidates: Vec<_> = candidates.collect();
            versions
                .iter()
                .flat_map(|v| candidates.iter().filter(move |e| e.mapping.gvk.version == *v))
                .map(|e| e.mapping.clone())
                .collect()
        };
        if mappings.is_empty() {
            return Err(no_kind_match(gk, versions));
        }
        Ok(mappings)
    }

    fn resource_singularizer(&self, resource: &str) -> Result<String, MappingError> {
        let name = resource.to_lowercase();
        self.entries
            .iter()
            .find(|e| e.mapping.resource.resource == name || e.singular == name)
            .map(|e| e.singular.clone())
            .ok_or_else(|| MappingError::NoResourceMatch(GroupVersionResource::resource(resource)))
    }
}
