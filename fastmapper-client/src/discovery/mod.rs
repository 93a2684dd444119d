//! Filtered, concurrent API discovery feeding a lazily loaded REST mapper
//!
//! Discovering every group a cluster serves costs one request per group version,
//! and clusters with many custom resource definitions serve hundreds of groups.
//! This module only queries groups accepted by a [`GroupFilter`] (by default the
//! [`AllowList`] of [`FAST_MAPPER_ALLOWED_API_GROUPS`]), runs one task per group,
//! and hands the result to a [`DiscoveryRestMapper`].
//!
//! ```no_run
//! use fastmapper_client::{discovery, Client};
//! use fastmapper_client::core::GroupKind;
//! # async fn doc(client: Client) -> Result<(), Box<dyn std::error::Error>> {
//! let mapper = discovery::fast_discovery_rest_mapper(client);
//! // nothing has been queried yet; the first lookup runs discovery
//! let mapping = mapper.rest_mapping(&GroupKind::gk("apps", "Deployment"), &[]).await?;
//! println!("{}", mapping.url_path(Some("default")));
//! # Ok(())
//! # }
//! ```
use std::future::Future;

use k8s_openapi::apimachinery::pkg::apis::meta::v1::{APIGroup, APIResourceList, GroupVersionForDiscovery};

use crate::{Client, Error, Result};
pub use fastmapper_core::{
    discovery::{verbs, ApiResource, GroupResources, Scope, CORE_GROUP},
    DiscoveryRestMapper, RestMapper, RestMapping,
};

pub(crate) mod fast;
pub use fast::{discover, discover_group_resources, discover_versions, DiscoveryStats};

pub mod filter;
pub use filter::{AllowList, BlockList, GroupFilter, FAST_MAPPER_ALLOWED_API_GROUPS};

use crate::lazy::LazyRestMapper;

/// The discovery calls the orchestrator relies on
///
/// Implemented for [`Client`]; tests and embedding tools can supply their own.
/// Implementations own connection setup, authentication and any transport retries.
pub trait DiscoveryClient: Clone + Send + Sync + 'static {
    /// Every API group the server advertises, the core group included
    fn server_groups(&self) -> impl Future<Output = Result<Vec<APIGroup>>> + Send;

    /// Resources served at one group version, e.g. `apps/v1` or `v1`
    fn server_resources_for_group_version(
        &self,
        group_version: &str,
    ) -> impl Future<Output = Result<APIResourceList>> + Send;
}

impl DiscoveryClient for Client {
    async fn server_groups(&self) -> Result<Vec<APIGroup>> {
        let mut groups = vec![];
        // legacy core group first, under /api
        match self.list_core_api_versions().await {
            Ok(core) => {
                let versions: Vec<_> = core
                    .versions
                    .into_iter()
                    .map(|version| GroupVersionForDiscovery {
                        group_version: version.clone(),
                        version,
                    })
                    .collect();
                if !versions.is_empty() {
                    groups.push(APIGroup {
                        name: CORE_GROUP.to_string(),
                        preferred_version: versions.first().cloned(),
                        versions,
                        ..APIGroup::default()
                    });
                }
            }
            Err(err) if is_not_served(&err) => tracing::debug!("legacy core api not served: {}", err),
            Err(err) => return Err(err),
        }
        match self.list_api_groups().await {
            Ok(list) => groups.extend(list.groups),
            Err(err) if is_not_served(&err) => tracing::debug!("api groups not served: {}", err),
            Err(err) => return Err(err),
        }
        Ok(groups)
    }

    async fn server_resources_for_group_version(&self, group_version: &str) -> Result<APIResourceList> {
        if group_version.contains('/') {
            self.list_api_group_resources(group_version).await
        } else {
            self.list_core_api_resources(group_version).await
        }
    }
}

fn is_not_served(err: &Error) -> bool {
    err.api_response().is_some_and(|resp| resp.is_not_served())
}

/// Lazily discovers the groups in [`FAST_MAPPER_ALLOWED_API_GROUPS`] on first use
///
/// No request is made until the first query on the returned mapper.
pub fn fast_discovery_rest_mapper(client: Client) -> LazyRestMapper<Client, AllowList> {
    LazyRestMapper::new(client, AllowList::default())
}

/// Lazily discovers the groups accepted by `filter` on first use
pub fn fast_discovery_rest_mapper_with_filter<F: GroupFilter + 'static>(
    client: Client,
    filter: F,
) -> LazyRestMapper<Client, F> {
    LazyRestMapper::new(client, filter)
}
