use futures::future;

use super::{DiscoveryClient, GroupFilter};
use crate::{Error, Result};
use fastmapper_core::{DiscoveryRestMapper, GroupResources};

/// Counters from one discovery run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Groups advertised by the server
    pub seen: usize,
    /// Groups accepted by the filter and discovered
    pub picked: usize,
}

/// Discover the filtered groups and build a mapper from them
///
/// Fails only when the group list itself cannot be fetched.
/// Versions that fail to list are logged and left empty, so the mapper silently
/// lacks their resources.
pub async fn discover<C, F>(client: &C, filter: &F) -> Result<DiscoveryRestMapper>
where
    C: DiscoveryClient,
    F: GroupFilter + ?Sized,
{
    let (groups, stats) = discover_group_resources(client, filter).await?;
    tracing::debug!(picked = stats.picked, total = stats.seen, "discovered api groups");
    Ok(DiscoveryRestMapper::new(&groups))
}

/// Discover the resources of every group accepted by `filter`
///
/// Each accepted group gets its own task and all tasks are awaited before returning,
/// whatever their outcome. The returned groups keep the order the server listed them in.
#[tracing::instrument(level = "debug", skip_all)]
pub async fn discover_group_resources<C, F>(
    client: &C,
    filter: &F,
) -> Result<(Vec<GroupResources>, DiscoveryStats)>
where
    C: DiscoveryClient,
    F: GroupFilter + ?Sized,
{
    let groups = client.server_groups().await?;
    let mut stats = DiscoveryStats::default();
    let mut tasks = vec![];
    for group in groups {
        stats.seen += 1;
        let pick = filter.included(&group);
        tracing::debug!(name = group.name.as_str(), pick, "api group");
        if !pick {
            continue;
        }
        stats.picked += 1;
        let client = client.clone();
        let resources = GroupResources::new(group);
        tasks.push(tokio::spawn(async move { discover_versions(&client, resources).await }));
    }

    let discovered = future::join_all(tasks)
        .await
        .into_iter()
        .map(|res| res.map_err(Error::DiscoveryTask))
        .collect::<Result<Vec<_>>>()?;
    Ok((discovered, stats))
}

/// List the resources of each declared version of a group, one version at a time
///
/// A failed listing is logged and stored as an empty list; it is not retried.
pub async fn discover_versions<C: DiscoveryClient>(client: &C, mut resources: GroupResources) -> GroupResources {
    let GroupResources {
        group,
        versioned_resources,
    } = &mut resources;
    for version in &group.versions {
        let listed = match client.server_resources_for_group_version(&version.group_version).await {
            Ok(list) => list.resources,
            Err(err) => {
                tracing::error!(error = %err, group_version = version.group_version.as_str(), "failed to discover resources");
                vec![]
            }
        };
        versioned_resources.insert(version.version.clone(), listed);
    }
    resources
}
