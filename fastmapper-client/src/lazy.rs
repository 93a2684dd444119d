//! A REST mapper that runs discovery on first use
use std::{fmt::Debug, sync::Arc};

use futures::{
    future::{BoxFuture, Shared},
    FutureExt,
};
use parking_lot::Mutex;

use crate::{
    discovery::{discover, DiscoveryClient, GroupFilter},
    Error, Result,
};
use fastmapper_core::{
    DiscoveryRestMapper, GroupKind, GroupVersionKind, GroupVersionResource, RestMapper, RestMapping,
};

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<DiscoveryRestMapper>, Arc<Error>>>>;

/// Where a [`LazyRestMapper`] is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderStatus {
    /// Nothing has been queried yet
    Unloaded,
    /// A discovery run is in flight
    Loading,
    /// A mapper is cached and served without further requests
    Loaded,
    /// The last discovery run failed; the next query starts a new one
    Failed,
}

enum LoaderState {
    Unloaded,
    Loading { attempt: u64, load: SharedLoad },
    Loaded(Arc<DiscoveryRestMapper>),
    Failed(Arc<Error>),
}

struct Inner {
    attempts: u64,
    state: LoaderState,
}

/// A [`DiscoveryRestMapper`] that is built by the first query made against it
///
/// Construction performs no I/O. The first query runs [`discover`] with the
/// configured client and filter; concurrent queries arriving meanwhile wait on that
/// same run instead of starting their own, and all receive the same mapper
/// (or the same shared [`Error::MapperLoad`]).
/// Once loaded, the mapper is cached for the lifetime of the handle.
///
/// A failed run is not cached: the next query after a failure starts a fresh run.
pub struct LazyRestMapper<C: DiscoveryClient, F: GroupFilter + 'static> {
    client: C,
    filter: Arc<F>,
    inner: Mutex<Inner>,
}

impl<C: DiscoveryClient, F: GroupFilter + 'static> LazyRestMapper<C, F> {
    /// Wrap a client and filter without contacting the server
    pub fn new(client: C, filter: F) -> Self {
        Self {
            client,
            filter: Arc::new(filter),
            inner: Mutex::new(Inner {
                attempts: 0,
                state: LoaderState::Unloaded,
            }),
        }
    }

    /// Current lifecycle state
    pub fn status(&self) -> LoaderStatus {
        match &self.inner.lock().state {
            LoaderState::Unloaded => LoaderStatus::Unloaded,
            LoaderState::Loading { .. } => LoaderStatus::Loading,
            LoaderState::Loaded(_) => LoaderStatus::Loaded,
            LoaderState::Failed(_) => LoaderStatus::Failed,
        }
    }

    /// The error of the last failed discovery run, if the handle is in the failed state
    pub fn last_error(&self) -> Option<Arc<Error>> {
        match &self.inner.lock().state {
            LoaderState::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// The loaded mapper, running discovery if nothing is cached
    ///
    /// # Errors
    ///
    /// [`Error::MapperLoad`] wrapping the failure of the discovery run this call waited on.
    pub async fn mapper(&self) -> Result<Arc<DiscoveryRestMapper>> {
        let (attempt, load) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;
            match &inner.state {
                LoaderState::Loaded(mapper) => return Ok(mapper.clone()),
                LoaderState::Loading { attempt, load } => {
                    tracing::trace!(attempt, "joining discovery in flight");
                    (*attempt, load.clone())
                }
                LoaderState::Unloaded | LoaderState::Failed(_) => {
                    inner.attempts += 1;
                    let attempt = inner.attempts;
                    tracing::debug!(attempt, "starting discovery");
                    let load = self.load();
                    inner.state = LoaderState::Loading {
                        attempt,
                        load: load.clone(),
                    };
                    (attempt, load)
                }
            }
        };

        let outcome = load.await;

        let mut inner = self.inner.lock();
        if matches!(inner.state, LoaderState::Loading { attempt: current, .. } if current == attempt) {
            inner.state = match &outcome {
                Ok(mapper) => LoaderState::Loaded(mapper.clone()),
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "discovery failed");
                    LoaderState::Failed(err.clone())
                }
            };
        }
        outcome.map_err(Error::MapperLoad)
    }

    fn load(&self) -> SharedLoad {
        let client = self.client.clone();
        let filter = self.filter.clone();
        async move {
            discover(&client, filter.as_ref())
                .await
                .map(Arc::new)
                .map_err(Arc::new)
        }
        .boxed()
        .shared()
    }

    /// See [`RestMapper::kind_for`]
    pub async fn kind_for(&self, resource: &GroupVersionResource) -> Result<GroupVersionKind> {
        self.mapper().await?.kind_for(resource).map_err(Error::Mapping)
    }

    /// See [`RestMapper::kinds_for`]
    pub async fn kinds_for(&self, resource: &GroupVersionResource) -> Result<Vec<GroupVersionKind>> {
        self.mapper().await?.kinds_for(resource).map_err(Error::Mapping)
    }

    /// See [`RestMapper::resource_for`]
    pub async fn resource_for(&self, resource: &GroupVersionResource) -> Result<GroupVersionResource> {
        self.mapper().await?.resource_for(resource).map_err(Error::Mapping)
    }

    /// See [`RestMapper::resources_for`]
    pub async fn resources_for(&self, resource: &GroupVersionResource) -> Result<Vec<GroupVersionResource>> {
        self.mapper().await?.resources_for(resource).map_err(Error::Mapping)
    }

    /// See [`RestMapper::rest_mapping`]
    pub async fn rest_mapping(&self, gk: &GroupKind, versions: &[&str]) -> Result<RestMapping> {
        self.mapper().await?.rest_mapping(gk, versions).map_err(Error::Mapping)
    }

    /// See [`RestMapper::rest_mappings`]
    pub async fn rest_mappings(&self, gk: &GroupKind, versions: &[&str]) -> Result<Vec<RestMapping>> {
        self.mapper().await?.rest_mappings(gk, versions).map_err(Error::Mapping)
    }

    /// See [`RestMapper::resource_singularizer`]
    pub async fn resource_singularizer(&self, resource: &str) -> Result<String> {
        self.mapper()
            .await?
            .resource_singularizer(resource)
            .map_err(Error::Mapping)
    }
}

impl<C: DiscoveryClient, F: GroupFilter + 'static> Debug for LazyRestMapper<C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRestMapper")
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
