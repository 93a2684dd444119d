//! Fastmapper is an umbrella-crate for fast, filtered discovery of the
//! [Kubernetes](http://kubernetes.io) API.
//!
//! # Overview
//!
//! Building a REST mapper normally means asking the API server about every group it serves.
//! On clusters with many custom resource definitions that is hundreds of requests before the
//! first lookup can be answered. Fastmapper only discovers the groups an allow-list names,
//! discovers them concurrently, and defers all of it until the mapper is first queried.
//!
//! The main modules are:
//!
//! - [`client`](crate::client) with the discovery [`Client`](crate::Client)
//! - [`discovery`](crate::discovery) with group filters and the discovery functions
//! - [`lazy`](crate::lazy) with the deferred [`LazyRestMapper`](crate::LazyRestMapper)
//! - [`core`](crate::core) with identifiers and the [`DiscoveryRestMapper`](crate::core::DiscoveryRestMapper)
//!
//! # Resolving a kind
//!
//! ```no_run
//! use fastmapper::{core::GroupKind, discovery::AllowList, Client};
//!
//! async fn deployments_path(client: Client) -> Result<String, fastmapper::Error> {
//!     // the default allow-list, plus one extra group
//!     let allow = AllowList::default().with_group("cert-manager.io");
//!     let mapper = fastmapper::fast_discovery_rest_mapper_with_filter(client, allow);
//!     let mapping = mapper.rest_mapping(&GroupKind::gk("apps", "Deployment"), &["v1"]).await?;
//!     Ok(mapping.url_path(Some("default")))
//! }
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub use fastmapper_client::{client, discovery, error, lazy};

#[doc(inline)]
pub use client::Client;
#[doc(inline)]
pub use discovery::{fast_discovery_rest_mapper, fast_discovery_rest_mapper_with_filter};
#[doc(inline)]
pub use error::Error;
#[doc(inline)]
pub use lazy::{LazyRestMapper, LoaderStatus};

pub use crate::core::RestMapper;
/// Re-exports from [`fastmapper_core`](fastmapper_core)
#[doc(inline)]
pub use fastmapper_core as core;

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod mock_tests;
