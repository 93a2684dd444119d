//! Filtered, concurrent Kubernetes API discovery into a lazily loaded REST mapper
//!
//! Discovering every API group of a large cluster is slow. This crate only discovers
//! the groups a [`GroupFilter`](discovery::GroupFilter) accepts, one task per group,
//! and builds the [`RestMapper`] from them the first time it is queried.
//!
//! # Example
//!
//! ```rust,no_run
//! use fastmapper_client::{core::GroupVersionResource, discovery, Client};
//!
//! # async fn doc<S>(service: S) -> Result<(), fastmapper_client::Error>
//! # where
//! #     S: tower::Service<http::Request<fastmapper_client::client::Body>, Response = http::Response<fastmapper_client::client::Body>> + Send + 'static,
//! #     S::Future: Send + 'static,
//! #     S::Error: Into<tower::BoxError>,
//! # {
//! // `service` is an authenticated HTTP stack pointed at the cluster
//! let client = Client::new(service, "default");
//! let mapper = discovery::fast_discovery_rest_mapper(client);
//!
//! let kind = mapper.kind_for(&GroupVersionResource::resource("deployments")).await?;
//! println!("deployments are {}", kind.api_version());
//! # Ok(())
//! # }
//! ```
//!
//! For more details, see:
//!
//! - [`Client`](crate::client) for the HTTP client behind discovery
//! - [`discovery`] for filters and the discovery functions
//! - [`LazyRestMapper`] for the deferred loader
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod client;
pub use client::Client;

pub mod discovery;

pub mod error;
pub use error::Error;

pub mod lazy;
pub use lazy::{LazyRestMapper, LoaderStatus};

pub use fastmapper_core as core;
pub use fastmapper_core::RestMapper;

/// Convenient alias for `Result<T, Error>`
pub type Result<T, E = Error> = std::result::Result<T, E>;
