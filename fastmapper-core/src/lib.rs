//! Types and the REST mapper behind filtered Kubernetes API discovery
//!
//! This crate has no client. It holds the identifiers ([`GroupVersionKind`] and friends),
//! the per-group discovery results ([`GroupResources`]) and the [`DiscoveryRestMapper`]
//! built from them. The same items are re-exported from `fastmapper` under `fastmapper::core`.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod discovery;
pub use discovery::{ApiResource, GroupResources, Scope};

pub mod gvk;
pub use gvk::{GroupKind, GroupVersion, GroupVersionKind, GroupVersionResource};

pub mod mapper;
pub use mapper::{DiscoveryRestMapper, RestMapper, RestMapping};

mod version;
pub use version::Version;

mod error;
pub use error::{ErrorResponse, MappingError};
