//! Error handling in [`fastmapper_client`][crate]
use std::sync::Arc;

use thiserror::Error;

pub use fastmapper_core::{ErrorResponse, MappingError};

/// Possible errors when discovering and mapping resources
#[derive(Error, Debug)]
pub enum Error {
    /// The API server answered with an error status
    ///
    /// Discovery of the group list surfaces this to callers; failures for single
    /// group versions are only logged.
    #[error("ApiError: {0} ({0:?})")]
    Api(#[source] ErrorResponse),

    /// Service error
    #[error("ServiceError: {0}")]
    Service(#[source] tower::BoxError),

    /// UTF-8 Error
    #[error("UTF-8 Error: {0}")]
    FromUtf8(#[source] std::string::FromUtf8Error),

    /// Http based error
    #[error("HttpError: {0}")]
    HttpError(#[source] http::Error),

    /// Common error case when requesting parsing into own structs
    #[error("Error deserializing response: {0}")]
    SerdeError(#[source] serde_json::Error),

    /// A per-group discovery task panicked or was cancelled
    #[error("Discovery task failed: {0}")]
    DiscoveryTask(#[source] tokio::task::JoinError),

    /// The loaded mapper could not resolve a query
    #[error("Mapping error: {0}")]
    Mapping(#[source] MappingError),

    /// Loading the mapper failed
    ///
    /// Every caller waiting on the same load attempt receives the same shared error.
    #[error("Failed to load REST mapper: {0}")]
    MapperLoad(#[source] Arc<Error>),
}

impl Error {
    /// The API server's error status, looking through shared load failures
    pub fn api_response(&self) -> Option<&ErrorResponse> {
        match self {
            Error::Api(resp) => Some(resp),
            Error::MapperLoad(inner) => inner.api_response(),
            _ => None,
        }
    }
}
