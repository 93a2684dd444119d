use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gvk::{GroupKind, GroupVersionResource};

/// An error response from the API.
#[derive(Error, Deserialize, Serialize, Debug, Clone, Eq, PartialEq)]
#[error("{message}: {reason}")]
pub struct ErrorResponse {
    /// The status
    pub status: String,
    /// A message about the error
    #[serde(default)]
    pub message: String,
    /// The reason for the error
    #[serde(default)]
    pub reason: String,
    /// The error code
    pub code: u16,
}

impl ErrorResponse {
    /// Whether the server reported the path as missing or forbidden
    ///
    /// Discovery treats both as "not served" rather than as a failure.
    pub fn is_not_served(&self) -> bool {
        self.code == 404 || self.code == 403
    }
}

/// Failures resolving kinds and resources against a built mapper
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// No discovered kind matched the group kind at the requested versions
    #[error("no matches for kind {group_kind:?} in versions {versions:?}")]
    NoKindMatch {
        /// The kind that was asked for
        group_kind: GroupKind,
        /// Versions that were tried, empty when any version was acceptable
        versions: Vec<String>,
    },

    /// No discovered resource matched the (partial) resource
    #[error("no matches for resource {0:?}")]
    NoResourceMatch(GroupVersionResource),
}
