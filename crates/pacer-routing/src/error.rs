//! Routing error type.

use thiserror::Error;

use crate::DirectionsStatus;

/// Errors produced by `pacer-routing` and by `DirectionsProvider`
/// implementations.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("directions request returned {status:?}")]
    Status {
        status:  DirectionsStatus,
        message: Option<String>,
    },

    #[error("directions returned OK with an empty path")]
    EmptyPath,

    #[error("malformed directions response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed encoded polyline at byte {offset}")]
    Polyline { offset: usize },

    #[error("directions transport error: {0}")]
    Transport(String),
}

pub type RoutingResult<T> = Result<T, RoutingError>;
