use pacer_routing::RoutingError;
use thiserror::Error;

/// Failure reported by a [`PositionClient`][crate::PositionClient].
///
/// The walk engine never inspects or retries these; they reach the walk's
/// caller unchanged inside [`WalkError::Network`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("server rejected the request: {0}")]
    Rejected(String),

    #[error("request timed out")]
    Timeout,
}

pub type NetworkResult<T> = Result<T, NetworkError>;

#[derive(Debug, Error)]
pub enum WalkError {
    #[error("walk cancelled")]
    Cancelled,

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("routing failed: {0}")]
    Routing(#[from] RoutingError),

    #[error("position update task failed: {0}")]
    Join(String),
}

impl WalkError {
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, WalkError::Cancelled)
    }
}

pub type WalkResult<T> = Result<T, WalkError>;
