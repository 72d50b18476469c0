//! Directions provider trait and route model.
//!
//! # Pluggability
//!
//! The walk engine asks for a path through the [`DirectionsProvider`] trait,
//! so applications plug in a web directions service, a local router, or a
//! canned provider in tests without touching the engine.
//!
//! # Quota exhaustion
//!
//! A provider that has run out of quota does **not** return an error.  It
//! returns `Directions` with [`DirectionsStatus::OverQueryLimit`]; the
//! engine treats that status as a signal to switch to straight-line walking.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use pacer_core::Coordinate;

use crate::{RoutingError, RoutingResult};

// ── DirectionsStatus ──────────────────────────────────────────────────────────

/// Status reported by a directions service.
///
/// Serialized in the `SCREAMING_SNAKE_CASE` form used by web directions
/// APIs (`"OK"`, `"OVER_QUERY_LIMIT"`, …).  Unrecognized values deserialize
/// to `Other`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DirectionsStatus {
    Ok,
    NotFound,
    ZeroResults,
    MaxWaypointsExceeded,
    InvalidRequest,
    OverQueryLimit,
    RequestDenied,
    UnknownError,
    #[serde(other)]
    Other,
}

impl DirectionsStatus {
    /// `true` when the provider's rate or usage limit has been reached.
    #[inline]
    pub fn is_quota_exhausted(self) -> bool {
        matches!(self, DirectionsStatus::OverQueryLimit)
    }

    #[inline]
    pub fn is_ok(self) -> bool {
        matches!(self, DirectionsStatus::Ok)
    }
}

// ── Directions ────────────────────────────────────────────────────────────────

/// The result of a directions query.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    pub status: DirectionsStatus,
    /// Waypoints in travel order, source side first.  Empty unless `status`
    /// is `Ok`.
    pub path: Vec<Coordinate>,
    /// Route length reported by the provider, in metres.
    pub distance_m: Option<f64>,
    /// Travel time reported by the provider, in seconds.
    pub duration_secs: Option<f64>,
    /// Provider-supplied explanation for a non-OK status.
    pub error_message: Option<String>,
}

impl Directions {
    /// A successful result over `path` with no provider metadata.
    pub fn ok(path: Vec<Coordinate>) -> Self {
        Self {
            status: DirectionsStatus::Ok,
            path,
            distance_m: None,
            duration_secs: None,
            error_message: None,
        }
    }

    /// A path-less result carrying only `status`.
    pub fn with_status(status: DirectionsStatus) -> Self {
        Self {
            status,
            path: Vec::new(),
            distance_m: None,
            duration_secs: None,
            error_message: None,
        }
    }

    /// Turn any status other than `Ok` into `RoutingError::Status`, and an
    /// `Ok` without waypoints into `RoutingError::EmptyPath`.
    pub fn ensure_ok(&self) -> RoutingResult<()> {
        if !self.status.is_ok() {
            return Err(RoutingError::Status {
                status:  self.status,
                message: self.error_message.clone(),
            });
        }
        if self.path.is_empty() {
            return Err(RoutingError::EmptyPath);
        }
        Ok(())
    }

    /// Sum of great-circle distances between consecutive waypoints.
    pub fn path_length_m(&self) -> f64 {
        self.path.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }
}

// ── DirectionsProvider trait ──────────────────────────────────────────────────

/// Pluggable routing collaborator.
///
/// Implementations must be `Send + Sync`; the walk engine holds one behind
/// an `Arc` and awaits it from a tokio task.
#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    /// Route from `source` through `waypoints` (in order) to `destination`.
    async fn directions(
        &self,
        source: Coordinate,
        waypoints: &[Coordinate],
        destination: Coordinate,
    ) -> RoutingResult<Directions>;
}

// ── StraightLineDirections ────────────────────────────────────────────────────

/// Provider that never consults a road network: the path is the requested
/// waypoints followed by the destination.
///
/// Useful offline and in demos.
#[derive(Debug, Default, Clone, Copy)]
pub struct StraightLineDirections;

#[async_trait]
impl DirectionsProvider for StraightLineDirections {
    async fn directions(
        &self,
        source: Coordinate,
        waypoints: &[Coordinate],
        destination: Coordinate,
    ) -> RoutingResult<Directions> {
        let mut path = Vec::with_capacity(waypoints.len() + 1);
        path.extend_from_slice(waypoints);
        path.push(destination);
        let mut directions = Directions::ok(path);
        let mut legs = vec![source];
        legs.extend_from_slice(&directions.path);
        directions.distance_m = Some(legs.windows(2).map(|w| w[0].distance_to(&w[1])).sum());
        Ok(directions)
    }
}
