//! The game-client seam: where the avatar is, and how a new position is
//! reported.

use futures::future::BoxFuture;

use pacer_core::Coordinate;

use crate::NetworkResult;

/// The server's acknowledgement of a position update.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PositionAck {
    /// The location the server recorded for the player.
    pub position: Coordinate,
}

/// Network client used as the sole channel for reporting position.
///
/// `update_player_location` *issues* the request when called and returns a
/// future resolving to the server's answer.  The engine spawns mid-walk
/// futures without awaiting them (fire-and-forget) and awaits the final one.
pub trait PositionClient: Send + Sync {
    /// The client's current idea of the avatar position.
    fn current_position(&self) -> Coordinate;

    fn update_player_location(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> BoxFuture<'static, NetworkResult<PositionAck>>;
}
