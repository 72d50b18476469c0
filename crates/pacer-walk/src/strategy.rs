//! The walking contract shared by the routed engine and its fallback.

use async_trait::async_trait;

use pacer_core::Coordinate;

use crate::{CancelSignal, PositionAck, WalkResult};

/// Per-tick work the caller interleaves with walking (e.g. scanning for
/// nearby entities).
///
/// The walk does not advance past a tick until `on_tick` returns; what the
/// hook does has no effect on the walk itself.
#[async_trait]
pub trait TickHook: Send {
    async fn on_tick(&mut self, position: Coordinate);
}

/// A hook that does nothing.  Used when the caller passes `None`.
pub struct NoopHook;

#[async_trait]
impl TickHook for NoopHook {
    async fn on_tick(&mut self, _position: Coordinate) {}
}

/// Move the avatar from where the client says it is to `target`.
///
/// `&mut self` keeps one walker from being driven by two walks at once.
#[async_trait]
pub trait WalkStrategy: Send {
    /// Returns the server's acknowledgement of the final position.
    ///
    /// # Errors
    ///
    /// - `WalkError::Cancelled` once `cancel` fires; nothing further is
    ///   transmitted.
    /// - `WalkError::Network` unchanged from the client.
    /// - `WalkError::Routing` when the routing collaborator fails for a
    ///   reason other than quota exhaustion.
    async fn walk(
        &mut self,
        target: Coordinate,
        on_tick: Option<&mut dyn TickHook>,
        cancel: &CancelSignal,
    ) -> WalkResult<PositionAck>;
}
