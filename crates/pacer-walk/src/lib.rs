//! `pacer-walk` — the humanized walk engine.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                          |
//! |--------------|-------------------------------------------------------------------|
//! | [`routed`]   | `RoutedWalker<D>` — walks a routed path, falls back on quota loss |
//! | [`straight`] | `StraightLineWalker` — the routing-free fallback                  |
//! | [`strategy`] | `WalkStrategy`, `TickHook`, `NoopHook`                            |
//! | [`speed`]    | `SpeedVariant` — minor/major walking-speed drift                  |
//! | [`noise`]    | `NoiseInjector` — GPS imprecision on transmitted positions        |
//! | [`state`]    | `WalkState` — per-walk position and timers                        |
//! | [`events`]   | `WalkEvent`, `EventDispatcher`                                    |
//! | [`client`]   | `PositionClient`, `PositionAck`                                   |
//! | [`cancel`]   | `CancelHandle`, `CancelSignal`                                    |
//! | [`error`]    | `WalkError`, `NetworkError`                                       |
//!
//! # Movement model
//!
//! A walk is a sequence of legs, one per waypoint.  Each leg is a tick loop
//! driven by real (tokio) time: the avatar moves `elapsed × speed` toward
//! the waypoint every tick, and every 8–15 s a slightly perturbed position
//! is sent to the game client without waiting for the answer.  The final
//! position is sent once more at the end and that acknowledgement is the
//! walk's result.

pub mod cancel;
pub mod client;
pub mod error;
pub mod events;
pub mod noise;
pub mod routed;
pub mod speed;
pub mod state;
pub mod straight;
pub mod strategy;

mod stride;

#[cfg(test)]
mod tests;

pub use cancel::{CancelHandle, CancelSignal, cancel_pair};
pub use client::{PositionAck, PositionClient};
pub use error::{NetworkError, NetworkResult, WalkError, WalkResult};
pub use events::{EventDispatcher, WalkEvent};
pub use noise::NoiseInjector;
pub use routed::RoutedWalker;
pub use speed::{MIN_SPEED_KMH, SpeedVariant, kmh_to_mps};
pub use state::WalkState;
pub use straight::StraightLineWalker;
pub use strategy::{NoopHook, TickHook, WalkStrategy};
pub use stride::{
    ARRIVAL_THRESHOLD_M, NEAR_DESTINATION_M, SLOW_APPROACH_KMH, TARGET_SLACK_M, WAYPOINT_REACHED_M,
};
