//! `pacer-routing` — the routing collaborator seen from the walk engine.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                      |
//! |----------------|---------------------------------------------------------------|
//! | [`directions`] | `DirectionsProvider` trait, `Directions`, `DirectionsStatus`  |
//! | [`google`]     | Parsing a Google Directions JSON response into `Directions`   |
//! | [`polyline`]   | Encoded-polyline decoding                                     |
//! | [`error`]      | `RoutingError`, `RoutingResult<T>`                            |
//!
//! The HTTP client that talks to a real directions service lives outside
//! this workspace.  It implements [`DirectionsProvider`] and can use
//! [`Directions::from_google_json`] to turn a response body into a path.

pub mod directions;
pub mod error;
pub mod google;
pub mod polyline;


pub use directions::{Directions, DirectionsProvider, DirectionsStatus, StraightLineDirections};
pub use error::{RoutingError, RoutingResult};
pub use polyline::decode_polyline;
