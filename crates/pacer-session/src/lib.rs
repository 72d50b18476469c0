//! `pacer-session` — the process-wide container around the walk engine.
//!
//! # Crate layout
//!
//! | Module            | Contents                                              |
//! |-------------------|-------------------------------------------------------|
//! | [`session`]       | `Session`, `ClientFactory`, `Navigation`              |
//! | [`builder`]       | `SessionBuilder`                                      |
//! | [`config`]        | `SessionConfig`, `ClientSettings` (TOML)              |
//! | [`last_position`] | `LastPos.ini` restore                                 |
//! | [`stats`]         | `SessionStats`                                        |
//! | [`logging`]       | `init_tracing`, `spawn_event_logger`                  |
//! | [`error`]         | `SessionError`                                        |
//!
//! # Reset
//!
//! ```text
//! reset(settings):
//!   ① LastPos.ini  — a valid "lat:lon" overrides the default position
//!   ② connect      — ClientFactory::connect(settings)
//!   ③ navigation   — RoutedWalker over the new client
//!   ④ inventory    — ClientFactory::inventory(client)
//!   ⑤ swap         — all three replace the previous set together
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod last_position;
pub mod logging;
pub mod session;
pub mod stats;


pub use builder::SessionBuilder;
pub use config::{ClientSettings, SessionConfig};
pub use error::{SessionError, SessionResult};
pub use last_position::{LAST_POSITION_FILE, load_last_position, parse_last_position};
pub use logging::{init_tracing, spawn_event_logger};
pub use session::{ClientFactory, Navigation, Session};
pub use stats::SessionStats;
