//! stroll — walks a simulated avatar around a short loop.
//!
//! No game server is involved: an in-process client accepts every update
//! after a small artificial latency, and routing is straight-line.  Use
//! `--pace-ms 0` to run the loop without real-time pacing, and Ctrl-C to
//! cancel the current walk.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use futures::future::BoxFuture;

use pacer_core::Coordinate;
use pacer_routing::StraightLineDirections;
use pacer_session::{
    ClientFactory, ClientSettings, SessionBuilder, SessionConfig, SessionResult, init_tracing,
    spawn_event_logger,
};
use pacer_walk::{NetworkResult, PositionAck, PositionClient, TickHook, cancel_pair};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "stroll", about = "Walk a simulated avatar around a loop")]
struct Args {
    /// TOML file with `[client]` and `[walk]` tables.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Side of the square loop, in metres.
    #[arg(long, default_value_t = 120.0)]
    side_m: f64,

    /// Override `walk.tick_pace_ms`.
    #[arg(long)]
    pace_ms: Option<u64>,

    /// Fixed RNG seed.
    #[arg(long)]
    seed: Option<u64>,
}

// ── Simulated client ──────────────────────────────────────────────────────────

const SIMULATED_LATENCY: Duration = Duration::from_millis(40);

struct SimulatedClient {
    position: Mutex<Coordinate>,
}

impl PositionClient for SimulatedClient {
    fn current_position(&self) -> Coordinate {
        *self.position.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn update_player_location(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> BoxFuture<'static, NetworkResult<PositionAck>> {
        let position = Coordinate::new(latitude, longitude, altitude);
        *self.position.lock().unwrap_or_else(|e| e.into_inner()) = position;
        Box::pin(async move {
            tokio::time::sleep(SIMULATED_LATENCY).await;
            Ok(PositionAck { position })
        })
    }
}

struct SimulatedFactory;

impl ClientFactory for SimulatedFactory {
    type Client = SimulatedClient;
    type Inventory = ();

    fn connect(&self, settings: &ClientSettings) -> SessionResult<SimulatedClient> {
        Ok(SimulatedClient { position: Mutex::new(settings.default_position()) })
    }

    fn inventory(&self, _client: &Arc<SimulatedClient>, _config: &SessionConfig) {}
}

// ── Tick hook ─────────────────────────────────────────────────────────────────

/// Counts ticks; stands in for per-tick work such as scanning nearby forts.
#[derive(Default)]
struct TickCounter(u64);

#[async_trait]
impl TickHook for TickCounter {
    async fn on_tick(&mut self, _position: Coordinate) {
        self.0 += 1;
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if let Some(pace_ms) = args.pace_ms {
        config.walk.tick_pace_ms = pace_ms;
    }

    let mut builder = SessionBuilder::new(config, SimulatedFactory, Arc::new(StraightLineDirections));
    if let Some(seed) = args.seed {
        builder = builder.seed(seed);
    }
    let mut session = builder.build()?;
    let _logger = spawn_event_logger(session.events());

    let (cancel, signal) = cancel_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let mut corner = session.client().current_position();
    let mut ticks = TickCounter::default();

    for bearing in [0.0, 90.0, 180.0, 270.0] {
        corner = corner.project(args.side_m, bearing);
        match session.walk_to(corner, Some(&mut ticks), &signal).await {
            Ok(ack) => tracing::info!(at = %ack.position, "corner reached"),
            Err(e) => {
                tracing::warn!(error = %e, "stopping");
                break;
            }
        }
    }

    tracing::info!(ticks = ticks.0, stats = %session.stats(), "done");
    Ok(())
}
