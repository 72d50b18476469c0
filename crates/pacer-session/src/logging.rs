use tracing_subscriber::EnvFilter;

use pacer_walk::{EventDispatcher, WalkEvent};

/// Install a `fmt` subscriber filtered by `RUST_LOG` (default
/// `pacer=info,warn`).  Later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("pacer=info,warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

/// Log walk telemetry at `debug` (moves) and `info` (everything else).
pub fn spawn_event_logger(events: &EventDispatcher) -> tokio::task::JoinHandle<()> {
    events.spawn_listener(|event| match event {
        WalkEvent::PathComputed(d) => tracing::info!(
            target: "pacer::events",
            waypoints = d.path.len(),
            distance_m = d.distance_m,
            "new path to destination"
        ),
        WalkEvent::Moved { position } => {
            tracing::debug!(target: "pacer::events", %position, "moved")
        }
        WalkEvent::ImpreciseLocation { position } => {
            tracing::info!(target: "pacer::events", %position, "reported imprecise location")
        }
        WalkEvent::SpeedChanged { old_kmh, new_kmh } => tracing::info!(
            target: "pacer::events",
            old_kmh = format_args!("{old_kmh:.2}"),
            new_kmh = format_args!("{new_kmh:.2}"),
            "walking speed changed"
        ),
    })
}
