//! Unit tests for pacer-walk.
//!
//! Async tests run on tokio's paused clock: every paced sleep advances
//! virtual time instantly, so a two-minute walk finishes in milliseconds
//! and elapsed-time arithmetic is exact.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use pacer_core::{Coordinate, WalkSettings};
use pacer_routing::{Directions, DirectionsProvider, RoutingError, RoutingResult};

use crate::{
    CancelSignal, NetworkError, NetworkResult, PositionAck, PositionClient, TickHook, WalkEvent,
    WalkResult, WalkStrategy,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn origin() -> Coordinate {
    Coordinate::new(51.5, -0.12, 11.0)
}

fn settings(use_variant: bool) -> WalkSettings {
    WalkSettings {
        walking_speed_kmh: 5.0,
        walking_speed_variance_kmh: 1.0,
        use_walking_speed_variant: use_variant,
        ..WalkSettings::default()
    }
}

/// Records every position update at the moment it is issued.
struct MockClient {
    position: Mutex<Coordinate>,
    calls:    Mutex<Vec<Coordinate>>,
    failure:  Option<NetworkError>,
    latency:  Option<Duration>,
}

impl MockClient {
    fn at(position: Coordinate) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(position),
            calls:    Mutex::new(Vec::new()),
            failure:  None,
            latency:  None,
        })
    }

    fn failing(position: Coordinate, failure: NetworkError) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(position),
            calls:    Mutex::new(Vec::new()),
            failure:  Some(failure),
            latency:  None,
        })
    }

    /// Every answer arrives `latency` after the request.
    fn slow(position: Coordinate, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            position: Mutex::new(position),
            calls:    Mutex::new(Vec::new()),
            failure:  None,
            latency:  Some(latency),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn calls(&self) -> Vec<Coordinate> {
        self.calls.lock().unwrap().clone()
    }
}

impl PositionClient for MockClient {
    fn current_position(&self) -> Coordinate {
        *self.position.lock().unwrap()
    }

    fn update_player_location(
        &self,
        latitude: f64,
        longitude: f64,
        altitude: f64,
    ) -> BoxFuture<'static, NetworkResult<PositionAck>> {
        let at = Coordinate::new(latitude, longitude, altitude);
        self.calls.lock().unwrap().push(at);
        let result = match &self.failure {
            Some(e) => Err(e.clone()),
            None => {
                *self.position.lock().unwrap() = at;
                Ok(PositionAck { position: at })
            }
        };
        match self.latency {
            Some(latency) => Box::pin(async move {
                tokio::time::sleep(latency).await;
                result
            }),
            None => Box::pin(futures::future::ready(result)),
        }
    }
}

enum Canned {
    Answer(Directions),
    Transport(&'static str),
}

struct MockDirections {
    canned: Canned,
    calls:  AtomicUsize,
}

impl MockDirections {
    fn answering(directions: Directions) -> Arc<Self> {
        Arc::new(Self { canned: Canned::Answer(directions), calls: AtomicUsize::new(0) })
    }

    fn broken(message: &'static str) -> Arc<Self> {
        Arc::new(Self { canned: Canned::Transport(message), calls: AtomicUsize::new(0) })
    }
}

#[async_trait]
impl DirectionsProvider for MockDirections {
    async fn directions(
        &self,
        _source: Coordinate,
        _waypoints: &[Coordinate],
        _destination: Coordinate,
    ) -> RoutingResult<Directions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.canned {
            Canned::Answer(d) => Ok(d.clone()),
            Canned::Transport(m) => Err(RoutingError::Transport((*m).to_string())),
        }
    }
}

#[derive(Default)]
struct RecordingHook {
    positions: Vec<Coordinate>,
}

#[async_trait]
impl TickHook for RecordingHook {
    async fn on_tick(&mut self, position: Coordinate) {
        self.positions.push(position);
    }
}

fn drain(rx: &mut tokio::sync::broadcast::Receiver<WalkEvent>) -> Vec<WalkEvent> {
    let mut out = Vec::new();
    while let Ok(e) = rx.try_recv() {
        out.push(e);
    }
    out
}

// ── SpeedVariant ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod speed_variant {
    use std::time::Duration;

    use tokio::time::Instant;

    use pacer_core::{SpeedVariantConfig, WalkRng};

    use crate::{EventDispatcher, MIN_SPEED_KMH, SpeedVariant, WalkEvent, kmh_to_mps};

    fn config() -> SpeedVariantConfig {
        SpeedVariantConfig { baseline_kmh: 5.0, variance_kmh: 1.5, use_variant: true }
    }

    #[test]
    fn starts_unset_and_initializes_to_baseline() {
        let mut s = SpeedVariant::new(config());
        assert_eq!(s.current_kmh(), 0.0);
        assert_eq!(s.ensure_initialized(), 5.0);
    }

    #[test]
    fn minor_stays_within_bounds() {
        let events = EventDispatcher::new(16);
        let mut rng = WalkRng::new(11);
        let mut s = SpeedVariant::new(config());
        let (min, max) = s.minor_bounds();
        assert_eq!((min, max), (3.0, 7.0));
        for _ in 0..20_000 {
            let v = s.minor(&mut rng, &events);
            assert!((min..=max).contains(&v), "{v} escaped [{min}, {max}]");
        }
    }

    #[test]
    fn minor_emits_only_on_change() {
        let events = EventDispatcher::new(1024);
        let mut rx = events.subscribe();
        let mut rng = WalkRng::new(3);
        let mut s = SpeedVariant::new(config());
        s.ensure_initialized();

        let mut changes = 0;
        for _ in 0..500 {
            let before = s.current_kmh();
            let after = s.minor(&mut rng, &events);
            if after != before {
                changes += 1;
                assert!((after - before).abs() < 0.09 + 1e-12);
            }
        }
        let emitted = super::drain(&mut rx);
        assert_eq!(emitted.len(), changes);
        assert!(changes > 100, "coin flip should change roughly half the time");
        assert!(emitted.iter().all(|e| matches!(e, WalkEvent::SpeedChanged { old_kmh, new_kmh } if old_kmh != new_kmh)));
    }

    #[test]
    fn major_constant_between_rollovers() {
        let events = EventDispatcher::new(64);
        let mut rx = events.subscribe();
        let mut rng = WalkRng::new(5);
        let mut s = SpeedVariant::new(config());
        let t0 = Instant::now();

        // First use: baseline, next change 2–6 minutes out, no event.
        assert_eq!(s.major(t0, &mut rng, &events), 5.0);
        let next = s.next_change_at().unwrap();
        let wait = next - t0;
        assert!(wait >= Duration::from_secs(120) && wait < Duration::from_secs(360), "{wait:?}");
        assert!(super::drain(&mut rx).is_empty());

        // Inside the window nothing changes.
        for secs in [1, 30, 90, 119] {
            assert_eq!(s.major(t0 + Duration::from_secs(secs), &mut rng, &events), 5.0);
        }
        assert_eq!(s.major(next, &mut rng, &events), 5.0);
        assert!(super::drain(&mut rx).is_empty());

        // Exactly one rollover once the window has passed.
        let after = next + Duration::from_millis(1);
        let drifted = s.major(after, &mut rng, &events);
        assert!((3.5..=6.5).contains(&drifted), "{drifted}");
        assert_eq!(s.last_change_at(), Some(after));
        let rescheduled = s.next_change_at().unwrap();
        assert!(rescheduled - after >= Duration::from_secs(120));
        assert_eq!(s.major(after + Duration::from_secs(60), &mut rng, &events), drifted);
        assert_eq!(super::drain(&mut rx).len(), 1);
    }

    #[test]
    fn major_with_zero_variance_stays_at_baseline() {
        let events = EventDispatcher::new(8);
        let mut rng = WalkRng::new(9);
        let mut s = SpeedVariant::new(SpeedVariantConfig { variance_kmh: 0.0, ..config() });
        let t0 = Instant::now();
        s.major(t0, &mut rng, &events);
        let later = t0 + Duration::from_secs(3_600);
        assert_eq!(s.major(later, &mut rng, &events), 5.0);
    }

    #[test]
    fn wide_variance_never_goes_below_floor() {
        let events = EventDispatcher::new(4096);
        let mut rng = WalkRng::new(17);
        let mut s = SpeedVariant::new(SpeedVariantConfig {
            baseline_kmh: 1.0,
            variance_kmh: 2.0,
            use_variant: true,
        });
        assert_eq!(s.minor_bounds().0, MIN_SPEED_KMH);

        let mut t = Instant::now();
        s.major(t, &mut rng, &events);
        for _ in 0..500 {
            t = s.next_change_at().unwrap() + Duration::from_millis(1);
            let v = s.major(t, &mut rng, &events);
            assert!(v >= MIN_SPEED_KMH, "major drew {v}");
        }
        for _ in 0..5_000 {
            let v = s.refresh(t, &mut rng, &events);
            assert!(v >= MIN_SPEED_KMH, "refresh gave {v}");
        }
    }

    #[test]
    fn refresh_uses_minor_below_baseline() {
        let events = EventDispatcher::new(8);
        let mut rng = WalkRng::new(2);
        let mut s = SpeedVariant::new(config());
        let t0 = Instant::now();
        s.major(t0, &mut rng, &events);
        // Force a rollover until the drawn speed lands below baseline.
        let mut t = t0;
        while s.current_kmh() >= 5.0 {
            t = s.next_change_at().unwrap() + Duration::from_millis(1);
            s.major(t, &mut rng, &events);
        }
        let scheduled = s.next_change_at();
        // Past the schedule, but below baseline → minor; schedule untouched.
        s.refresh(t + Duration::from_secs(3_600), &mut rng, &events);
        assert_eq!(s.next_change_at(), scheduled);
    }

    #[test]
    fn kmh_conversion() {
        assert!((kmh_to_mps(3.6) - 1.0).abs() < 1e-12);
    }
}

// ── NoiseInjector ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod noise {
    use pacer_core::{Coordinate, WalkRng};

    use crate::NoiseInjector;

    fn angular_gap(a: f64, b: f64) -> f64 {
        let d = (a - b).rem_euclid(360.0);
        d.min(360.0 - d)
    }

    #[test]
    fn stays_within_radius_and_cone() {
        let noise = NoiseInjector::default();
        let mut rng = WalkRng::new(21);
        let p = Coordinate::new(48.8584, 2.2945, 0.0);
        for travel in [0.0, 10.0, 90.0, 200.0, 350.0] {
            for _ in 0..2_000 {
                let n = noise.noisy(p, travel, &mut rng);
                let d = p.distance_to(&n);
                assert!(d < 3.0, "distance {d}");
                if d > 0.01 {
                    let gap = angular_gap(p.bearing_to(&n), travel);
                    assert!(gap <= 40.0 + 1e-3, "bearing gap {gap} for travel {travel}");
                }
            }
        }
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let noise = NoiseInjector::default();
        let p = Coordinate::new(0.0, 0.0, 0.0);
        let a = noise.noisy(p, 45.0, &mut WalkRng::new(1));
        let b = noise.noisy(p, 45.0, &mut WalkRng::new(1));
        assert_eq!(a, b);
    }
}

// ── Cancellation & events ─────────────────────────────────────────────────────

#[cfg(test)]
mod plumbing {
    use crate::{CancelSignal, EventDispatcher, WalkEvent, cancel_pair};
    use pacer_core::Coordinate;

    #[tokio::test]
    async fn cancel_reaches_every_clone() {
        let (handle, signal) = cancel_pair();
        let other = handle.signal();
        let copy = signal.clone();
        assert!(!signal.is_cancelled());
        handle.cancel();
        assert!(signal.is_cancelled() && other.is_cancelled() && copy.is_cancelled());
        copy.cancelled().await;
    }

    #[test]
    fn never_signal_stays_quiet() {
        assert!(!CancelSignal::never().is_cancelled());
    }

    #[tokio::test]
    async fn dispatcher_fans_out_and_tolerates_no_listeners() {
        let events = EventDispatcher::new(8);
        events.send(WalkEvent::Moved { position: Coordinate::default() });

        let mut a = events.subscribe();
        let mut b = events.subscribe();
        assert_eq!(events.listener_count(), 2);
        let e = WalkEvent::SpeedChanged { old_kmh: 1.0, new_kmh: 2.0 };
        events.send(e.clone());
        assert_eq!(a.recv().await.unwrap(), e);
        assert_eq!(b.recv().await.unwrap(), e);
    }

    #[tokio::test]
    async fn spawned_listener_sees_events_until_close() {
        let events = EventDispatcher::new(8);
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let task = events.spawn_listener(move |e| {
            let _ = tx.send(e);
        });
        events.send(WalkEvent::Moved { position: Coordinate::new(1.0, 2.0, 0.0) });
        drop(events);
        task.await.unwrap();
        assert!(matches!(rx.recv().await, Some(WalkEvent::Moved { .. })));
    }
}

// ── RoutedWalker ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod routed_walker {
    use super::*;
    use pacer_core::WalkRng;
    use pacer_routing::DirectionsStatus;

    use crate::{CancelHandle, EventDispatcher, RoutedWalker, WalkError, cancel_pair};

    fn walker(
        client: &Arc<MockClient>,
        directions: &Arc<MockDirections>,
        events: &EventDispatcher,
        settings: WalkSettings,
    ) -> RoutedWalker<MockDirections> {
        RoutedWalker::new(
            client.clone(),
            directions.clone(),
            events.clone(),
            settings,
            WalkRng::new(42),
        )
    }

    fn diagonal_route() -> (Coordinate, Directions) {
        let o = origin();
        let target = o.project(150.0, 45.0);
        let path = vec![o.project(50.0, 45.0), o.project(100.0, 45.0), target];
        (target, Directions::ok(path))
    }

    #[tokio::test(start_paused = true)]
    async fn already_at_target_short_circuits() {
        let p0 = origin();
        let client = MockClient::at(p0);
        let directions = MockDirections::answering(Directions::ok(vec![p0]));
        let events = EventDispatcher::new(64);
        let mut w = walker(&client, &directions, &events, settings(true));
        let mut hook = RecordingHook::default();

        let ack = w.walk(p0, Some(&mut hook), &CancelSignal::never()).await.unwrap();

        assert_eq!(ack.position, p0);
        assert_eq!(client.calls(), vec![p0]);
        assert!(hook.positions.is_empty(), "tick loop must not run");
    }

    #[tokio::test(start_paused = true)]
    async fn walks_routed_path_to_target() {
        let (target, route) = diagonal_route();
        let client = MockClient::at(origin());
        let directions = MockDirections::answering(route);
        let events = EventDispatcher::new(8_192);
        let mut rx = events.subscribe();
        let mut w = walker(&client, &directions, &events, settings(true));
        let mut hook = RecordingHook::default();

        let ack = w.walk(target, Some(&mut hook), &CancelSignal::never()).await.unwrap();

        assert!(ack.position.distance_to(&target) < 40.0, "ended {} m away", ack.position.distance_to(&target));
        assert_eq!(directions.calls.load(Ordering::SeqCst), 1);
        assert!(hook.positions.len() > 50, "only {} ticks", hook.positions.len());

        let emitted = drain(&mut rx);
        assert!(matches!(emitted.first(), Some(WalkEvent::PathComputed(_))));
        let imprecise: Vec<Coordinate> = emitted
            .iter()
            .filter_map(|e| match e {
                WalkEvent::ImpreciseLocation { position } => Some(*position),
                _ => None,
            })
            .collect();
        assert!(imprecise.len() >= 3, "only {} reports", imprecise.len());

        // Every imprecise report was transmitted, then one final exact update.
        let calls = client.calls();
        assert_eq!(calls.len(), imprecise.len() + 1);
        assert_eq!(&calls[..imprecise.len()], &imprecise[..]);
        assert_eq!(*calls.last().unwrap(), ack.position);

        // Reports are throttled: far fewer than ticks.
        assert!(imprecise.len() * 8 <= hook.positions.len() + 8);
    }

    #[tokio::test(start_paused = true)]
    async fn fixed_report_interval() {
        // One waypoint, so one leg and no zero-length ticks between legs.
        let target = origin().project(150.0, 45.0);
        let client = MockClient::at(origin());
        let directions = MockDirections::answering(Directions::ok(vec![target]));
        let events = EventDispatcher::new(8_192);
        let mut rx = events.subscribe();
        let fixed = WalkSettings {
            report_interval_min_secs: 8.0,
            report_interval_max_secs: 8.0,
            ..settings(false)
        };
        let mut w = walker(&client, &directions, &events, fixed);
        let mut hook = RecordingHook::default();

        w.walk(target, Some(&mut hook), &CancelSignal::never()).await.unwrap();

        let reports = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, WalkEvent::ImpreciseLocation { .. }))
            .count();
        // Tick k runs at t0 + k s; reports fall on k = 8, 16, …
        assert_eq!(reports, (hook.positions.len() - 1) / 8);
    }

    #[tokio::test(start_paused = true)]
    async fn quota_exhaustion_delegates_to_fallback_once() {
        struct Seen {
            calls:   usize,
            target:  Option<Coordinate>,
            cancel:  Option<CancelSignal>,
        }
        struct RecordingFallback(Arc<Mutex<Seen>>);

        #[async_trait]
        impl WalkStrategy for RecordingFallback {
            async fn walk(
                &mut self,
                target: Coordinate,
                on_tick: Option<&mut dyn TickHook>,
                cancel: &CancelSignal,
            ) -> WalkResult<PositionAck> {
                {
                    let mut seen = self.0.lock().unwrap();
                    seen.calls += 1;
                    seen.target = Some(target);
                    seen.cancel = Some(cancel.clone());
                }
                if let Some(hook) = on_tick {
                    hook.on_tick(target).await;
                }
                Ok(PositionAck { position: target })
            }
        }

        let target = origin().project(500.0, 10.0);
        let client = MockClient::at(origin());
        let directions =
            MockDirections::answering(Directions::with_status(DirectionsStatus::OverQueryLimit));
        let events = EventDispatcher::new(64);
        let mut rx = events.subscribe();
        let seen = Arc::new(Mutex::new(Seen { calls: 0, target: None, cancel: None }));
        let mut w = walker(&client, &directions, &events, settings(true))
            .with_fallback(Box::new(RecordingFallback(seen.clone())));
        let (handle, signal): (CancelHandle, CancelSignal) = cancel_pair();
        let mut hook = RecordingHook::default();

        let ack = w.walk(target, Some(&mut hook), &signal).await.unwrap();

        assert_eq!(ack.position, target);
        assert_eq!(client.call_count(), 0, "engine must not tick");
        assert_eq!(hook.positions, vec![target], "the caller's hook reached the fallback");
        assert!(drain(&mut rx).is_empty(), "no path event on fallback");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.calls, 1);
        assert_eq!(seen.target, Some(target));
        handle.cancel();
        assert!(seen.cancel.as_ref().unwrap().is_cancelled(), "same cancellation signal");
    }

    #[tokio::test(start_paused = true)]
    async fn default_fallback_walks_straight() {
        let target = origin().project(120.0, 300.0);
        let client = MockClient::at(origin());
        let directions =
            MockDirections::answering(Directions::with_status(DirectionsStatus::OverQueryLimit));
        let events = EventDispatcher::new(8_192);
        let mut w = walker(&client, &directions, &events, settings(true));

        let ack = w.walk(target, None, &CancelSignal::never()).await.unwrap();
        assert!(ack.position.distance_to(&target) < 40.0);
        assert!(client.call_count() >= 2);

        // The fallback is built once and reused.
        client.calls.lock().unwrap().clear();
        let back = origin();
        let ack = w.walk(back, None, &CancelSignal::never()).await.unwrap();
        assert!(ack.position.distance_to(&back) < 40.0);
        assert_eq!(directions.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_mid_walk_stops_transmissions() {
        struct CancellingHook {
            ticks:           usize,
            cancel_at:       usize,
            handle:          CancelHandle,
            client:          Arc<MockClient>,
            calls_at_cancel: Option<usize>,
        }

        #[async_trait]
        impl TickHook for CancellingHook {
            async fn on_tick(&mut self, _position: Coordinate) {
                self.ticks += 1;
                if self.ticks == self.cancel_at {
                    self.calls_at_cancel = Some(self.client.call_count());
                    self.handle.cancel();
                }
            }
        }

        let (target, route) = diagonal_route();
        let client = MockClient::at(origin());
        let directions = MockDirections::answering(route);
        let events = EventDispatcher::new(8_192);
        let mut w = walker(&client, &directions, &events, settings(true));
        let (handle, signal) = cancel_pair();
        let mut hook = CancellingHook {
            ticks: 0,
            cancel_at: 30,
            handle,
            client: client.clone(),
            calls_at_cancel: None,
        };

        let result = w.walk(target, Some(&mut hook), &signal).await;
        assert!(matches!(result, Err(WalkError::Cancelled)));
        assert_eq!(hook.ticks, 30, "no tick after the signal");

        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        let at_cancel = hook.calls_at_cancel.unwrap();
        assert!(at_cancel >= 1, "some reports before cancelling");
        assert_eq!(client.call_count(), at_cancel, "nothing sent after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_during_pacing_sleep() {
        let (target, route) = diagonal_route();
        let client = MockClient::at(origin());
        let directions = MockDirections::answering(route);
        let events = EventDispatcher::new(8_192);
        let slow = WalkSettings { tick_pace_ms: 60_000, ..settings(false) };
        let mut w = walker(&client, &directions, &events, slow);
        let (handle, signal) = cancel_pair();

        let task = tokio::spawn(async move { w.walk(target, None, &signal).await });
        tokio::time::sleep(std::time::Duration::from_secs(5)).await;
        let before = client.call_count();
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(WalkError::Cancelled)));
        assert_eq!(client.call_count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_while_waiting_on_slow_update() {
        // Reports every 8 s, each answered 20 s later: the report due at
        // 16 s waits on the one sent at 8 s until 28 s.
        let (target, route) = diagonal_route();
        let client = MockClient::slow(origin(), Duration::from_secs(20));
        let directions = MockDirections::answering(route);
        let events = EventDispatcher::new(8_192);
        let fixed = WalkSettings {
            report_interval_min_secs: 8.0,
            report_interval_max_secs: 8.0,
            ..settings(false)
        };
        let mut w = walker(&client, &directions, &events, fixed);
        let (handle, signal) = cancel_pair();

        let start = tokio::time::Instant::now();
        let task = tokio::spawn(async move { w.walk(target, None, &signal).await });
        tokio::time::sleep(Duration::from_millis(17_500)).await;
        assert_eq!(client.call_count(), 1, "second report is still waiting on the first");
        handle.cancel();

        let result = task.await.unwrap();
        assert!(matches!(result, Err(WalkError::Cancelled)));
        let waited = start.elapsed();
        assert!(waited < Duration::from_secs(18), "returned after {waited:?}");

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(client.call_count(), 1, "nothing sent after cancel");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_route_is_an_error() {
        let target = origin().project(1_000.0, 0.0);
        let client = MockClient::at(origin());
        let directions = MockDirections::answering(Directions::ok(Vec::new()));
        let events = EventDispatcher::new(64);
        let mut rx = events.subscribe();
        let mut w = walker(&client, &directions, &events, settings(true));

        let err = w.walk(target, None, &CancelSignal::never()).await.unwrap_err();
        assert!(matches!(err, WalkError::Routing(RoutingError::EmptyPath)));
        assert_eq!(client.call_count(), 0);
        assert!(drain(&mut rx).is_empty(), "no path event for an empty route");
    }

    #[tokio::test(start_paused = true)]
    async fn network_failure_propagates_unchanged() {
        let (target, route) = diagonal_route();
        let failure = NetworkError::Transport("connection reset".into());
        let client = MockClient::failing(origin(), failure.clone());
        let directions = MockDirections::answering(route);
        let events = EventDispatcher::new(8_192);
        let mut w = walker(&client, &directions, &events, settings(true));

        let err = w.walk(target, None, &CancelSignal::never()).await.unwrap_err();
        match err {
            WalkError::Network(e) => assert_eq!(e, failure),
            other => panic!("expected network error, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn routing_failures_surface() {
        let client = MockClient::at(origin());
        let events = EventDispatcher::new(64);
        let target = origin().project(200.0, 0.0);

        let zero = MockDirections::answering(Directions::with_status(DirectionsStatus::ZeroResults));
        let err = walker(&client, &zero, &events, settings(true))
            .walk(target, None, &CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalkError::Routing(RoutingError::Status { status: DirectionsStatus::ZeroResults, .. })
        ));

        let broken = MockDirections::broken("dns");
        let err = walker(&client, &broken, &events, settings(true))
            .walk(target, None, &CancelSignal::never())
            .await
            .unwrap_err();
        assert!(matches!(err, WalkError::Routing(RoutingError::Transport(_))));
        assert_eq!(client.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn speed_state_persists_across_walks() {
        let p0 = origin();
        let client = MockClient::at(p0);
        let directions = MockDirections::answering(Directions::ok(vec![p0]));
        let events = EventDispatcher::new(64);
        let mut w = walker(&client, &directions, &events, settings(true));

        assert_eq!(w.speed().current_kmh(), 0.0);
        w.walk(p0, None, &CancelSignal::never()).await.unwrap();
        let scheduled = w.speed().next_change_at();
        assert!(scheduled.is_some());
        assert_eq!(w.speed().current_kmh(), 5.0);

        tokio::time::advance(std::time::Duration::from_secs(10)).await;
        w.walk(p0, None, &CancelSignal::never()).await.unwrap();
        assert_eq!(w.speed().next_change_at(), scheduled, "not reset by the second walk");
    }
}

// ── StraightLineWalker ────────────────────────────────────────────────────────

#[cfg(test)]
mod straight_line_walker {
    use super::*;
    use pacer_core::WalkRng;

    use crate::{EventDispatcher, SLOW_APPROACH_KMH, StraightLineWalker, kmh_to_mps};

    #[tokio::test(start_paused = true)]
    async fn slows_down_near_destination() {
        let target = origin().project(120.0, 90.0);
        let client = MockClient::at(origin());
        let fast = WalkSettings { walking_speed_kmh: 30.0, ..settings(false) };
        let mut w = StraightLineWalker::new(client.clone(), EventDispatcher::new(8_192), fast, WalkRng::new(8));
        let mut hook = RecordingHook::default();

        let ack = w.walk(target, Some(&mut hook), &CancelSignal::never()).await.unwrap();
        assert!(ack.position.distance_to(&target) < 3.0);

        let cap = kmh_to_mps(SLOW_APPROACH_KMH) + 1e-6;
        let mut saw_full_speed = false;
        for pair in hook.positions.windows(2) {
            let step = pair[0].distance_to(&pair[1]);
            if pair[0].distance_to(&target) < 40.0 {
                assert!(step <= cap, "step {step} near target");
            } else if step > 8.0 {
                saw_full_speed = true;
            }
        }
        assert!(saw_full_speed, "30 km/h is ~8.3 m per 1 s tick");
    }

    #[tokio::test(start_paused = true)]
    async fn heads_straight_for_target() {
        let target = origin().project(90.0, 180.0);
        let client = MockClient::at(origin());
        let mut w = StraightLineWalker::new(
            client.clone(),
            EventDispatcher::new(8_192),
            settings(false),
            WalkRng::new(4),
        );
        let mut hook = RecordingHook::default();
        w.walk(target, Some(&mut hook), &CancelSignal::never()).await.unwrap();

        let start = origin();
        for p in hook.positions.iter().filter(|p| p.distance_to(&start) > 1.0) {
            assert!((start.bearing_to(p) - 180.0).abs() < 0.5);
        }
        assert_eq!(w.speed().current_kmh(), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_report_interval_falls_back_to_cap() {
        let target = origin().project(200.0, 45.0);
        for (min, max) in [(f64::INFINITY, f64::INFINITY), (0.0, 1e300), (f64::NAN, f64::NAN)] {
            let client = MockClient::at(origin());
            let unchecked = WalkSettings {
                report_interval_min_secs: min,
                report_interval_max_secs: max,
                ..settings(false)
            };
            let mut w =
                StraightLineWalker::new(client.clone(), EventDispatcher::new(8_192), unchecked, WalkRng::new(6));

            let ack = w.walk(target, None, &CancelSignal::never()).await.unwrap();
            assert!(ack.position.distance_to(&target) < 40.0);
            // A 200 m walk is far shorter than the capped interval.
            assert_eq!(client.call_count(), 1, "only the final update for ({min}, {max})");
        }
    }
}
