use model::{
    Advance, FrameScheduler, PlaybackConfig, PlaybackEngine, RenderSurface, Session, Telemetry,
    ToggleLabel, TransportState,
};
use route::geo::distance;
use route::{Duration, LatLon, Route, Timestamp, Waypoint};

struct NullSurface;

impl RenderSurface for NullSurface {
    fn show_route(&mut self, _: &Route) {}
    fn move_vehicle(&mut self, _: LatLon, _: Option<f64>) {}
    fn reset_trace(&mut self, _: &[LatLon]) {}
    fn extend_trace(&mut self, _: LatLon) {}
    fn center_on(&mut self, _: LatLon) {}
    fn show_telemetry(&mut self, _: &Telemetry) {}
    fn set_toggle_label(&mut self, _: ToggleLabel) {}
}

/// Fires requested frames at a fixed refresh interval.
struct Display {
    pending: bool,
    now: f64,
    interval: f64,
}

impl FrameScheduler for Display {
    fn request_frame(&mut self) {
        self.pending = true;
    }
    fn cancel_frame(&mut self) {
        self.pending = false;
    }
}

impl Display {
    fn new(interval: f64) -> Self {
        Self {
            pending: false,
            now: 1000.0,
            interval,
        }
    }

    /// Runs frames until nothing more is requested or `until` is reached
    fn run(&mut self, session: &mut Session, until: f64) {
        while self.pending && self.now <= until {
            self.pending = false;
            let now = self.now;
            session.on_frame(now, &mut NullSurface, self);
            self.now += self.interval;
        }
    }
}

fn three_points() -> Route {
    let t0 = Timestamp::parse("2024-03-01T08:00:00Z").unwrap();
    Route::load(vec![
        Waypoint::new(10.0, 20.0, t0),
        Waypoint::new(10.1, 20.1, t0 + Duration::seconds(60.0)),
        Waypoint::new(10.2, 20.2, t0 + Duration::seconds(120.0)),
    ])
    .unwrap()
}

#[test]
fn ninety_seconds_in() {
    let mut engine = PlaybackEngine::new(three_points());
    engine.start();
    match engine.advance(Duration::seconds(90.0)) {
        Advance::Position(frame) => {
            assert_eq!(frame.segment_idx, 1);
            assert_eq!(frame.progress, 0.5);
            assert!((frame.sample.pos.lat - 10.15).abs() < 1e-9);
            assert!((frame.sample.pos.lon - 20.15).abs() < 1e-9);
        }
        x => panic!("expected a position, got {x:?}"),
    }
}

#[test]
fn session_at_ninety_seconds() {
    let mut session = Session::new(three_points(), &PlaybackConfig::default(), &mut NullSurface);
    let mut display = Display::new(1000.0);
    session.toggle(&mut NullSurface, &mut display);
    // The first frame at 1000 is the origin, so 90s in is at 91000
    display.run(&mut session, 91_000.0);

    assert_eq!(session.state(), TransportState::Running);
    let pos = session.current().pos;
    assert!((pos.lat - 10.15).abs() < 1e-9, "got {pos:?}");
    assert!((pos.lon - 20.15).abs() < 1e-9, "got {pos:?}");
}

#[test]
fn full_run_then_restart() {
    let route = three_points();
    let last = route.last().pos;
    let mut session = Session::new(route, &PlaybackConfig::default(), &mut NullSurface);
    // Roughly 60fps
    let mut display = Display::new(16.0);
    session.toggle(&mut NullSurface, &mut display);
    display.run(&mut session, f64::MAX);

    assert_eq!(session.state(), TransportState::Completed);
    assert_eq!(session.current().pos, last);
    // At ~4m per frame, nearly every frame is recorded, but never more than one point per frame
    assert!(session.trace().len() > 3);
    assert!(session.trace().len() <= session.frames());
    for pair in session.trace().windows(2) {
        assert!(distance(pair[0], pair[1]) > PlaybackConfig::default().trace_threshold_km);
    }
    assert!(session.frames() > 7000);

    session.toggle(&mut NullSurface, &mut display);
    assert_eq!(session.current().pos, LatLon::new(10.0, 20.0));
    assert_eq!(session.trace(), &[LatLon::new(10.0, 20.0)]);

    // Samples never go back in time within a run
    let mut prev = None;
    for _ in 0..100 {
        display.run(&mut session, display.now);
        let time = session.current().time;
        if let Some(prev) = prev {
            assert!(time >= prev);
        }
        prev = Some(time);
    }
}
