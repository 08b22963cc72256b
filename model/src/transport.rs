use route::{Duration, LatLon, Route};

use crate::{
    Advance, PlaybackConfig, PlaybackEngine, PositionSample, Telemetry, TelemetryReporter,
    TraceSampler,
};

/// Supplied by the host. Requests exactly one future call to `Session::on_frame`.
pub trait FrameScheduler {
    fn request_frame(&mut self);
    /// Deregisters any requested frame. A callback that's already been dispatched may still run.
    fn cancel_frame(&mut self);
}

/// Whatever draws the map, vehicle, trace, and control panel.
pub trait RenderSurface {
    /// The planned route as a static overlay, once per session. The viewport should fit the
    /// route's bounds.
    fn show_route(&mut self, route: &Route);
    /// `heading` is a compass bearing in degrees. It replaces any previous rotation; None keeps
    /// the current one.
    fn move_vehicle(&mut self, pos: LatLon, heading: Option<f64>);
    /// Replaces the whole displayed trace
    fn reset_trace(&mut self, pts: &[LatLon]);
    fn extend_trace(&mut self, pt: LatLon);
    fn center_on(&mut self, pos: LatLon);
    fn show_telemetry(&mut self, telemetry: &Telemetry);
    fn set_toggle_label(&mut self, label: ToggleLabel);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Running,
    /// Stays here until the next toggle restarts
    Completed,
}

/// What pressing the single control will do next
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleLabel {
    Play,
    Pause,
    Restart,
}

impl std::fmt::Display for ToggleLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ToggleLabel::Play => write!(f, "Play"),
            ToggleLabel::Pause => write!(f, "Pause"),
            ToggleLabel::Restart => write!(f, "Restart"),
        }
    }
}

/// Converts host frame times (milliseconds, monotonic) into simulated time along the route.
struct SimulationClock {
    /// The first frame time seen since the last (re)start or resume
    origin: Option<f64>,
    /// Simulated time already covered before the last pause
    carried: Duration,
}

impl SimulationClock {
    fn new() -> Self {
        Self {
            origin: None,
            carried: Duration::ZERO,
        }
    }

    fn elapsed(&mut self, frame_time: f64) -> Duration {
        let origin = *self.origin.get_or_insert(frame_time);
        self.carried + Duration::milliseconds(frame_time - origin)
    }

    /// Forget the origin, but keep the time already covered
    fn pause(&mut self, covered: Duration) {
        self.origin = None;
        self.carried = covered;
    }

    fn reset(&mut self) {
        self.origin = None;
        self.carried = Duration::ZERO;
    }
}

/// One playback session: owns the route and all mutable state, and exposes the play / pause /
/// restart toggle.
pub struct Session {
    engine: PlaybackEngine,
    trace: TraceSampler,
    telemetry: TelemetryReporter,
    clock: SimulationClock,
    state: TransportState,
    current: PositionSample,
    // Only None right after a reset
    previous: Option<PositionSample>,
    frames: usize,
}

impl Session {
    pub fn new(route: Route, config: &PlaybackConfig, surface: &mut dyn RenderSurface) -> Self {
        let current: PositionSample = (*route.first()).into();
        let mut session = Self {
            telemetry: TelemetryReporter::new(route.start_time()),
            engine: PlaybackEngine::new(route),
            trace: TraceSampler::new(config.trace_threshold_km),
            clock: SimulationClock::new(),
            state: TransportState::Stopped,
            current,
            previous: None,
            frames: 0,
        };
        surface.show_route(session.engine.route());
        session.reset_to_start(surface);
        surface.set_toggle_label(ToggleLabel::Play);
        session
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn current(&self) -> &PositionSample {
        &self.current
    }

    pub fn trace(&self) -> &[LatLon] {
        self.trace.points()
    }

    pub fn route(&self) -> &Route {
        self.engine.route()
    }

    /// Frames rendered since the session was created
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn toggle(&mut self, surface: &mut dyn RenderSurface, scheduler: &mut dyn FrameScheduler) {
        if self.state == TransportState::Running {
            scheduler.cancel_frame();
            self.engine.stop();
            self.clock
                .pause(self.current.time - self.engine.route().start_time());
            self.state = TransportState::Stopped;
            surface.set_toggle_label(ToggleLabel::Play);
            info!("Paused at {}", self.current.time);
            return;
        }

        if self.state == TransportState::Completed
            || self.current.pos == self.engine.route().last().pos
        {
            info!("Restarting from the beginning of the route");
            self.reset_to_start(surface);
            self.clock.reset();
        }

        // The origin gets captured on the next frame
        self.clock.origin = None;
        self.engine.start();
        self.state = TransportState::Running;
        scheduler.request_frame();
        surface.set_toggle_label(ToggleLabel::Pause);
    }

    /// Called by the host once per display refresh, after `request_frame`.
    pub fn on_frame(
        &mut self,
        frame_time: f64,
        surface: &mut dyn RenderSurface,
        scheduler: &mut dyn FrameScheduler,
    ) {
        // A frame dispatched before a pause must not keep the run alive
        if self.state != TransportState::Running {
            debug!("Ignoring a frame at {frame_time} while {:?}", self.state);
            return;
        }

        let elapsed = self.clock.elapsed(frame_time);
        match self.engine.advance(elapsed) {
            Advance::Position(frame) => {
                self.render(frame.sample, Some(frame.heading()), surface);
                scheduler.request_frame();
            }
            Advance::Complete(sample) => {
                self.render(sample, None, surface);
                self.clock.reset();
                self.state = TransportState::Completed;
                surface.set_toggle_label(ToggleLabel::Restart);
                info!(
                    "Reached the end of the route after {} frames, trace has {} points",
                    self.frames,
                    self.trace.len()
                );
            }
            Advance::NoUpdate => {
                scheduler.request_frame();
            }
        }
    }

    fn render(
        &mut self,
        sample: PositionSample,
        heading: Option<f64>,
        surface: &mut dyn RenderSurface,
    ) {
        surface.move_vehicle(sample.pos, heading);
        if self.trace.consider(sample.pos) {
            surface.extend_trace(sample.pos);
        }
        let telemetry = self.telemetry.report(&sample, self.previous.as_ref());
        surface.show_telemetry(&telemetry);
        surface.center_on(sample.pos);

        self.previous = Some(sample);
        self.current = sample;
        self.frames += 1;
    }

    fn reset_to_start(&mut self, surface: &mut dyn RenderSurface) {
        self.current = (*self.engine.route().first()).into();
        self.previous = None;
        self.trace.reset(self.current.pos);

        surface.move_vehicle(self.current.pos, None);
        surface.reset_trace(self.trace.points());
        surface.show_telemetry(&self.telemetry.report(&self.current, None));
    }
}
