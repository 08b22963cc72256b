use route::{Duration, Route, Waypoint};

use crate::PositionSample;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No run active
    Idle,
    Running,
    /// Reached the end of the route; the last position is held
    Finished,
}

/// One interpolated position, plus the segment it came from. Heading should be derived from the
/// segment, not from consecutive samples, which can be arbitrarily close together.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Frame {
    pub sample: PositionSample,
    pub segment: (Waypoint, Waypoint),
    /// Index of the first waypoint of the segment
    pub segment_idx: usize,
    /// How far along the segment, in [0, 1]
    pub progress: f64,
}

impl Frame {
    pub fn heading(&self) -> f64 {
        route::geo::bearing(self.segment.0.pos, self.segment.1.pos)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Advance {
    Position(Frame),
    /// The end of the route was reached. The sample is pinned to the last waypoint.
    Complete(PositionSample),
    /// No segment covers the requested time. The caller should hold the prior position.
    NoUpdate,
}

/// Maps simulated elapsed time onto a position along the route.
pub struct PlaybackEngine {
    route: Route,
    state: EngineState,
}

impl PlaybackEngine {
    pub fn new(route: Route) -> Self {
        Self {
            route,
            state: EngineState::Idle,
        }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn start(&mut self) {
        self.state = EngineState::Running;
    }

    pub fn stop(&mut self) {
        if self.state == EngineState::Running {
            self.state = EngineState::Idle;
        }
    }

    /// `elapsed` is measured along the route's own time axis, from its first waypoint.
    pub fn advance(&mut self, elapsed: Duration) -> Advance {
        let target = self.route.start_time() + elapsed;

        if target >= self.route.end_time() {
            self.state = EngineState::Finished;
            return Advance::Complete((*self.route.last()).into());
        }

        // TODO Binary search, or resume from the last segment; routes are small so far
        for (idx, pair) in self.route.waypoints().windows(2).enumerate() {
            let (p1, p2) = (pair[0], pair[1]);
            if target >= p1.time && target <= p2.time {
                let progress = if p2.time == p1.time {
                    0.0
                } else {
                    ((target - p1.time) / (p2.time - p1.time)).clamp(0.0, 1.0)
                };
                return Advance::Position(Frame {
                    sample: PositionSample {
                        pos: p1.pos.lerp(p2.pos, progress),
                        time: p1.time + (p2.time - p1.time) * progress,
                    },
                    segment: (p1, p2),
                    segment_idx: idx,
                    progress,
                });
            }
        }

        // Only happens for elapsed < 0 or timestamps going backwards
        debug!("No segment covers {target}, holding position");
        Advance::NoUpdate
    }
}
