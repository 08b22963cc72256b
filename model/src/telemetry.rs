use route::geo::distance;
use route::{Duration, Timestamp};
use serde::Serialize;

use crate::PositionSample;

/// What the control panel shows for one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Telemetry {
    /// `lat, lon` with 6 decimals
    pub coordinates: String,
    /// Time of day of the sample
    pub timestamp: String,
    pub speed_kmh: f64,
    /// Since the start of the route
    pub elapsed: Duration,
}

impl Telemetry {
    pub fn speed_label(&self) -> String {
        format!("{:.2}", self.speed_kmh)
    }

    pub fn elapsed_label(&self) -> String {
        self.elapsed.to_string()
    }
}

pub struct TelemetryReporter {
    start_time: Timestamp,
}

impl TelemetryReporter {
    pub fn new(start_time: Timestamp) -> Self {
        Self { start_time }
    }

    /// `previous` is None on the first frame of a run, which reports zero speed and elapsed time.
    pub fn report(&self, current: &PositionSample, previous: Option<&PositionSample>) -> Telemetry {
        let (speed_kmh, elapsed) = match previous {
            Some(previous) => {
                let dt = current.time - previous.time;
                // Guards against repeated or out-of-order frames
                let speed = if dt > Duration::ZERO {
                    distance(previous.pos, current.pos) / dt.inner_hours()
                } else {
                    0.0
                };
                (speed, current.time - self.start_time)
            }
            None => (0.0, Duration::ZERO),
        };

        Telemetry {
            coordinates: current.pos.to_string(),
            timestamp: current.time.clock_label(),
            speed_kmh,
            elapsed,
        }
    }
}
