#[macro_use]
extern crate log;

mod config;
mod playback;
mod telemetry;
mod trace;
mod transport;

use route::{LatLon, Timestamp, Waypoint};
use serde::{Deserialize, Serialize};

pub use self::config::PlaybackConfig;
pub use self::playback::{Advance, EngineState, Frame, PlaybackEngine};
pub use self::telemetry::{Telemetry, TelemetryReporter};
pub use self::trace::TraceSampler;
pub use self::transport::{FrameScheduler, RenderSurface, Session, ToggleLabel, TransportState};

/// The vehicle's interpolated state at one frame. Recomputed every frame, never stored beyond
/// being the "previous" sample for the next one.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionSample {
    pub pos: LatLon,
    pub time: Timestamp,
}

impl From<Waypoint> for PositionSample {
    fn from(wpt: Waypoint) -> Self {
        Self {
            pos: wpt.pos,
            time: wpt.time,
        }
    }
}
