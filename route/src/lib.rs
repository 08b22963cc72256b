#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

pub mod geo;
mod route;
mod routing;
mod static_data;
mod time;

use serde::{Deserialize, Serialize};

pub use self::geo::{Bounds, LatLon};
pub use self::route::{InvalidRouteError, Route};
pub use self::routing::load_directions;
pub use self::static_data::{load_csv, load_json, RawWaypoint};
pub use self::time::{Duration, Timestamp};

/// A single timestamped position sample along the planned route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub pos: LatLon,
    pub time: Timestamp,
}

impl Waypoint {
    pub fn new(lat: f64, lon: f64, time: Timestamp) -> Self {
        Self {
            pos: LatLon::new(lat, lon),
            time,
        }
    }
}
