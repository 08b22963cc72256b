use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::distance;
use crate::{Bounds, Duration, LatLon, Timestamp, Waypoint};

#[derive(Debug, Error, PartialEq)]
#[error("a route needs at least 2 waypoints, but {count} were given")]
pub struct InvalidRouteError {
    pub count: usize,
}

/// An ordered sequence of at least 2 waypoints. Immutable once loaded.
///
/// Timestamps are trusted to be non-decreasing; nothing is re-sorted. Two adjacent waypoints
/// sharing a timestamp form a zero-duration segment, which playback tolerates.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct Route {
    waypoints: Vec<Waypoint>,
}

impl Route {
    pub fn load(waypoints: Vec<Waypoint>) -> Result<Self, InvalidRouteError> {
        if waypoints.len() < 2 {
            return Err(InvalidRouteError {
                count: waypoints.len(),
            });
        }
        for pair in waypoints.windows(2) {
            if pair[1].time < pair[0].time {
                warn!(
                    "Route timestamps go backwards: {} then {}",
                    pair[0].time, pair[1].time
                );
            }
        }
        Ok(Self { waypoints })
    }

    /// A straight two-point route, for when the real data can't be acquired.
    pub fn synthetic(from: LatLon, to: LatLon, start: Timestamp, total: Duration) -> Self {
        Self {
            waypoints: vec![
                Waypoint {
                    pos: from,
                    time: start,
                },
                Waypoint {
                    pos: to,
                    time: start + total,
                },
            ],
        }
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        // load() guarantees at least 2
        &self.waypoints[self.waypoints.len() - 1]
    }

    pub fn start_time(&self) -> Timestamp {
        self.first().time
    }

    pub fn end_time(&self) -> Timestamp {
        self.last().time
    }

    pub fn total_duration(&self) -> Duration {
        self.end_time() - self.start_time()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn as_polyline(&self) -> Vec<LatLon> {
        self.waypoints.iter().map(|w| w.pos).collect()
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from(&self.as_polyline())
    }

    /// Total length along the waypoints, in kilometers
    pub fn length(&self) -> f64 {
        self.waypoints
            .windows(2)
            .map(|pair| distance(pair[0].pos, pair[1].pos))
            .sum()
    }
}

impl TryFrom<Vec<Waypoint>> for Route {
    type Error = InvalidRouteError;

    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, InvalidRouteError> {
        Route::load(waypoints)
    }
}

impl From<Route> for Vec<Waypoint> {
    fn from(route: Route) -> Self {
        route.waypoints
    }
}
