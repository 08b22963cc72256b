use anyhow::Result;
use serde::Deserialize;

use crate::{Duration, LatLon, Route, Timestamp, Waypoint};

impl Route {
    /// Routing services return only geometry, so times are made up by spreading `total` evenly
    /// over the coordinates. The first waypoint is at `start`, the last at `start + total`.
    pub fn from_routing_service(
        geometry: &geojson::Geometry,
        start: Timestamp,
        total: Duration,
    ) -> Result<Self> {
        let coords = match geometry.value {
            geojson::Value::LineString(ref coords) => coords,
            _ => bail!("Routing geometry should be a LineString"),
        };
        if total < Duration::ZERO {
            bail!("Total route duration can't be negative: {total:?}");
        }

        let mut pts = Vec::new();
        for coord in coords {
            // GeoJSON is (longitude, latitude)
            if coord.len() < 2 {
                bail!("Routing geometry has a coordinate with {} values", coord.len());
            }
            pts.push(LatLon::new(coord[1], coord[0]));
        }

        let steps = pts.len().saturating_sub(1).max(1) as f64;
        let waypoints = pts
            .into_iter()
            .enumerate()
            .map(|(idx, pos)| Waypoint {
                pos,
                time: start + total * (idx as f64 / steps),
            })
            .collect();
        let route = Route::load(waypoints)?;
        info!(
            "Routing service geometry became {} waypoints over {}",
            route.len(),
            total
        );
        Ok(route)
    }
}

#[derive(Deserialize)]
struct DirectionsResponse {
    routes: Vec<DirectionsRoute>,
}

#[derive(Deserialize)]
struct DirectionsRoute {
    geometry: geojson::Geometry,
    /// In seconds
    duration: Option<f64>,
}

/// Reads a directions response (`{"routes": [{"geometry": ..., "duration": ...}]}`, with GeoJSON
/// geometry) and uses the first route. If `total` isn't specified, the service's own duration
/// estimate is used.
pub fn load_directions<R: std::io::Read>(
    reader: R,
    start: Timestamp,
    total: Option<Duration>,
) -> Result<Route> {
    let resp: DirectionsResponse = serde_json::from_reader(reader)?;
    let first = match resp.routes.into_iter().next() {
        Some(x) => x,
        None => bail!("Directions response has no routes"),
    };
    let total = match (total, first.duration) {
        (Some(total), _) => total,
        (None, Some(secs)) => Duration::seconds(secs),
        (None, None) => bail!("No route duration configured, and the service didn't give one"),
    };
    Route::from_routing_service(&first.geometry, start, total)
}
