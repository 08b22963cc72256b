use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{Route, Timestamp, Waypoint};

/// One record as it appears in a static route file, before the timestamp is parsed.
#[derive(Clone, Debug, Deserialize)]
pub struct RawWaypoint {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: String,
}

impl Route {
    /// Parses every timestamp once, up-front. Playback never looks at the strings again.
    pub fn from_static_data(records: Vec<RawWaypoint>) -> Result<Self> {
        let mut waypoints = Vec::new();
        for (idx, rec) in records.into_iter().enumerate() {
            let time = Timestamp::parse(&rec.timestamp)
                .with_context(|| format!("waypoint {idx}"))?;
            waypoints.push(Waypoint::new(rec.latitude, rec.longitude, time));
        }
        let route = Route::load(waypoints)?;
        info!(
            "Loaded route with {} waypoints spanning {}",
            route.len(),
            route.total_duration()
        );
        Ok(route)
    }
}

/// Reads a JSON array of `{latitude, longitude, timestamp}` records.
pub fn load_json<R: std::io::Read>(reader: R) -> Result<Route> {
    let records: Vec<RawWaypoint> = serde_json::from_reader(reader)?;
    Route::from_static_data(records)
}

/// Reads a CSV file with `latitude,longitude,timestamp` columns.
pub fn load_csv<R: std::io::Read>(reader: R) -> Result<Route> {
    let mut records = Vec::new();
    for rec in csv::Reader::from_reader(reader).deserialize() {
        let rec: RawWaypoint = rec?;
        records.push(rec);
    }
    Route::from_static_data(records)
}
