use anyhow::Result;
use model::{RenderSurface, Telemetry, ToggleLabel};
use route::{LatLon, Route};

/// Renders a session to the log. Per-frame detail is at debug level; every `report_every` frames
/// the control panel is logged at info.
pub struct LogSurface {
    report_every: usize,
    telemetry_updates: usize,

    pub vehicle: Option<LatLon>,
    /// Compass bearing the vehicle glyph is rotated to. The glyph points north at 0.
    pub rotation: f64,
    pub trace: Vec<LatLon>,
    pub center: Option<LatLon>,
    pub label: Option<ToggleLabel>,
    pub last_telemetry: Option<Telemetry>,
}

impl LogSurface {
    pub fn new(report_every: usize) -> Self {
        Self {
            report_every: report_every.max(1),
            telemetry_updates: 0,

            vehicle: None,
            rotation: 0.0,
            trace: Vec::new(),
            center: None,
            label: None,
            last_telemetry: None,
        }
    }

    fn log_panel(&self, telemetry: &Telemetry) {
        info!(
            "At {} ({}), {} km/h, elapsed {}, heading {:.1}",
            telemetry.coordinates,
            telemetry.timestamp,
            telemetry.speed_label(),
            telemetry.elapsed_label(),
            self.rotation
        );
    }

    /// The traveled trace as a GeoJSON LineString feature
    pub fn trace_geojson(&self) -> geojson::Feature {
        let coords = self.trace.iter().map(|pt| vec![pt.lon, pt.lat]).collect();
        let mut properties = geojson::JsonObject::new();
        properties.insert("points".to_string(), self.trace.len().into());
        if let Some(ref telemetry) = self.last_telemetry {
            properties.insert(
                "elapsed".to_string(),
                telemetry.elapsed_label().into(),
            );
        }
        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::LineString(coords))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }

    pub fn export_trace(&self, path: &str) -> Result<()> {
        fs_err::write(path, serde_json::to_string_pretty(&self.trace_geojson())?)?;
        info!("Wrote {} trace points to {path}", self.trace.len());
        Ok(())
    }
}

impl RenderSurface for LogSurface {
    fn show_route(&mut self, route: &Route) {
        let bounds = route.bounds();
        info!(
            "Route has {} waypoints, {:.3} km over {}, from {} to {}",
            route.len(),
            route.length(),
            route.total_duration(),
            route.start_time(),
            route.end_time()
        );
        info!(
            "Fitting view to ({:.6}, {:.6}) - ({:.6}, {:.6})",
            bounds.min_lat, bounds.min_lon, bounds.max_lat, bounds.max_lon
        );
        self.center = Some(bounds.center());
    }

    fn move_vehicle(&mut self, pos: LatLon, heading: Option<f64>) {
        self.vehicle = Some(pos);
        if let Some(heading) = heading {
            // Replace, don't accumulate
            self.rotation = heading;
        }
    }

    fn reset_trace(&mut self, pts: &[LatLon]) {
        self.trace = pts.to_vec();
    }

    fn extend_trace(&mut self, pt: LatLon) {
        self.trace.push(pt);
    }

    fn center_on(&mut self, pos: LatLon) {
        self.center = Some(pos);
    }

    fn show_telemetry(&mut self, telemetry: &Telemetry) {
        debug!(
            "{} | {} | {} km/h | {}",
            telemetry.coordinates,
            telemetry.timestamp,
            telemetry.speed_label(),
            telemetry.elapsed_label()
        );
        if self.telemetry_updates % self.report_every == 0 {
            self.log_panel(telemetry);
        }
        self.telemetry_updates += 1;
        self.last_telemetry = Some(telemetry.clone());
    }

    fn set_toggle_label(&mut self, label: ToggleLabel) {
        if label == ToggleLabel::Restart {
            if let Some(ref telemetry) = self.last_telemetry {
                self.log_panel(telemetry);
            }
        }
        info!("Control now reads {label}");
        self.label = Some(label);
    }
}

#[cfg(test)]
mod tests {
    use route::{Duration, Timestamp};

    use super::*;

    #[test]
    fn rotation_replaces() {
        let mut surface = LogSurface::new(10);
        surface.move_vehicle(LatLon::new(0.0, 0.0), Some(90.0));
        surface.move_vehicle(LatLon::new(0.0, 1.0), Some(45.0));
        assert_eq!(surface.rotation, 45.0);
        surface.move_vehicle(LatLon::new(0.0, 2.0), None);
        assert_eq!(surface.rotation, 45.0);
        assert_eq!(surface.vehicle, Some(LatLon::new(0.0, 2.0)));
    }

    #[test]
    fn show_route_centers_on_bounds() {
        let t0 = Timestamp::from_millis(0.0);
        let route = Route::synthetic(
            LatLon::new(0.0, 0.0),
            LatLon::new(2.0, 4.0),
            t0,
            Duration::minutes(1.0),
        );
        let mut surface = LogSurface::new(10);
        surface.show_route(&route);
        assert_eq!(surface.center, Some(LatLon::new(1.0, 2.0)));
    }

    #[test]
    fn geojson_trace() {
        let mut surface = LogSurface::new(10);
        surface.reset_trace(&[LatLon::new(10.0, 20.0)]);
        surface.extend_trace(LatLon::new(10.5, 20.5));
        let feature = surface.trace_geojson();
        match feature.geometry.unwrap().value {
            geojson::Value::LineString(coords) => {
                assert_eq!(coords, vec![vec![20.0, 10.0], vec![20.5, 10.5]]);
            }
            x => panic!("expected a LineString, got {x:?}"),
        }
        assert_eq!(feature.properties.unwrap()["points"], 2);
    }
}
