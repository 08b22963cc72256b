use route::geo::distance;
use route::LatLon;

/// The path actually traveled, as a sparse polyline. A new point is only recorded once the vehicle
/// has moved far enough from the last one, so the polyline grows with distance covered, not with
/// the number of frames.
pub struct TraceSampler {
    /// In kilometers
    threshold: f64,
    points: Vec<LatLon>,
}

impl TraceSampler {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            points: Vec::new(),
        }
    }

    /// Returns true if the point was recorded.
    pub fn consider(&mut self, pt: LatLon) -> bool {
        let admit = match self.points.last() {
            Some(last) => distance(*last, pt) > self.threshold,
            None => true,
        };
        if admit {
            self.points.push(pt);
        }
        admit
    }

    /// Start over with just one point
    pub fn reset(&mut self, pt: LatLon) {
        self.points.clear();
        self.points.push(pt);
    }

    pub fn points(&self) -> &[LatLon] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 0.5m
    const THRESHOLD: f64 = 0.0005;

    #[test]
    fn first_point_always_kept() {
        let mut trace = TraceSampler::new(THRESHOLD);
        assert!(trace.is_empty());
        assert!(trace.consider(LatLon::new(10.0, 20.0)));
        assert_eq!(trace.points(), &[LatLon::new(10.0, 20.0)]);
    }

    #[test]
    fn tiny_moves_are_skipped() {
        let mut trace = TraceSampler::new(THRESHOLD);
        trace.consider(LatLon::new(0.0, 0.0));
        // About 0.11m each
        for i in 1..=4 {
            assert!(!trace.consider(LatLon::new(i as f64 * 1e-6, 0.0)));
        }
        assert_eq!(trace.len(), 1);
        // About 1.1m from the first point
        assert!(trace.consider(LatLon::new(1e-5, 0.0)));
        assert_eq!(trace.len(), 2);
    }

    #[test]
    fn consecutive_points_respect_threshold() {
        let mut trace = TraceSampler::new(THRESHOLD);
        for i in 0..10_000 {
            trace.consider(LatLon::new(i as f64 * 7e-7, i as f64 * 3e-7));
        }
        assert!(trace.len() > 1);
        assert!(trace.len() < 10_000);
        for pair in trace.points().windows(2) {
            assert!(distance(pair[0], pair[1]) > THRESHOLD);
        }
    }

    #[test]
    fn reset_leaves_one_point() {
        let mut trace = TraceSampler::new(THRESHOLD);
        trace.consider(LatLon::new(0.0, 0.0));
        trace.consider(LatLon::new(1.0, 1.0));
        trace.reset(LatLon::new(5.0, 5.0));
        assert_eq!(trace.points(), &[LatLon::new(5.0, 5.0)]);
    }
}
