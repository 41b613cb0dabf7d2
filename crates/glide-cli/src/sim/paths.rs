//! Flight path implementations.

use chrono::{DateTime, Duration, Utc};
use glide_core::{AircraftState, GeoPoint, GlidePolar};

/// Trait for flight path implementations.
pub trait FlightPath {
    /// Get (location, altitude_m) at time t seconds from start.
    fn get_position(&self, t: f64) -> (GeoPoint, f64);

    /// Get approximate track at time t (degrees, 0 = North).
    fn get_heading(&self, t: f64) -> f64 {
        // Default: estimate heading from position delta
        let (from, _) = self.get_position(t);
        let (to, _) = self.get_position(t + 1.0);
        if from.distance(&to) < 1e-3 {
            return 0.0;
        }
        from.bearing(&to)
    }

    /// Get ground speed in meters per second.
    fn get_speed_mps(&self) -> f64;

    /// Time the path starts at.
    fn start_time(&self) -> DateTime<Utc>;

    /// Aircraft sample at time t, on the ground once the path has landed.
    fn state_at(&self, t: f64) -> AircraftState;
}

/// Straight glide at constant speed and sink rate, ending at `floor_m`.
pub struct GlidePath {
    pub start: GeoPoint,
    pub bearing_deg: f64,
    pub start_altitude_m: f64,
    pub speed_mps: f64,
    pub sink_mps: f64,
    pub floor_m: f64,
    started_at: DateTime<Utc>,
}

impl GlidePath {
    /// Create a new glide path.
    ///
    /// # Arguments
    /// * `start` - Starting location
    /// * `bearing_deg` - Track flown (degrees true)
    /// * `start_altitude_m` - Altitude at t = 0
    /// * `speed_mps` - Ground speed
    /// * `sink_mps` - Sink rate, positive down
    /// * `floor_m` - Altitude at which the glider is considered landed
    pub fn new(
        start: GeoPoint,
        bearing_deg: f64,
        start_altitude_m: f64,
        speed_mps: f64,
        sink_mps: f64,
        floor_m: f64,
    ) -> Self {
        Self {
            start,
            bearing_deg,
            start_altitude_m,
            speed_mps,
            sink_mps,
            floor_m,
            started_at: Utc::now(),
        }
    }

    /// Glide at the polar's best L/D speed.
    pub fn from_polar(
        start: GeoPoint,
        bearing_deg: f64,
        start_altitude_m: f64,
        polar: &GlidePolar,
        floor_m: f64,
    ) -> Self {
        let speed = polar.v_best_ld();
        Self::new(
            start,
            bearing_deg,
            start_altitude_m,
            speed,
            polar.sink_rate(speed),
            floor_m,
        )
    }

    /// Sample time at t, held at the landing time once on the floor.
    fn timestamp_at(&self, t: f64) -> DateTime<Utc> {
        let elapsed = t.clamp(0.0, self.duration());
        if !elapsed.is_finite() {
            return self.started_at;
        }
        Duration::try_milliseconds((elapsed * 1000.0).round() as i64)
            .and_then(|offset| self.started_at.checked_add_signed(offset))
            .unwrap_or(self.started_at)
    }

    /// Seconds until the glide reaches the floor.
    pub fn duration(&self) -> f64 {
        if self.sink_mps > 0.0 {
            ((self.start_altitude_m - self.floor_m) / self.sink_mps).max(0.0)
        } else {
            f64::INFINITY
        }
    }
}

impl FlightPath for GlidePath {
    fn get_position(&self, t: f64) -> (GeoPoint, f64) {
        // Clamp to the landing point
        let t = t.clamp(0.0, self.duration());
        let location = self.start.offset(self.speed_mps * t, self.bearing_deg);
        let altitude = (self.start_altitude_m - self.sink_mps * t).max(self.floor_m);
        (location, altitude)
    }

    fn get_heading(&self, _t: f64) -> f64 {
        self.bearing_deg
    }

    fn get_speed_mps(&self) -> f64 {
        self.speed_mps
    }

    fn start_time(&self) -> DateTime<Utc> {
        self.started_at
    }

    fn state_at(&self, t: f64) -> AircraftState {
        let (location, altitude_m) = self.get_position(t);
        AircraftState {
            location,
            altitude_m,
            flying: t < self.duration(),
            wind: None,
            timestamp: self.timestamp_at(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> GlidePath {
        GlidePath::new(GeoPoint::new(46.0, 7.0), 90.0, 1_000.0, 25.0, 1.0, 400.0)
    }

    #[test]
    fn test_glide_path_start_position() {
        let (location, alt) = path().get_position(0.0);

        assert!((location.latitude - 46.0).abs() < 0.0001);
        assert!((location.longitude - 7.0).abs() < 0.0001);
        assert!((alt - 1_000.0).abs() < 0.01);
    }

    #[test]
    fn test_glide_path_descends_along_track() {
        let path = path();
        let (location, alt) = path.get_position(100.0);
        let dist = path.start.distance(&location);

        assert!((dist - 2_500.0).abs() < 1.0, "expected 2500m, got {dist}");
        assert!((alt - 900.0).abs() < 0.01);
        assert!((path.get_heading(100.0) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_glide_path_lands_at_floor() {
        let path = path();
        assert!((path.duration() - 600.0).abs() < 1e-9);

        let state = path.state_at(path.duration() + 100.0);
        assert!(!state.flying);
        assert!((state.altitude_m - 400.0).abs() < 0.01);

        let airborne = path.state_at(10.0);
        assert!(airborne.flying);
        assert_eq!(
            (airborne.timestamp - path.start_time()).num_milliseconds(),
            10_000
        );
    }

    #[test]
    fn test_glide_path_timestamp_stops_at_landing() {
        let path = path();
        let landed = path.start_time() + Duration::seconds(600);

        assert_eq!(path.state_at(1e300).timestamp, landed);
        assert_eq!(path.state_at(f64::INFINITY).timestamp, landed);
        assert_eq!(path.state_at(f64::NAN).timestamp, path.start_time());

        // level flight never lands
        let level = GlidePath::new(GeoPoint::new(46.0, 7.0), 90.0, 1_000.0, 25.0, 0.0, 400.0);
        assert_eq!(level.state_at(f64::INFINITY).timestamp, level.start_time());
        assert_eq!(
            (level.state_at(30.0).timestamp - level.start_time()).num_milliseconds(),
            30_000
        );
    }

    #[test]
    fn test_glide_path_from_polar_uses_best_glide() {
        let polar = GlidePolar::from_coefficients(0.0016, -0.06, 1.1);
        let path = GlidePath::from_polar(GeoPoint::new(46.0, 7.0), 0.0, 2_000.0, &polar, 0.0);
        let ld = path.speed_mps / path.sink_mps;

        assert!((ld - polar.best_ld()).abs() < 0.01, "expected {}, got {ld}", polar.best_ld());
    }
}
