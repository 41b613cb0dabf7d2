//! Core data models shared by the waypoint store, the solver and the tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{GeoPoint, GeoVector};

pub type WaypointId = u32;

/// What a waypoint can be used for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaypointKind {
    /// Navigation point only
    #[default]
    Turnpoint,
    /// Airfield with a prepared runway
    Airfield,
    /// Field suitable for an outlanding
    Outlanding,
}

/// A named point from the waypoint database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: WaypointId,
    pub name: String,
    pub location: GeoPoint,
    /// Terrain or airfield elevation in meters MSL
    pub elevation_m: f64,
    #[serde(default)]
    pub kind: WaypointKind,
}

impl Waypoint {
    pub fn new(
        id: WaypointId,
        name: impl Into<String>,
        location: GeoPoint,
        elevation_m: f64,
        kind: WaypointKind,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            elevation_m,
            kind,
        }
    }

    pub fn is_airport(&self) -> bool {
        self.kind == WaypointKind::Airfield
    }

    pub fn is_landable(&self) -> bool {
        matches!(self.kind, WaypointKind::Airfield | WaypointKind::Outlanding)
    }
}

/// Wind estimate, direction the wind blows from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wind {
    pub speed_mps: f64,
    pub direction_deg: f64,
}

impl Wind {
    /// Component of the wind against a track, positive for a headwind.
    pub fn headwind_component(&self, track_deg: f64) -> f64 {
        self.speed_mps * (self.direction_deg - track_deg).to_radians().cos()
    }
}

/// Snapshot of the aircraft used for one update cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AircraftState {
    pub location: GeoPoint,
    /// Altitude in meters MSL
    pub altitude_m: f64,
    pub flying: bool,
    #[serde(default)]
    pub wind: Option<Wind>,
    pub timestamp: DateTime<Utc>,
}

impl AircraftState {
    /// Create a flying state with no wind, stamped now.
    pub fn new(location: GeoPoint, altitude_m: f64) -> Self {
        Self {
            location,
            altitude_m,
            flying: true,
            wind: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_wind(mut self, wind: Wind) -> Self {
        self.wind = Some(wind);
        self
    }

    pub fn on_ground(mut self) -> Self {
        self.flying = false;
        self
    }
}

/// Outcome of a glide computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlideResultStatus {
    /// Nothing computed yet
    #[default]
    NotSet,
    /// Solution found
    Ok,
    /// Wind is too strong to make progress along the track
    WindExcessive,
    /// Climb required but the MacCready setting is zero
    MacCready,
    /// Inputs did not allow a solution
    NoSolution,
}

/// Feasibility of reaching a point from the current state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GlideResult {
    pub status: GlideResultStatus,
    /// Vector from the aircraft to the destination
    pub vector: GeoVector,
    /// Height lost in the glide (m)
    pub height_glide: f64,
    /// Height that must be gained by climbing (m)
    pub height_climb: f64,
    /// Height above the minimum arrival altitude on arrival (m), negative if short
    pub altitude_difference: f64,
    /// Time to reach the destination (s)
    pub time_elapsed: f64,
    /// Time to recover the height spent from the current reserve (s)
    pub time_virtual: f64,
    /// Destination elevation plus arrival safety margin (m MSL)
    pub min_arrival_altitude: f64,
    /// Speed to fly (m/s)
    pub v_opt: f64,
}

impl GlideResult {
    pub fn with_status(status: GlideResultStatus) -> Self {
        Self {
            status,
            vector: GeoVector::invalid(),
            ..Self::default()
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == GlideResultStatus::Ok
    }

    pub fn is_achievable(&self) -> bool {
        self.is_ok()
    }

    /// Reachable without climbing.
    pub fn is_final_glide(&self) -> bool {
        self.is_ok() && self.altitude_difference >= 0.0 && self.height_climb <= 0.0
    }

    pub fn arrival_altitude(&self) -> f64 {
        self.min_arrival_altitude + self.altitude_difference
    }

    /// Ranking key of the climb-allowed scan.
    pub fn total_time(&self) -> f64 {
        self.time_elapsed + self.time_virtual
    }
}
