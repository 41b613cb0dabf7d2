//! Waypoint store with range queries.
//!
//! Waypoints are held as `Arc<Waypoint>` so task points and candidate lists
//! can share them without copying. All queries take `&self`; the store can
//! be shared between threads once built.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::geo::{meters_to_lat, meters_to_lon, GeoPoint};
use crate::models::{Waypoint, WaypointId};

/// Error type for waypoint store operations.
#[derive(Debug, thiserror::Error)]
pub enum WaypointError {
    #[error("Duplicate waypoint id {0}")]
    DuplicateId(WaypointId),
    #[error("Waypoint {0} has an invalid location")]
    InvalidLocation(WaypointId),
    #[error("Home waypoint {0} not found")]
    UnknownHome(WaypointId),
    #[error("Failed to parse waypoint file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// On-disk layout of a waypoint file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypointFile {
    #[serde(default)]
    pub home: Option<WaypointId>,
    pub waypoints: Vec<Waypoint>,
}

#[derive(Debug, Default)]
pub struct Waypoints {
    waypoints: Vec<Arc<Waypoint>>,
    index: HashMap<WaypointId, usize>,
    home: Option<WaypointId>,
}

impl Waypoints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list, rejecting duplicates and bad locations.
    pub fn from_waypoints(
        waypoints: impl IntoIterator<Item = Waypoint>,
    ) -> Result<Self, WaypointError> {
        let mut store = Self::new();
        for waypoint in waypoints {
            store.append(waypoint)?;
        }
        Ok(store)
    }

    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self, WaypointError> {
        let file: WaypointFile = serde_json::from_reader(reader)?;
        let mut store = Self::from_waypoints(file.waypoints)?;
        if let Some(home) = file.home {
            if !store.set_home(home) {
                return Err(WaypointError::UnknownHome(home));
            }
        }
        tracing::info!(count = store.len(), "Loaded waypoints");
        Ok(store)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, WaypointError> {
        let file = File::open(path.as_ref())?;
        Self::from_json_reader(BufReader::new(file))
    }

    /// Add a waypoint and return the shared handle to it.
    pub fn append(&mut self, waypoint: Waypoint) -> Result<Arc<Waypoint>, WaypointError> {
        if self.index.contains_key(&waypoint.id) {
            return Err(WaypointError::DuplicateId(waypoint.id));
        }
        if !waypoint.location.is_valid() {
            return Err(WaypointError::InvalidLocation(waypoint.id));
        }
        let waypoint = Arc::new(waypoint);
        self.index.insert(waypoint.id, self.waypoints.len());
        self.waypoints.push(Arc::clone(&waypoint));
        Ok(waypoint)
    }

    pub fn get(&self, id: WaypointId) -> Option<&Arc<Waypoint>> {
        self.index.get(&id).map(|&i| &self.waypoints[i])
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Waypoint>> {
        self.waypoints.iter()
    }

    /// Mark a stored waypoint as home. Returns false if `id` is unknown.
    pub fn set_home(&mut self, id: WaypointId) -> bool {
        if self.index.contains_key(&id) {
            self.home = Some(id);
            true
        } else {
            false
        }
    }

    pub fn home(&self) -> Option<&Arc<Waypoint>> {
        self.home.and_then(|id| self.get(id))
    }

    /// Call `visitor` for every waypoint within `radius_m` of `location`,
    /// in insertion order.
    pub fn visit_within_range<F>(&self, location: &GeoPoint, radius_m: f64, mut visitor: F)
    where
        F: FnMut(&Arc<Waypoint>),
    {
        if !location.is_valid() || !(radius_m >= 0.0) {
            return;
        }

        // box is padded so ellipsoid scaling never drops a point the sphere keeps
        let padded = radius_m * 1.01;
        let dlat = meters_to_lat(padded, location.latitude);
        let dlon = meters_to_lon(padded, location.latitude);

        for waypoint in &self.waypoints {
            let wp = &waypoint.location;
            if (wp.latitude - location.latitude).abs() > dlat {
                continue;
            }
            if dlon < 180.0 && longitude_delta(wp.longitude, location.longitude).abs() > dlon {
                continue;
            }
            if location.distance(wp) <= radius_m {
                visitor(waypoint);
            }
        }
    }

    /// Closest landable waypoint within `max_distance_m`, earliest on ties.
    pub fn nearest_landable(
        &self,
        location: &GeoPoint,
        max_distance_m: f64,
    ) -> Option<Arc<Waypoint>> {
        let mut best: Option<(f64, Arc<Waypoint>)> = None;
        self.visit_within_range(location, max_distance_m, |waypoint| {
            if !waypoint.is_landable() {
                return;
            }
            let distance = location.distance(&waypoint.location);
            if best.as_ref().map_or(true, |(d, _)| distance < *d) {
                best = Some((distance, Arc::clone(waypoint)));
            }
        });
        best.map(|(_, waypoint)| waypoint)
    }
}

/// Signed longitude difference wrapped to (-180, 180].
fn longitude_delta(lon: f64, reference: f64) -> f64 {
    let delta = (lon - reference).rem_euclid(360.0);
    if delta > 180.0 {
        delta - 360.0
    } else {
        delta
    }
}
