//! Task point wrapping a single waypoint with no ordering constraints.

use std::sync::Arc;

use crate::behaviour::TaskBehaviour;
use crate::geo::{GeoPoint, GeoVector};
use crate::models::Waypoint;

#[derive(Debug, Clone)]
pub struct UnorderedTaskPoint {
    waypoint: Arc<Waypoint>,
    safety_height_arrival: f64,
}

impl UnorderedTaskPoint {
    pub fn new(waypoint: Arc<Waypoint>, behaviour: &TaskBehaviour) -> Self {
        Self {
            waypoint,
            safety_height_arrival: behaviour.safety_height_arrival,
        }
    }

    pub fn waypoint(&self) -> &Arc<Waypoint> {
        &self.waypoint
    }

    pub fn location(&self) -> &GeoPoint {
        &self.waypoint.location
    }

    /// Minimum arrival altitude: waypoint elevation plus the arrival margin.
    pub fn elevation(&self) -> f64 {
        self.waypoint.elevation_m + self.safety_height_arrival
    }

    /// Vector from `reference` to this point, or [`GeoVector::invalid`]
    /// when `reference` is not a usable location.
    pub fn vector_remaining(&self, reference: &GeoPoint) -> GeoVector {
        if !reference.is_valid() {
            return GeoVector::invalid();
        }
        GeoVector::between(reference, &self.waypoint.location)
    }
}
