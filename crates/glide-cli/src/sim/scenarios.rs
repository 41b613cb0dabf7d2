//! Landable fields and glide scenarios for the simulator.

use std::path::Path;

use glide_core::{GeoPoint, GlidePolar, Waypoint, WaypointError, WaypointKind, Waypoints};
use rand::Rng;

use super::paths::GlidePath;

/// Error type for scenario setup.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Waypoints(#[from] WaypointError),
    #[error("Invalid glide polar a={a} b={b} c={c} mc={mc}")]
    InvalidPolar { a: f64, b: f64, c: f64, mc: f64 },
    #[error("Field radius must be positive, got {0}")]
    InvalidRadius(f64),
}

/// A named scenario: a waypoint field and a glide over it.
pub struct Scenario {
    pub name: String,
    pub waypoints: Waypoints,
    pub path: GlidePath,
}

pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Waypoints, ScenarioError> {
    Ok(Waypoints::from_json_file(path)?)
}

/// Build a polar and reject coefficients the tasks could not use.
pub fn polar_from_coefficients(
    a: f64,
    b: f64,
    c: f64,
    mc: f64,
) -> Result<GlidePolar, ScenarioError> {
    let polar = GlidePolar::from_coefficients(a, b, c).with_mc(mc);
    if polar.is_valid() {
        Ok(polar)
    } else {
        Err(ScenarioError::InvalidPolar { a, b, c, mc })
    }
}

/// Scatter `count` landables uniformly over a disc around `center`.
///
/// Roughly a third are airfields, the rest outlanding fields. The first
/// airfield becomes home.
pub fn random_landables<R: Rng>(
    rng: &mut R,
    center: GeoPoint,
    count: u32,
    radius_m: f64,
) -> Result<Waypoints, ScenarioError> {
    if !(radius_m > 0.0) {
        return Err(ScenarioError::InvalidRadius(radius_m));
    }

    let mut waypoints = Waypoints::new();
    let mut home = None;
    for id in 1..=count {
        // sqrt keeps the density uniform over the disc
        let distance = radius_m * rng.random::<f64>().sqrt();
        let bearing = rng.random_range(0.0..360.0);
        let elevation = rng.random_range(200.0..800.0);
        let (name, kind) = if rng.random_bool(0.35) {
            (format!("Airfield {id}"), WaypointKind::Airfield)
        } else {
            (format!("Field {id}"), WaypointKind::Outlanding)
        };
        if home.is_none() && kind == WaypointKind::Airfield {
            home = Some(id);
        }
        waypoints.append(Waypoint::new(
            id,
            name,
            center.offset(distance, bearing),
            elevation,
            kind,
        ))?;
    }
    if let Some(id) = home {
        waypoints.set_home(id);
    }
    Ok(waypoints)
}

/// Create a glide east along a line of airfields spaced 15 km apart.
///
/// - Airfields 1..=8 on the track, each 15 km further east
/// - A turnpoint on the track that must never be offered
pub fn create_ridge_scenario(
    center: GeoPoint,
    polar: &GlidePolar,
) -> Result<Scenario, ScenarioError> {
    let fields = (1..=8u32).map(|id| {
        Waypoint::new(
            id,
            format!("Ridge {id}"),
            center.offset(15_000.0 * f64::from(id), 90.0),
            450.0,
            WaypointKind::Airfield,
        )
    });
    let ridge_top = Waypoint::new(
        100,
        "Ridge top",
        center.offset(22_000.0, 90.0),
        1_400.0,
        WaypointKind::Turnpoint,
    );
    let waypoints = Waypoints::from_waypoints(fields.chain(std::iter::once(ridge_top)))?;

    Ok(Scenario {
        name: "ridge".to_string(),
        waypoints,
        path: GlidePath::from_polar(center, 90.0, 2_500.0, polar, 450.0),
    })
}
