//! Flight simulation used by the CLI tools.

pub mod paths;
pub mod scenarios;

pub use paths::{FlightPath, GlidePath};
pub use scenarios::{
    create_ridge_scenario, load_waypoints, polar_from_coefficients, random_landables, Scenario,
    ScenarioError,
};
