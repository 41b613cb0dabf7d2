//! Glide feasibility solver.
//!
//! [`GlideSolver`] is the seam the tasks use to ask "can I get there from
//! here?". [`MacCreadySolver`] is the default: classical MacCready cruise at
//! the polar's speed to fly, with an optional along-track wind correction
//! and climbs at the MacCready rate when the glide comes up short.

use crate::behaviour::GlideSettings;
use crate::models::{AircraftState, GlideResult, GlideResultStatus};
use crate::polar::GlidePolar;
use crate::task::UnorderedTaskPoint;

pub trait GlideSolver {
    /// Solution from `state` to `point` under `polar`.
    fn solve_remaining(
        &self,
        point: &UnorderedTaskPoint,
        state: &AircraftState,
        settings: &GlideSettings,
        polar: &GlidePolar,
    ) -> GlideResult;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MacCreadySolver;

/// Shared instance used by tasks that are not given a solver.
pub static MACCREADY: MacCreadySolver = MacCreadySolver;

impl GlideSolver for MacCreadySolver {
    fn solve_remaining(
        &self,
        point: &UnorderedTaskPoint,
        state: &AircraftState,
        settings: &GlideSettings,
        polar: &GlidePolar,
    ) -> GlideResult {
        let vector = point.vector_remaining(&state.location);
        let min_arrival_altitude = point.elevation();
        if !vector.is_valid() || !polar.is_valid() || !state.altitude_m.is_finite() {
            return GlideResult {
                min_arrival_altitude,
                ..GlideResult::with_status(GlideResultStatus::NoSolution)
            };
        }

        let v_opt = polar.v_opt();
        let sink = polar.sink_rate(v_opt);
        let headwind = match (settings.predict_wind_drift, state.wind) {
            (true, Some(wind)) => wind.headwind_component(vector.bearing_deg),
            _ => 0.0,
        };
        let ground_speed = v_opt - headwind;
        if ground_speed <= 0.0 {
            return GlideResult {
                status: GlideResultStatus::WindExcessive,
                vector,
                min_arrival_altitude,
                v_opt,
                ..GlideResult::default()
            };
        }

        let cruise_time = vector.distance_m / ground_speed;
        let height_glide = cruise_time * sink;
        let altitude_difference = state.altitude_m - min_arrival_altitude - height_glide;
        let height_climb = (-altitude_difference).max(0.0);
        let mc = polar.mc();

        let mut result = GlideResult {
            status: GlideResultStatus::Ok,
            vector,
            height_glide,
            height_climb,
            altitude_difference,
            time_elapsed: cruise_time,
            time_virtual: 0.0,
            min_arrival_altitude,
            v_opt,
        };

        if mc > 0.0 {
            result.time_elapsed += height_climb / mc;
            // negative when starting below the arrival altitude; the sum
            // with time_elapsed stays the MacCready total time
            result.time_virtual = (height_glide - height_climb) / mc;
        } else if height_climb > 0.0 {
            result.status = GlideResultStatus::MacCready;
        }

        result
    }
}
