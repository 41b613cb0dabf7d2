//! State shared by the task kinds that have no ordered sequence of points.

use crate::behaviour::TaskBehaviour;
use crate::models::{AircraftState, GlideResult};
use crate::polar::GlidePolar;
use crate::solver::{GlideSolver, MACCREADY};
use crate::task::{TaskStats, UnorderedTaskPoint};

/// Active index, statistics and injected services of an unordered task.
///
/// `behaviour` and `solver` are borrowed for the task's whole lifetime.
pub struct UnorderedTask<'a> {
    behaviour: &'a TaskBehaviour,
    solver: &'a dyn GlideSolver,
    active_task_point: usize,
    stats: TaskStats,
}

impl<'a> UnorderedTask<'a> {
    pub fn new(behaviour: &'a TaskBehaviour) -> Self {
        Self {
            behaviour,
            solver: &MACCREADY,
            active_task_point: 0,
            stats: TaskStats::default(),
        }
    }

    pub fn set_solver(&mut self, solver: &'a dyn GlideSolver) {
        self.solver = solver;
    }

    pub fn behaviour(&self) -> &'a TaskBehaviour {
        self.behaviour
    }

    pub fn active_task_point(&self) -> usize {
        self.active_task_point
    }

    pub fn set_active_task_point(&mut self, index: usize) {
        self.active_task_point = index;
    }

    pub fn stats(&self) -> &TaskStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut TaskStats {
        &mut self.stats
    }

    /// Glide solution from `state` to `point` with the task's settings.
    pub fn solve(
        &self,
        point: &UnorderedTaskPoint,
        state: &AircraftState,
        polar: &GlidePolar,
    ) -> GlideResult {
        self.solver
            .solve_remaining(point, state, &self.behaviour.glide, polar)
    }

    /// Record the start on the first flying sample and refresh the
    /// solution toward `active`.
    pub fn update_stats(
        &mut self,
        active: Option<&UnorderedTaskPoint>,
        state: &AircraftState,
        polar: &GlidePolar,
    ) {
        if state.flying && !self.stats.start.is_started() {
            self.stats.start.set_started(state);
        }
        self.stats.solution_remaining = match active {
            Some(point) => self.solve(point, state, polar),
            None => GlideResult::default(),
        };
    }

    pub fn reset(&mut self) {
        self.active_task_point = 0;
        self.stats = TaskStats::default();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::geo::GeoPoint;
    use crate::models::{Waypoint, WaypointKind};

    #[test]
    fn test_start_is_recorded_only_when_flying() {
        let behaviour = TaskBehaviour::default();
        let mut task = UnorderedTask::new(&behaviour);
        let polar = GlidePolar::from_coefficients(0.0016, -0.06, 1.1);
        let here = GeoPoint::new(47.0, 8.0);

        let ground = AircraftState::new(here, 500.0).on_ground();
        task.update_stats(None, &ground, &polar);
        assert!(!task.stats().start.is_started());

        let airborne = AircraftState::new(here, 1_200.0);
        task.update_stats(None, &airborne, &polar);
        assert_eq!(task.stats().start.started_at, Some(airborne.timestamp));
        assert_eq!(task.stats().start.altitude_m, 1_200.0);

        task.reset();
        assert!(!task.stats().start.is_started());
    }

    #[test]
    fn test_solution_tracks_active_point() {
        let behaviour = TaskBehaviour::default();
        let mut task = UnorderedTask::new(&behaviour);
        let polar = GlidePolar::from_coefficients(0.0016, -0.06, 1.1);
        let here = GeoPoint::new(47.0, 8.0);
        let waypoint = Waypoint::new(
            1,
            "Near",
            here.offset(5_000.0, 90.0),
            400.0,
            WaypointKind::Airfield,
        );
        let point = UnorderedTaskPoint::new(Arc::new(waypoint), &behaviour);

        let state = AircraftState::new(here, 1_500.0);
        task.update_stats(Some(&point), &state, &polar);
        assert!(task.stats().solution_remaining.is_final_glide());

        task.update_stats(None, &state, &polar);
        assert!(!task.stats().solution_remaining.is_ok());
    }
}
