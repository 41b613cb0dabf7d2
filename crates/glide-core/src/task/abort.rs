//! Abort task: automatic selection of landing alternates.
//!
//! On every sample the task rebuilds a short list of landable waypoints
//! the aircraft can reach, best first:
//!
//! 1. airfields reachable in final glide, highest arrival margin first
//! 2. other landables reachable in final glide, same ordering
//! 3. anything reachable if climbs are allowed, quickest first
//!
//! Passes 1 and 2 use the safety polar, pass 3 the polar supplied with the
//! sample. The list never holds more than [`MAX_ABORT`] entries and a
//! waypoint is placed at most once. When the previously active alternate
//! is still in the list, it stays active.

use std::sync::Arc;

use tracing::{debug, info};

use crate::behaviour::TaskBehaviour;
use crate::geo::{AGeoPoint, GeoVector};
use crate::models::{AircraftState, GlideResult, Waypoint, WaypointId};
use crate::polar::GlidePolar;
use crate::solver::GlideSolver;
use crate::task::{Task, TaskPointVisitor, TaskStats, UnorderedTask, UnorderedTaskPoint};
use crate::waypoints::Waypoints;

/// Maximum number of alternates held.
pub const MAX_ABORT: usize = 10;

/// Landables are searched at least this far (m).
pub const MIN_SEARCH_RANGE: f64 = 50_000.0;

/// Landables are never searched beyond this (m).
pub const MAX_SEARCH_RANGE: f64 = 100_000.0;

/// A candidate landable with its most recent glide solution.
#[derive(Debug, Clone)]
pub struct AlternatePoint {
    pub waypoint: Arc<Waypoint>,
    pub solution: GlideResult,
}

impl AlternatePoint {
    pub fn new(waypoint: Arc<Waypoint>) -> Self {
        Self {
            waypoint,
            solution: GlideResult::default(),
        }
    }
}

pub type AlternateList = Vec<AlternatePoint>;

/// An entry of the alternates list.
#[derive(Debug, Clone)]
pub struct AbortTaskPoint {
    pub point: UnorderedTaskPoint,
    /// Solution computed when the entry was placed
    pub solution: GlideResult,
}

impl AbortTaskPoint {
    pub fn waypoint(&self) -> &Arc<Waypoint> {
        self.point.waypoint()
    }
}

/// Terrain or airspace check on the final glide toward a destination.
pub trait AbortIntersectionTest {
    /// True if the glide to `destination` is obstructed.
    fn intersects(&self, destination: &AGeoPoint) -> bool;
}

/// Observer called after each scan stage.
///
/// `reachable` is true after the final-glide passes and false after the
/// climb-allowed pass; `task_points` is the list as built so far.
pub trait AbortScanHook {
    fn on_scan(&mut self, state: &AircraftState, task_points: &[AbortTaskPoint], reachable: bool);
}

pub struct AbortTask<'a> {
    base: UnorderedTask<'a>,
    waypoints: &'a Waypoints,
    task_points: Vec<AbortTaskPoint>,
    /// Waypoint of the active entry, remembered across rebuilds
    active_waypoint: Option<WaypointId>,
    reachable_landable: bool,
    is_active: bool,
    intersection_test: Option<&'a dyn AbortIntersectionTest>,
    scan_hook: Option<Box<dyn AbortScanHook + 'a>>,
}

impl<'a> AbortTask<'a> {
    pub fn new(behaviour: &'a TaskBehaviour, waypoints: &'a Waypoints) -> Self {
        Self {
            base: UnorderedTask::new(behaviour),
            waypoints,
            task_points: Vec::with_capacity(MAX_ABORT),
            active_waypoint: None,
            reachable_landable: false,
            is_active: false,
            intersection_test: None,
            scan_hook: None,
        }
    }

    pub fn with_solver(mut self, solver: &'a dyn GlideSolver) -> Self {
        self.base.set_solver(solver);
        self
    }

    pub fn set_intersection_test(&mut self, test: Option<&'a dyn AbortIntersectionTest>) {
        self.intersection_test = test;
    }

    pub fn set_scan_hook(&mut self, hook: Box<dyn AbortScanHook + 'a>) {
        self.scan_hook = Some(hook);
    }

    /// Whether this task is the one being flown. Only an active task
    /// reports changes of the active alternate.
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_task_full(&self) -> bool {
        self.task_points.len() >= MAX_ABORT
    }

    /// Waypoint id of the active alternate, kept while the list is empty.
    pub fn active_waypoint(&self) -> Option<WaypointId> {
        self.active_waypoint
    }

    /// True if the last scan placed at least one final-glide alternate.
    pub fn has_reachable_landable(&self) -> bool {
        self.reachable_landable
    }

    pub fn alternates(&self) -> &[AbortTaskPoint] {
        &self.task_points
    }

    pub fn alternate(&self, index: usize) -> Option<&Arc<Waypoint>> {
        self.task_points.get(index).map(AbortTaskPoint::waypoint)
    }

    /// Vector from the aircraft to the home waypoint, invalid when there is
    /// no home or no usable location.
    pub fn home_vector(&self, state: &AircraftState) -> GeoVector {
        match self.waypoints.home() {
            Some(home) if state.location.is_valid() => {
                GeoVector::between(&state.location, &home.location)
            }
            _ => GeoVector::invalid(),
        }
    }

    /// Search radius: the still-air glide range, clamped to
    /// [`MIN_SEARCH_RANGE`]..=[`MAX_SEARCH_RANGE`].
    pub fn abort_range(&self, state: &AircraftState, polar: &GlidePolar) -> f64 {
        let polar = self.base.behaviour().safety_polar(polar);
        (state.altitude_m * polar.best_ld()).clamp(MIN_SEARCH_RANGE, MAX_SEARCH_RANGE)
    }

    fn clear(&mut self) {
        self.task_points.clear();
        self.base.set_active_task_point(0);
        self.reachable_landable = false;
    }

    fn is_reachable(&self, waypoint: &Waypoint, solution: &GlideResult, final_glide: bool) -> bool {
        if final_glide {
            if !solution.is_final_glide() {
                return false;
            }
            let destination = AGeoPoint::new(waypoint.location, solution.min_arrival_altitude);
            !self
                .intersection_test
                .is_some_and(|test| test.intersects(&destination))
        } else {
            solution.is_achievable()
        }
    }

    /// Move every candidate that passes this stage's filter into the list.
    ///
    /// Matches are ranked by arrival margin when `final_glide` is set, by
    /// total time otherwise, and appended until the list is full; the
    /// remaining candidates stay for later passes. `safety` selects the
    /// safety polar.
    ///
    /// Returns true if at least one final-glide alternate was added.
    pub fn fill_reachable(
        &mut self,
        state: &AircraftState,
        candidates: &mut AlternateList,
        polar: &GlidePolar,
        only_airfield: bool,
        final_glide: bool,
        safety: bool,
    ) -> bool {
        if self.is_task_full() || candidates.is_empty() {
            return false;
        }

        let behaviour = self.base.behaviour();
        let polar = if safety {
            behaviour.safety_polar(polar)
        } else {
            *polar
        };

        let mut matches = AlternateList::new();
        let mut remaining = AlternateList::with_capacity(candidates.len());
        for mut candidate in candidates.drain(..) {
            if only_airfield && !candidate.waypoint.is_airport() {
                remaining.push(candidate);
                continue;
            }
            let point = UnorderedTaskPoint::new(Arc::clone(&candidate.waypoint), behaviour);
            let solution = self.base.solve(&point, state, &polar);
            if self.is_reachable(&candidate.waypoint, &solution, final_glide) {
                candidate.solution = solution;
                matches.push(candidate);
            } else {
                remaining.push(candidate);
            }
        }
        *candidates = remaining;

        if final_glide {
            matches.sort_by(|a, b| {
                b.solution
                    .altitude_difference
                    .total_cmp(&a.solution.altitude_difference)
            });
        } else {
            matches.sort_by(|a, b| a.solution.total_time().total_cmp(&b.solution.total_time()));
        }

        let room = MAX_ABORT - self.task_points.len();
        if matches.len() > room {
            debug!(dropped = matches.len() - room, "Alternates list full");
        }

        let mut found_final_glide = false;
        for alternate in matches.into_iter().take(room) {
            found_final_glide |= alternate.solution.is_final_glide();
            if Some(alternate.waypoint.id) == self.active_waypoint {
                self.base.set_active_task_point(self.task_points.len());
            }
            self.task_points.push(AbortTaskPoint {
                point: UnorderedTaskPoint::new(alternate.waypoint, behaviour),
                solution: alternate.solution,
            });
        }
        found_final_glide
    }

    fn client_update(&mut self, state: &AircraftState, reachable: bool) {
        if let Some(hook) = self.scan_hook.as_mut() {
            hook.on_scan(state, &self.task_points, reachable);
        }
    }

    fn update_stats(&mut self, state: &AircraftState, polar: &GlidePolar) {
        let active = self
            .task_points
            .get(self.base.active_task_point())
            .map(|tp| &tp.point);
        self.base.update_stats(active, state, polar);
    }

    fn rebuild(&mut self, state: &AircraftState, polar: &GlidePolar) {
        let range = self.abort_range(state, polar);
        let mut candidates = AlternateList::new();
        self.waypoints
            .visit_within_range(&state.location, range, |waypoint| {
                if waypoint.is_landable() {
                    candidates.push(AlternatePoint::new(Arc::clone(waypoint)));
                }
            });
        if candidates.is_empty() {
            debug!(range_m = range, "No landables within range");
            return;
        }

        let airfields = self.fill_reachable(state, &mut candidates, polar, true, true, true);
        let landables = self.fill_reachable(state, &mut candidates, polar, false, true, true);
        self.reachable_landable = airfields || landables;
        self.client_update(state, true);

        self.fill_reachable(state, &mut candidates, polar, false, false, false);
        self.client_update(state, false);

        debug!(
            range_m = range,
            alternates = self.task_points.len(),
            reachable = self.reachable_landable,
            "Alternates rebuilt"
        );
    }
}

impl Task for AbortTask<'_> {
    fn task_size(&self) -> usize {
        self.task_points.len()
    }

    fn active_task_point_index(&self) -> usize {
        self.base.active_task_point()
    }

    fn active_task_point(&self) -> Option<&UnorderedTaskPoint> {
        self.task_points
            .get(self.base.active_task_point())
            .map(|tp| &tp.point)
    }

    fn set_active_task_point(&mut self, index: usize) {
        if let Some(tp) = self.task_points.get(index) {
            self.active_waypoint = Some(tp.waypoint().id);
            self.base.set_active_task_point(index);
        }
    }

    /// Rebuild the alternates list.
    ///
    /// Returns true when this task is active and the active alternate now
    /// names a different waypoint than before the sample; the start
    /// statistics are reset in that case.
    fn update_sample(
        &mut self,
        state: &AircraftState,
        polar: &GlidePolar,
        _full_update: bool,
    ) -> bool {
        let previous = if self.is_active {
            self.active_waypoint
        } else {
            None
        };

        self.clear();
        if polar.is_valid() {
            self.rebuild(state, polar);
        } else {
            debug!("Glide polar invalid, alternates cleared");
        }

        let mut changed = false;
        let active = self
            .task_points
            .get(self.base.active_task_point())
            .map(|tp| tp.waypoint().id);
        if let Some(id) = active {
            self.active_waypoint = Some(id);
            if self.is_active && previous != Some(id) {
                info!(waypoint = id, "Active alternate changed");
                self.base.stats_mut().start.reset();
                changed = true;
            }
        }

        self.update_stats(state, polar);
        changed
    }

    fn accept_task_point_visitor(&self, visitor: &mut dyn TaskPointVisitor) {
        for tp in &self.task_points {
            visitor.visit(&tp.point);
        }
    }

    fn stats(&self) -> &TaskStats {
        self.base.stats()
    }

    fn reset(&mut self) {
        self.clear();
        self.active_waypoint = None;
        self.base.reset();
    }
}
