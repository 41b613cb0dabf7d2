//! Single-destination "go to" task.

use std::sync::Arc;

use tracing::{info, warn};

use crate::behaviour::TaskBehaviour;
use crate::geo::GeoPoint;
use crate::models::{AircraftState, Waypoint, WaypointId, WaypointKind};
use crate::polar::GlidePolar;
use crate::solver::GlideSolver;
use crate::task::{Task, TaskPointVisitor, TaskStats, UnorderedTask, UnorderedTaskPoint};
use crate::waypoints::Waypoints;

/// Id given to the point synthesized at the takeoff location.
pub const TAKEOFF_WAYPOINT_ID: WaypointId = WaypointId::MAX;

/// How far from the takeoff location a landable is accepted as home.
pub const TAKEOFF_SEARCH_RANGE: f64 = 5_000.0;

pub struct GotoTask<'a> {
    base: UnorderedTask<'a>,
    waypoints: &'a Waypoints,
    destination: Option<UnorderedTaskPoint>,
}

impl<'a> GotoTask<'a> {
    pub fn new(behaviour: &'a TaskBehaviour, waypoints: &'a Waypoints) -> Self {
        Self {
            base: UnorderedTask::new(behaviour),
            waypoints,
            destination: None,
        }
    }

    pub fn with_solver(mut self, solver: &'a dyn GlideSolver) -> Self {
        self.base.set_solver(solver);
        self
    }

    pub fn destination(&self) -> Option<&UnorderedTaskPoint> {
        self.destination.as_ref()
    }

    /// Replace the destination.
    ///
    /// Non-landable waypoints are refused unless the behaviour allows them.
    pub fn do_goto(&mut self, waypoint: Arc<Waypoint>) -> bool {
        let behaviour = self.base.behaviour();
        if !behaviour.goto_nonlandable && !waypoint.is_landable() {
            warn!(waypoint = %waypoint.name, "Refusing goto to non-landable waypoint");
            return false;
        }
        info!(waypoint = %waypoint.name, id = waypoint.id, "Goto destination set");
        self.destination = Some(UnorderedTaskPoint::new(waypoint, behaviour));
        self.base.set_active_task_point(0);
        self.base.stats_mut().start.reset();
        true
    }

    /// Pick a destination after takeoff if none is set: the nearest
    /// landable within [`TAKEOFF_SEARCH_RANGE`], or else the takeoff
    /// location itself.
    ///
    /// Returns whether a destination is set afterwards.
    pub fn takeoff_autotask(&mut self, location: &GeoPoint, terrain_alt: f64) -> bool {
        if self.destination.is_none() {
            let waypoint = self
                .waypoints
                .nearest_landable(location, TAKEOFF_SEARCH_RANGE)
                .unwrap_or_else(|| Arc::new(takeoff_point(*location, terrain_alt)));
            self.do_goto(waypoint);
        }
        self.destination.is_some()
    }
}

fn takeoff_point(location: GeoPoint, terrain_alt: f64) -> Waypoint {
    Waypoint::new(
        TAKEOFF_WAYPOINT_ID,
        "(takeoff)",
        location,
        terrain_alt,
        WaypointKind::Outlanding,
    )
}

impl Task for GotoTask<'_> {
    fn task_size(&self) -> usize {
        usize::from(self.destination.is_some())
    }

    fn active_task_point_index(&self) -> usize {
        self.base.active_task_point()
    }

    fn active_task_point(&self) -> Option<&UnorderedTaskPoint> {
        self.destination.as_ref()
    }

    fn set_active_task_point(&mut self, index: usize) {
        if index < self.task_size() {
            self.base.set_active_task_point(index);
        }
    }

    fn update_sample(
        &mut self,
        state: &AircraftState,
        polar: &GlidePolar,
        _full_update: bool,
    ) -> bool {
        self.base
            .update_stats(self.destination.as_ref(), state, polar);
        false
    }

    fn accept_task_point_visitor(&self, visitor: &mut dyn TaskPointVisitor) {
        if let Some(point) = &self.destination {
            visitor.visit(point);
        }
    }

    fn stats(&self) -> &TaskStats {
        self.base.stats()
    }

    fn reset(&mut self) {
        self.destination = None;
        self.base.reset();
    }
}
