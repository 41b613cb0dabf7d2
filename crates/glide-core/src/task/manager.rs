//! Owner of the tasks and the switch between them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::behaviour::TaskBehaviour;
use crate::geo::{GeoPoint, GeoVector};
use crate::models::{AircraftState, Waypoint};
use crate::polar::GlidePolar;
use crate::solver::GlideSolver;
use crate::task::{
    AbortIntersectionTest, AbortScanHook, AbortTask, AbortTaskPoint, GotoTask, Task,
    TaskPointVisitor, TaskStats, UnorderedTaskPoint,
};
use crate::waypoints::Waypoints;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskMode {
    #[default]
    Null,
    Goto,
    Abort,
}

pub struct TaskManager<'a> {
    mode: TaskMode,
    goto_task: GotoTask<'a>,
    abort_task: AbortTask<'a>,
    polar: GlidePolar,
    null_stats: TaskStats,
}

impl<'a> TaskManager<'a> {
    pub fn new(behaviour: &'a TaskBehaviour, waypoints: &'a Waypoints) -> Self {
        Self {
            mode: TaskMode::Null,
            goto_task: GotoTask::new(behaviour, waypoints),
            abort_task: AbortTask::new(behaviour, waypoints),
            polar: GlidePolar::invalid(),
            null_stats: TaskStats::default(),
        }
    }

    pub fn with_solver(self, solver: &'a dyn GlideSolver) -> Self {
        Self {
            goto_task: self.goto_task.with_solver(solver),
            abort_task: self.abort_task.with_solver(solver),
            ..self
        }
    }

    pub fn set_intersection_test(&mut self, test: Option<&'a dyn AbortIntersectionTest>) {
        self.abort_task.set_intersection_test(test);
    }

    pub fn set_scan_hook(&mut self, hook: Box<dyn AbortScanHook + 'a>) {
        self.abort_task.set_scan_hook(hook);
    }

    pub fn mode(&self) -> TaskMode {
        self.mode
    }

    pub fn set_glide_polar(&mut self, polar: GlidePolar) {
        self.polar = polar;
    }

    pub fn glide_polar(&self) -> &GlidePolar {
        &self.polar
    }

    fn set_mode(&mut self, mode: TaskMode) -> TaskMode {
        if self.mode != mode {
            info!(from = ?self.mode, to = ?mode, "Task mode changed");
            self.mode = mode;
        }
        self.abort_task.set_active(mode == TaskMode::Abort);
        self.mode
    }

    /// Switch to the abort task.
    pub fn abort(&mut self) -> TaskMode {
        self.set_mode(TaskMode::Abort)
    }

    /// Leave the abort task, back to goto if a destination is set.
    pub fn resume(&mut self) -> TaskMode {
        if self.goto_task.destination().is_some() {
            self.set_mode(TaskMode::Goto)
        } else {
            self.set_mode(TaskMode::Null)
        }
    }

    pub fn do_goto(&mut self, waypoint: Arc<Waypoint>) -> bool {
        if self.goto_task.do_goto(waypoint) {
            self.set_mode(TaskMode::Goto);
            true
        } else {
            false
        }
    }

    /// Enter goto mode toward a takeoff destination when no task is set.
    pub fn takeoff_autotask(&mut self, location: &GeoPoint, terrain_alt: f64) -> bool {
        if self.mode == TaskMode::Null && self.goto_task.takeoff_autotask(location, terrain_alt) {
            self.set_mode(TaskMode::Goto);
            return true;
        }
        false
    }

    /// Feed a sample to the tasks.
    ///
    /// The abort task runs in every mode so the alternates stay current.
    /// Returns true if the active task reported a change.
    pub fn update(&mut self, state: &AircraftState, full_update: bool) -> bool {
        let polar = self.polar;
        let mut changed = false;
        if self.mode == TaskMode::Goto {
            changed |= self.goto_task.update_sample(state, &polar, full_update);
        }
        changed |= self.abort_task.update_sample(state, &polar, full_update);
        changed
    }

    fn active_task(&self) -> Option<&dyn Task> {
        match self.mode {
            TaskMode::Null => None,
            TaskMode::Goto => Some(&self.goto_task),
            TaskMode::Abort => Some(&self.abort_task),
        }
    }

    pub fn task_size(&self) -> usize {
        self.active_task().map_or(0, |task| task.task_size())
    }

    pub fn active_task_point_index(&self) -> usize {
        self.active_task()
            .map_or(0, |task| task.active_task_point_index())
    }

    pub fn active_task_point(&self) -> Option<&UnorderedTaskPoint> {
        self.active_task().and_then(|task| task.active_task_point())
    }

    pub fn set_active_task_point(&mut self, index: usize) {
        match self.mode {
            TaskMode::Null => {}
            TaskMode::Goto => self.goto_task.set_active_task_point(index),
            TaskMode::Abort => self.abort_task.set_active_task_point(index),
        }
    }

    pub fn is_valid_task_point(&self, offset: isize) -> bool {
        self.active_task()
            .is_some_and(|task| task.is_valid_task_point(offset))
    }

    pub fn accept_task_point_visitor(&self, visitor: &mut dyn TaskPointVisitor) {
        if let Some(task) = self.active_task() {
            task.accept_task_point_visitor(visitor);
        }
    }

    pub fn stats(&self) -> &TaskStats {
        self.active_task()
            .map_or(&self.null_stats, |task| task.stats())
    }

    pub fn goto_task(&self) -> &GotoTask<'a> {
        &self.goto_task
    }

    pub fn abort_task(&self) -> &AbortTask<'a> {
        &self.abort_task
    }

    /// Ranked alternates from the latest sample, regardless of mode.
    pub fn alternates(&self) -> &[AbortTaskPoint] {
        self.abort_task.alternates()
    }

    pub fn has_reachable_landable(&self) -> bool {
        self.abort_task.has_reachable_landable()
    }

    pub fn home_vector(&self, state: &AircraftState) -> GeoVector {
        self.abort_task.home_vector(state)
    }

    pub fn reset(&mut self) {
        self.goto_task.reset();
        self.abort_task.reset();
        self.set_mode(TaskMode::Null);
    }
}
