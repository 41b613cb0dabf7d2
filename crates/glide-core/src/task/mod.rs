//! Navigation tasks.
//!
//! Every task kind implements [`Task`], so callers can drive and inspect
//! whichever one is active without knowing its concrete type. The
//! unordered kinds ([`GotoTask`], [`AbortTask`]) share their bookkeeping
//! through [`UnorderedTask`].

pub mod abort;
pub mod goto_task;
pub mod manager;
pub mod point;
pub mod unordered;

use chrono::{DateTime, Utc};

use crate::models::{AircraftState, GlideResult};
use crate::polar::GlidePolar;

pub use abort::{
    AbortIntersectionTest, AbortScanHook, AbortTask, AbortTaskPoint, AlternateList,
    AlternatePoint, MAX_ABORT,
};
pub use goto_task::GotoTask;
pub use manager::{TaskManager, TaskMode};
pub use point::UnorderedTaskPoint;
pub use unordered::UnorderedTask;

/// Read-only traversal of a task's points, used by renderers and dialogs.
pub trait TaskPointVisitor {
    fn visit(&mut self, point: &UnorderedTaskPoint);
}

impl<F: FnMut(&UnorderedTaskPoint)> TaskPointVisitor for F {
    fn visit(&mut self, point: &UnorderedTaskPoint) {
        self(point)
    }
}

/// Common interface of all task kinds.
pub trait Task {
    fn task_size(&self) -> usize;

    fn active_task_point_index(&self) -> usize;

    fn active_task_point(&self) -> Option<&UnorderedTaskPoint>;

    /// Select a task point; out of range indices are ignored.
    fn set_active_task_point(&mut self, index: usize);

    /// Whether the active index shifted by `offset` names a task point.
    fn is_valid_task_point(&self, offset: isize) -> bool {
        self.active_task_point_index()
            .checked_add_signed(offset)
            .is_some_and(|index| index < self.task_size())
    }

    /// Recompute the task for a new aircraft sample.
    ///
    /// Returns true if the task changed in a way clients should react to.
    fn update_sample(
        &mut self,
        state: &AircraftState,
        polar: &GlidePolar,
        full_update: bool,
    ) -> bool;

    fn accept_task_point_visitor(&self, visitor: &mut dyn TaskPointVisitor);

    fn stats(&self) -> &TaskStats;

    /// Back to the state of a freshly constructed task.
    fn reset(&mut self);
}

/// When and where the current leg started.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartStats {
    pub started_at: Option<DateTime<Utc>>,
    pub altitude_m: f64,
}

impl StartStats {
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn set_started(&mut self, state: &AircraftState) {
        self.started_at = Some(state.timestamp);
        self.altitude_m = state.altitude_m;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskStats {
    pub start: StartStats,
    /// Glide solution to the active task point
    pub solution_remaining: GlideResult,
}
