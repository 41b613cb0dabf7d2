//! Events raised toward the glide computer's user interface.

use std::sync::Arc;

use crate::models::{Waypoint, WaypointId};
use crate::task::TaskManager;

#[derive(Debug, Clone, PartialEq)]
pub enum GlideComputerEvent {
    /// The best-ranked alternate names a different waypoint, `None` when
    /// the list became empty.
    AlternateChanged { waypoint: Option<Arc<Waypoint>> },
}

pub trait GlideComputerEvents {
    fn on_event(&mut self, event: GlideComputerEvent);
}

impl<F: FnMut(GlideComputerEvent)> GlideComputerEvents for F {
    fn on_event(&mut self, event: GlideComputerEvent) {
        self(event)
    }
}

/// Watches the task manager between samples and raises events on changes.
#[derive(Debug, Default)]
pub struct TaskEventObserver {
    best_alternate: Option<WaypointId>,
}

impl TaskEventObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, task_manager: &TaskManager<'_>, events: &mut dyn GlideComputerEvents) {
        let best = task_manager
            .alternates()
            .first()
            .map(|tp| Arc::clone(tp.waypoint()));
        let best_id = best.as_ref().map(|wp| wp.id);
        if best_id != self.best_alternate {
            self.best_alternate = best_id;
            events.on_event(GlideComputerEvent::AlternateChanged { waypoint: best });
        }
    }
}
