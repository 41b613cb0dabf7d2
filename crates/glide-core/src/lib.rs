pub mod behaviour;
pub mod events;
pub mod geo;
pub mod models;
pub mod polar;
pub mod solver;
pub mod task;
pub mod waypoints;

pub use behaviour::{GlideSettings, TaskBehaviour};
pub use events::{GlideComputerEvent, GlideComputerEvents, TaskEventObserver};
pub use geo::{haversine_distance, AGeoPoint, GeoPoint, GeoVector};
pub use models::{
    AircraftState, GlideResult, GlideResultStatus, Waypoint, WaypointId, WaypointKind, Wind,
};
pub use polar::GlidePolar;
pub use solver::{GlideSolver, MacCreadySolver};
pub use task::{
    AbortIntersectionTest, AbortScanHook, AbortTask, AbortTaskPoint, AlternateList,
    AlternatePoint, GotoTask, StartStats, Task, TaskManager, TaskMode, TaskPointVisitor,
    TaskStats, UnorderedTaskPoint, MAX_ABORT,
};
pub use waypoints::{WaypointError, WaypointFile, Waypoints};
