//! Alternate selection tests through the public API.
//!
//! Run with: cargo test -p glide-core --test abort_scenarios

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use glide_core::{
    AbortTask, AircraftState, GeoPoint, GlidePolar, GlideResult, GlideResultStatus, GlideSettings,
    GlideSolver, MacCreadySolver, Task, TaskBehaviour, UnorderedTaskPoint, Waypoint, WaypointId,
    WaypointKind, Waypoints, MAX_ABORT,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const ORIGIN: GeoPoint = GeoPoint::new(46.8, 7.2);

fn polar() -> GlidePolar {
    GlidePolar::from_coefficients(0.0016, -0.06, 1.1).with_mc(1.0)
}

fn airfield(id: WaypointId, distance_m: f64, bearing_deg: f64, elevation_m: f64) -> Waypoint {
    Waypoint::new(
        id,
        format!("AF{id}"),
        ORIGIN.offset(distance_m, bearing_deg),
        elevation_m,
        WaypointKind::Airfield,
    )
}

fn field(id: WaypointId, distance_m: f64, bearing_deg: f64, elevation_m: f64) -> Waypoint {
    Waypoint::new(
        id,
        format!("LF{id}"),
        ORIGIN.offset(distance_m, bearing_deg),
        elevation_m,
        WaypointKind::Outlanding,
    )
}

fn alternate_ids(task: &AbortTask<'_>) -> Vec<WaypointId> {
    task.alternates().iter().map(|tp| tp.waypoint().id).collect()
}

/// Climb-only solutions with fixed total times.
struct TimedSolver(HashMap<WaypointId, f64>);

impl GlideSolver for TimedSolver {
    fn solve_remaining(
        &self,
        point: &UnorderedTaskPoint,
        _state: &AircraftState,
        _settings: &GlideSettings,
        _polar: &GlidePolar,
    ) -> GlideResult {
        match self.0.get(&point.waypoint().id) {
            Some(&time) => GlideResult {
                status: GlideResultStatus::Ok,
                altitude_difference: -100.0,
                height_climb: 100.0,
                time_elapsed: time,
                ..GlideResult::default()
            },
            None => GlideResult::with_status(GlideResultStatus::NoSolution),
        }
    }
}

/// Final-glide solutions with fixed arrival margins.
struct MarginSolver(HashMap<WaypointId, f64>);

impl GlideSolver for MarginSolver {
    fn solve_remaining(
        &self,
        point: &UnorderedTaskPoint,
        _state: &AircraftState,
        _settings: &GlideSettings,
        _polar: &GlidePolar,
    ) -> GlideResult {
        match self.0.get(&point.waypoint().id) {
            Some(&margin) => GlideResult {
                status: GlideResultStatus::Ok,
                altitude_difference: margin,
                ..GlideResult::default()
            },
            None => GlideResult::with_status(GlideResultStatus::NoSolution),
        }
    }
}

#[test]
fn test_scenario_a_invalid_polar() {
    let waypoints = Waypoints::from_waypoints(vec![airfield(1, 10_000.0, 0.0, 400.0)]).unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);
    task.set_active(true);

    let changed = task.update_sample(
        &AircraftState::new(ORIGIN, 2_000.0),
        &GlidePolar::invalid(),
        true,
    );
    assert!(!changed, "invalid polar must not report a change");
    assert_eq!(task.task_size(), 0);
}

#[test]
fn test_scenario_b_single_reachable_airport() {
    let waypoints = Waypoints::from_waypoints(vec![airfield(7, 20_000.0, 120.0, 300.0)]).unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);

    task.update_sample(&AircraftState::new(ORIGIN, 2_000.0), &polar(), true);
    assert_eq!(task.task_size(), 1);
    assert!(task.has_reachable_landable());
    assert_eq!(task.active_task_point_index(), 0);
    assert_eq!(task.alternate(0).map(|wp| wp.id), Some(7));
    assert!(task.alternates()[0].solution.is_final_glide());
}

#[test]
fn test_scenario_c_nothing_in_range() {
    let waypoints = Waypoints::from_waypoints(vec![
        airfield(1, 150_000.0, 0.0, 400.0),
        // in range but not landable
        Waypoint::new(2, "Tower", ORIGIN.offset(5_000.0, 0.0), 600.0, WaypointKind::Turnpoint),
    ])
    .unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);
    task.set_active(true);

    let changed = task.update_sample(&AircraftState::new(ORIGIN, 6_000.0), &polar(), true);
    assert!(!changed);
    assert_eq!(task.task_size(), 0);
    assert!(!task.has_reachable_landable());
}

#[test]
fn test_scenario_d_climb_only_ranked_by_time() {
    let waypoints = Waypoints::from_waypoints(vec![
        field(1, 30_000.0, 0.0, 400.0),
        field(2, 35_000.0, 90.0, 400.0),
    ])
    .unwrap();
    let solver = TimedSolver(HashMap::from([(1, 200.0), (2, 100.0)]));
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints).with_solver(&solver);

    task.update_sample(&AircraftState::new(ORIGIN, 800.0), &polar(), true);
    assert_eq!(alternate_ids(&task), vec![2, 1], "quickest alternate first");
    assert!(!task.has_reachable_landable());
}

#[test]
fn test_scenario_e_active_out_of_range_resets_to_best() {
    let waypoints = Waypoints::from_waypoints(vec![
        airfield(1, 10_000.0, 270.0, 400.0),
        airfield(2, 110_000.0, 90.0, 400.0),
    ])
    .unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);
    task.set_active(true);

    assert!(task.update_sample(&AircraftState::new(ORIGIN, 2_000.0), &polar(), true));
    assert_eq!(task.active_waypoint(), Some(1));

    // 100 km east: airfield 1 is 110 km behind, airfield 2 is 10 km ahead
    let moved = AircraftState::new(ORIGIN.offset(100_000.0, 90.0), 2_000.0);
    let changed = task.update_sample(&moved, &polar(), true);
    assert!(changed, "losing the active alternate is a change");
    assert_eq!(alternate_ids(&task), vec![2]);
    assert_eq!(task.active_task_point_index(), 0);
    assert_eq!(task.active_waypoint(), Some(2));
}

#[test]
fn test_repeated_sample_is_idempotent() {
    let waypoints = Waypoints::from_waypoints(vec![
        airfield(1, 12_000.0, 10.0, 500.0),
        field(2, 6_000.0, 200.0, 450.0),
        airfield(3, 45_000.0, 300.0, 400.0),
    ])
    .unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);
    task.set_active(true);
    let state = AircraftState::new(ORIGIN, 1_400.0);

    task.update_sample(&state, &polar(), true);
    let first = alternate_ids(&task);
    let active = task.active_task_point_index();
    let reachable = task.has_reachable_landable();

    assert!(!task.update_sample(&state, &polar(), false));
    assert_eq!(alternate_ids(&task), first);
    assert_eq!(task.active_task_point_index(), active);
    assert_eq!(task.has_reachable_landable(), reachable);
}

#[test]
fn test_selected_alternate_is_kept() {
    let waypoints = Waypoints::from_waypoints(vec![
        airfield(1, 8_000.0, 0.0, 400.0),
        airfield(2, 15_000.0, 90.0, 400.0),
        field(3, 5_000.0, 180.0, 400.0),
    ])
    .unwrap();
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints);
    task.set_active(true);
    let state = AircraftState::new(ORIGIN, 1_800.0);

    task.update_sample(&state, &polar(), true);
    assert_eq!(alternate_ids(&task), vec![1, 2, 3]);

    task.set_active_task_point(2);
    assert!(!task.update_sample(&state, &polar(), true));
    assert_eq!(task.active_task_point_index(), 2);
    assert_eq!(task.active_task_point().map(|tp| tp.waypoint().id), Some(3));
}

#[test]
fn test_equal_margins_keep_range_query_order() {
    let waypoints = Waypoints::from_waypoints(vec![
        airfield(4, 10_000.0, 0.0, 400.0),
        airfield(3, 12_000.0, 90.0, 400.0),
        airfield(2, 14_000.0, 180.0, 400.0),
        airfield(1, 16_000.0, 270.0, 400.0),
    ])
    .unwrap();
    let solver = MarginSolver(HashMap::from([(1, 100.0), (2, 100.0), (3, 100.0), (4, 100.0)]));
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints).with_solver(&solver);
    let state = AircraftState::new(ORIGIN, 2_000.0);

    task.update_sample(&state, &polar(), true);

    let mut scan_order = Vec::new();
    waypoints.visit_within_range(&ORIGIN, task.abort_range(&state, &polar()), |wp| {
        scan_order.push(wp.id)
    });
    assert_eq!(scan_order, vec![4, 3, 2, 1]);
    assert_eq!(alternate_ids(&task), scan_order, "ties keep scan order");
}

#[test]
fn test_equal_climb_times_keep_range_query_order() {
    let waypoints = Waypoints::from_waypoints(vec![
        field(2, 20_000.0, 0.0, 400.0),
        field(3, 25_000.0, 90.0, 400.0),
        field(1, 30_000.0, 180.0, 400.0),
    ])
    .unwrap();
    let solver = TimedSolver(HashMap::from([(1, 300.0), (2, 300.0), (3, 300.0)]));
    let behaviour = TaskBehaviour::default();
    let mut task = AbortTask::new(&behaviour, &waypoints).with_solver(&solver);

    task.update_sample(&AircraftState::new(ORIGIN, 800.0), &polar(), true);
    assert_eq!(alternate_ids(&task), vec![2, 3, 1]);
}

fn random_field(rng: &mut StdRng, count: u32) -> Waypoints {
    Waypoints::from_waypoints((1..=count).map(|id| {
        let distance = rng.random_range(500.0..90_000.0);
        let bearing = rng.random_range(0.0..360.0);
        let elevation = rng.random_range(200.0..900.0);
        if rng.random_bool(0.4) {
            airfield(id, distance, bearing, elevation)
        } else {
            field(id, distance, bearing, elevation)
        }
    }))
    .unwrap()
}

fn is_sorted_by_key(values: &[f64], descending: bool) -> bool {
    values.windows(2).all(|w| {
        if descending {
            w[0] >= w[1]
        } else {
            w[0] <= w[1]
        }
    })
}

#[test]
fn test_random_fields_respect_list_invariants() {
    let behaviour = TaskBehaviour::default();
    // same MacCready for the safety and the supplied polar keeps the passes
    // distinguishable by their solutions
    let polar = GlidePolar::from_coefficients(0.0016, -0.06, 1.1).with_mc(behaviour.safety_mc);

    for seed in 0..25 {
        let mut rng = StdRng::seed_from_u64(seed);
        let waypoints = random_field(&mut rng, 40);
        let state = AircraftState::new(ORIGIN, rng.random_range(600.0..3_500.0));
        let mut task = AbortTask::new(&behaviour, &waypoints);
        task.update_sample(&state, &polar, true);

        let entries = task.alternates();
        assert!(entries.len() <= MAX_ABORT, "seed {seed}: {} entries", entries.len());

        let unique: HashSet<_> = entries.iter().map(|tp| tp.waypoint().id).collect();
        assert_eq!(unique.len(), entries.len(), "seed {seed}: duplicate entry");

        let range = task.abort_range(&state, &polar);
        let achievable = waypoints
            .iter()
            .filter(|wp| wp.is_landable() && state.location.distance(&wp.location) <= range)
            .filter(|wp| {
                let point = UnorderedTaskPoint::new(Arc::clone(wp), &behaviour);
                MacCreadySolver
                    .solve_remaining(&point, &state, &behaviour.glide, &polar)
                    .is_achievable()
            })
            .count();
        assert_eq!(entries.len(), achievable.min(MAX_ABORT), "seed {seed}");

        let pass1 = entries
            .iter()
            .take_while(|tp| tp.waypoint().is_airport() && tp.solution.is_final_glide())
            .count();
        let pass2 = entries[pass1..]
            .iter()
            .take_while(|tp| tp.solution.is_final_glide())
            .count();
        let (finals, climbs) = entries.split_at(pass1 + pass2);
        assert!(
            climbs.iter().all(|tp| !tp.solution.is_final_glide()),
            "seed {seed}: final glide entry after climb entries"
        );

        let margins = |tps: &[glide_core::AbortTaskPoint]| -> Vec<f64> {
            tps.iter().map(|tp| tp.solution.altitude_difference).collect()
        };
        assert!(is_sorted_by_key(&margins(&finals[..pass1]), true), "seed {seed}");
        assert!(is_sorted_by_key(&margins(&finals[pass1..]), true), "seed {seed}");
        let times: Vec<f64> = climbs.iter().map(|tp| tp.solution.total_time()).collect();
        assert!(is_sorted_by_key(&times, false), "seed {seed}");

        assert_eq!(
            task.has_reachable_landable(),
            !finals.is_empty(),
            "seed {seed}: reachable flag"
        );
        if !entries.is_empty() {
            assert!(task.is_valid_task_point(0));
        }
    }
}
