//! CLI tool to watch landing alternates during a simulated glide.
//!
//! Flies a straight descending glide over a waypoint field and prints the
//! ranked alternates after every sample.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use glide_cli::sim::{
    create_ridge_scenario, load_waypoints, polar_from_coefficients, random_landables, FlightPath,
    GlidePath,
};
use glide_core::{
    GeoPoint, GlideComputerEvent, TaskBehaviour, TaskEventObserver, TaskManager, Waypoints,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulate a glide and print the landing alternates at each step
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Waypoint JSON file ({"home": id, "waypoints": [...]})
    #[arg(long, conflicts_with = "ridge")]
    waypoints: Option<PathBuf>,

    /// Use the built-in ridge scenario
    #[arg(long)]
    ridge: bool,

    /// Number of random landables when no waypoint file is given
    #[arg(long, default_value_t = 40)]
    random: u32,

    /// Radius of the random field in meters
    #[arg(long, default_value_t = 60_000.0)]
    radius: f64,

    /// Seed of the random field
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Start latitude
    #[arg(long, default_value_t = 46.8)]
    lat: f64,

    /// Start longitude
    #[arg(long, default_value_t = 7.2)]
    lon: f64,

    /// Start altitude in meters
    #[arg(long, default_value_t = 2_000.0)]
    altitude: f64,

    /// Track in degrees
    #[arg(long, default_value_t = 90.0)]
    heading: f64,

    /// Polar coefficient a (sink = a*v^2 + b*v + c)
    #[arg(long, default_value_t = 0.0016)]
    polar_a: f64,

    /// Polar coefficient b
    #[arg(long, default_value_t = -0.06, allow_hyphen_values = true)]
    polar_b: f64,

    /// Polar coefficient c
    #[arg(long, default_value_t = 1.1)]
    polar_c: f64,

    /// MacCready setting in m/s
    #[arg(long, default_value_t = 1.0)]
    mc: f64,

    /// Number of samples
    #[arg(long, default_value_t = 20)]
    steps: u32,

    /// Seconds between samples
    #[arg(long, default_value_t = 60.0)]
    interval: f64,

    /// Terrain altitude the glide ends at
    #[arg(long, default_value_t = 400.0)]
    floor: f64,

    /// Print one JSON object per step instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct StepReport {
    step: u32,
    time_s: f64,
    altitude_m: f64,
    reachable: bool,
    active: usize,
    alternates: Vec<AlternateReport>,
}

#[derive(Serialize)]
struct AlternateReport {
    id: u32,
    name: String,
    distance_m: f64,
    arrival_margin_m: f64,
    final_glide: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("alternates=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let start = GeoPoint::new(args.lat, args.lon);
    let polar = polar_from_coefficients(args.polar_a, args.polar_b, args.polar_c, args.mc)
        .context("building glide polar")?;

    let (waypoints, path): (Waypoints, GlidePath) = if args.ridge {
        let scenario = create_ridge_scenario(start, &polar)?;
        tracing::info!(scenario = %scenario.name, "Using built-in scenario");
        (scenario.waypoints, scenario.path)
    } else {
        let waypoints = match &args.waypoints {
            Some(file) => load_waypoints(file)
                .with_context(|| format!("loading waypoints from {}", file.display()))?,
            None => {
                let mut rng = StdRng::seed_from_u64(args.seed);
                random_landables(&mut rng, start, args.random, args.radius)?
            }
        };
        let path = GlidePath::from_polar(start, args.heading, args.altitude, &polar, args.floor);
        (waypoints, path)
    };

    let behaviour = TaskBehaviour::from_env();
    let mut manager = TaskManager::new(&behaviour, &waypoints);
    manager.set_glide_polar(polar);
    manager.abort();

    tracing::info!(
        waypoints = waypoints.len(),
        best_ld = polar.best_ld(),
        speed_mps = path.get_speed_mps(),
        "Starting glide"
    );

    let mut observer = TaskEventObserver::new();
    let mut on_event = |event: GlideComputerEvent| match event {
        GlideComputerEvent::AlternateChanged {
            waypoint: Some(waypoint),
        } => tracing::info!(waypoint = %waypoint.name, id = waypoint.id, "Best alternate changed"),
        GlideComputerEvent::AlternateChanged { waypoint: None } => {
            tracing::warn!("No alternates left")
        }
    };

    for step in 0..args.steps {
        let t = f64::from(step) * args.interval;
        let state = path.state_at(t);
        if manager.update(&state, true) {
            tracing::debug!(step, "Active alternate switched");
        }
        observer.check(&manager, &mut on_event);

        let report = StepReport {
            step,
            time_s: t,
            altitude_m: state.altitude_m,
            reachable: manager.has_reachable_landable(),
            active: manager.active_task_point_index(),
            alternates: manager
                .alternates()
                .iter()
                .map(|tp| AlternateReport {
                    id: tp.waypoint().id,
                    name: tp.waypoint().name.clone(),
                    distance_m: tp.solution.vector.distance_m,
                    arrival_margin_m: tp.solution.altitude_difference,
                    final_glide: tp.solution.is_final_glide(),
                })
                .collect(),
        };

        if args.json {
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_report(&report);
        }

        if !state.flying {
            tracing::info!(step, "Landed");
            break;
        }
    }

    Ok(())
}

fn print_report(report: &StepReport) {
    println!(
        "[{:3}] t={:>5.0}s alt={:>5.0}m {} alternates{}",
        report.step,
        report.time_s,
        report.altitude_m,
        report.alternates.len(),
        if report.reachable { "" } else { " (none in final glide)" }
    );
    for (i, alt) in report.alternates.iter().enumerate() {
        let marker = if i == report.active { '*' } else { ' ' };
        println!(
            "    {marker}{i:2} {:<16} {:>6.1} km  {:>+6.0} m  {}",
            alt.name,
            alt.distance_m / 1000.0,
            alt.arrival_margin_m,
            if alt.final_glide { "glide" } else { "climb" }
        );
    }
}
