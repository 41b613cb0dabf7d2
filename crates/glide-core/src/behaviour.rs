//! Task behaviour settings shared by the goto and abort tasks.

use std::env;

use serde::{Deserialize, Serialize};

use crate::polar::GlidePolar;

/// Options passed to the glide solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlideSettings {
    /// Account for the wind component along the track
    pub predict_wind_drift: bool,
}

impl Default for GlideSettings {
    fn default() -> Self {
        Self {
            predict_wind_drift: true,
        }
    }
}

/// Configuration for task behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskBehaviour {
    /// Minimum height above a landing point on arrival (meters)
    pub safety_height_arrival: f64,
    /// Allow goto to waypoints that are not landable
    pub goto_nonlandable: bool,
    /// MacCready setting of the safety polar (m/s)
    pub safety_mc: f64,
    /// Use the current MacCready setting instead of `safety_mc`
    pub safety_mc_use_current: bool,
    pub glide: GlideSettings,
}

impl Default for TaskBehaviour {
    fn default() -> Self {
        Self {
            safety_height_arrival: 300.0,
            goto_nonlandable: true,
            safety_mc: 0.5,
            safety_mc_use_current: false,
            glide: GlideSettings::default(),
        }
    }
}

impl TaskBehaviour {
    /// Defaults overridden by `GLIDE_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut behaviour = Self::default();
        if let Some(v) = env_parse("GLIDE_SAFETY_HEIGHT_ARRIVAL") {
            behaviour.safety_height_arrival = v;
        }
        if let Some(v) = env_parse("GLIDE_GOTO_NONLANDABLE") {
            behaviour.goto_nonlandable = v;
        }
        if let Some(v) = env_parse("GLIDE_SAFETY_MC") {
            behaviour.safety_mc = v;
        }
        if let Some(v) = env_parse("GLIDE_SAFETY_MC_USE_CURRENT") {
            behaviour.safety_mc_use_current = v;
        }
        if let Some(v) = env_parse("GLIDE_PREDICT_WIND_DRIFT") {
            behaviour.glide.predict_wind_drift = v;
        }
        behaviour
    }

    /// Conservative polar used for reachability of landing points.
    pub fn safety_polar(&self, polar: &GlidePolar) -> GlidePolar {
        if self.safety_mc_use_current {
            *polar
        } else {
            polar.with_mc(self.safety_mc)
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}
