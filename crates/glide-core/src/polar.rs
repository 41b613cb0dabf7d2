//! Parabolic glide polar with MacCready, bugs and speed limit settings.
//!
//! The polar models sink rate (m/s, positive down) against true airspeed
//! (m/s) as `w(V) = a·V² + b·V + c`. It is a small `Copy` value so callers
//! can hand the solver an immutable snapshot for one update cycle.

use serde::{Deserialize, Serialize};

/// Default never-exceed cruise speed in m/s (~270 km/h).
pub const DEFAULT_V_MAX: f64 = 75.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlidePolar {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    /// MacCready setting (m/s)
    #[serde(default)]
    pub mc: f64,
    /// Clean ratio, 1 = clean, lower values increase sink
    #[serde(default = "default_bugs")]
    pub bugs: f64,
    #[serde(default = "default_v_max")]
    pub v_max: f64,
}

fn default_bugs() -> f64 {
    1.0
}

fn default_v_max() -> f64 {
    DEFAULT_V_MAX
}

impl GlidePolar {
    pub fn from_coefficients(a: f64, b: f64, c: f64) -> Self {
        Self {
            a,
            b,
            c,
            mc: 0.0,
            bugs: default_bugs(),
            v_max: DEFAULT_V_MAX,
        }
    }

    /// Fit the parabola through three `(speed, sink)` samples.
    ///
    /// Returns `None` if two samples share a speed.
    pub fn from_three_points(points: [(f64, f64); 3]) -> Option<Self> {
        let [(x1, y1), (x2, y2), (x3, y3)] = points;
        let den = (x1 - x2) * (x1 - x3) * (x2 - x3);
        if den.abs() < f64::EPSILON {
            return None;
        }

        let a = (x3 * (y2 - y1) + x2 * (y1 - y3) + x1 * (y3 - y2)) / den;
        let b = (x3 * x3 * (y1 - y2) + x2 * x2 * (y3 - y1) + x1 * x1 * (y2 - y3)) / den;
        let c = (x2 * x3 * (x2 - x3) * y1 + x3 * x1 * (x3 - x1) * y2 + x1 * x2 * (x1 - x2) * y3)
            / den;
        Some(Self::from_coefficients(a, b, c))
    }

    /// A polar that never validates.
    pub fn invalid() -> Self {
        Self::from_coefficients(0.0, 0.0, 0.0)
    }

    pub fn with_mc(mut self, mc: f64) -> Self {
        self.mc = mc;
        self
    }

    pub fn with_bugs(mut self, bugs: f64) -> Self {
        self.bugs = bugs;
        self
    }

    pub fn with_v_max(mut self, v_max: f64) -> Self {
        self.v_max = v_max;
        self
    }

    pub fn mc(&self) -> f64 {
        self.mc
    }

    pub fn is_valid(&self) -> bool {
        let finite = [self.a, self.b, self.c, self.mc, self.bugs, self.v_max]
            .iter()
            .all(|v| v.is_finite());
        finite
            && self.a > 0.0
            && self.c > 0.0
            && self.bugs > 0.0
            && self.bugs <= 1.0
            && self.mc >= 0.0
            && self.v_max > 0.0
            && self.min_sink() > 0.0
            && self.best_ld() > 0.0
    }

    /// Sink rate (m/s, positive down) at `v`.
    pub fn sink_rate(&self, v: f64) -> f64 {
        (self.a * v * v + self.b * v + self.c) / self.bugs
    }

    pub fn v_min_sink(&self) -> f64 {
        (-self.b / (2.0 * self.a)).clamp(0.0, self.v_max)
    }

    pub fn min_sink(&self) -> f64 {
        self.sink_rate(self.v_min_sink())
    }

    pub fn v_best_ld(&self) -> f64 {
        (self.c / self.a).sqrt().min(self.v_max)
    }

    /// Best glide ratio in still air, independent of the MacCready setting.
    pub fn best_ld(&self) -> f64 {
        let v = self.v_best_ld();
        let sink = self.sink_rate(v);
        if sink <= 0.0 {
            return 0.0;
        }
        v / sink
    }

    /// MacCready speed to fly in still air.
    pub fn v_opt(&self) -> f64 {
        ((self.c + self.mc * self.bugs) / self.a)
            .sqrt()
            .min(self.v_max)
    }
}
