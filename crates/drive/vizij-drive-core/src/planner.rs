//! Trip planning: one cubic Bezier from the vehicle's pose to a target point.
//!
//! Control points:
//! - `p0`: current position
//! - `p1`: `exit_distance` ahead along the current heading, so the vehicle leaves straight
//! - `p2`: off to the side of the shorter turn, pushed further out the more the target sits
//!   away from the heading (`control_scale` per degree)
//! - `p3`: the target
//!
//! Angles use the screen convention of [`crate::data`]: y is flipped before `atan2`.

use crate::config::Config;
use crate::data::{BezierCurve, Point, Pose};

/// Vectors shorter than this are treated as zero-length.
const LENGTH_EPS: f64 = 1e-9;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPlanner {
    exit_distance: f64,
    control_scale: f64,
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Degrees in [0, 360).
#[inline]
fn positive_degrees(radians: f64) -> f64 {
    let deg = radians.to_degrees();
    if deg < 0.0 {
        deg + 360.0
    } else {
        deg
    }
}

/// Direction of the approach control point, in radians.
///
/// Picks ±90° off the current heading toward the side of the shorter turn to the target.
/// `heading_deg` and `bearing_deg` are both in [0, 360).
fn approach_angle(heading_deg: f64, bearing_deg: f64) -> f64 {
    let diff = heading_deg - bearing_deg;
    let mut candidate = if diff.abs() <= 180.0 {
        if diff <= 0.0 {
            heading_deg + 90.0
        } else {
            heading_deg - 90.0
        }
    } else if diff <= 0.0 {
        heading_deg - 90.0
    } else {
        heading_deg + 90.0
    };
    if candidate > 180.0 {
        candidate -= 360.0;
    } else if candidate <= -180.0 {
        candidate += 360.0;
    }
    candidate.to_radians()
}

impl PathPlanner {
    pub fn new(exit_distance: f64, control_scale: f64) -> Self {
        Self {
            exit_distance,
            control_scale,
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.exit_distance, cfg.control_scale)
    }

    #[inline]
    pub fn exit_distance(&self) -> f64 {
        self.exit_distance
    }

    #[inline]
    pub fn control_scale(&self) -> f64 {
        self.control_scale
    }

    /// Plan a trip from `current` to `target`.
    ///
    /// Never fails: a target on top of the vehicle, a zero exit leg or non-finite input
    /// yields a degenerate curve with every control point at the current position.
    pub fn plan(&self, current: Pose, target: Point) -> BezierCurve {
        let p0 = current.position();
        if !current.is_finite() || !target.is_finite() {
            return BezierCurve::degenerate(p0);
        }

        let p1 = p0 + Point::unit(current.heading) * self.exit_distance;
        let exit = p1 - p0;
        let reach = target - p0;
        let (exit_len, reach_len) = (exit.length(), reach.length());
        if exit_len <= LENGTH_EPS || reach_len <= LENGTH_EPS || !p1.is_finite() {
            return BezierCurve::degenerate(p0);
        }

        let heading_deg = positive_degrees(current.heading);
        let bearing_deg = positive_degrees(reach.bearing());
        let result_angle = approach_angle(heading_deg, bearing_deg);

        let cos_theta = (exit.dot(reach) / (exit_len * reach_len)).clamp(-1.0, 1.0);
        let theta_deg = cos_theta.acos().to_degrees();

        let p2 = p0 + Point::unit(result_angle) * (self.control_scale * theta_deg);

        BezierCurve {
            p0,
            p1,
            p2,
            p3: target,
        }
    }
}
