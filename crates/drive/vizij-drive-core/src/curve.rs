//! Cubic Bezier evaluation and arc-length lookup.
//!
//! A raw sweep over `t` moves fast along long, straight control legs and slow around tight
//! turns. `ArcLengthTable` samples the curve once into a cumulative-length polyline so the
//! sampler can ask for "the `t` at 40% of the distance" instead.

use serde::{Deserialize, Serialize};

use crate::data::{BezierCurve, Point};

/// Fewest parametric steps an arc-length table is built with.
pub const MIN_ARC_SAMPLES: usize = 64;

/// Tangents shorter than this carry no usable direction.
const TANGENT_EPS: f64 = 1e-9;

/// Cubic Bezier basis function
#[inline]
fn cubic_bezier(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    u * u * u * p0 + 3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t * p3
}

#[inline]
fn cubic_bezier_derivative(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * (p1 - p0) + 6.0 * u * t * (p2 - p1) + 3.0 * t * t * (p3 - p2)
}

impl BezierCurve {
    /// Position at parameter `t` (clamped to [0, 1]).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(
            cubic_bezier(self.p0.x, self.p1.x, self.p2.x, self.p3.x, t),
            cubic_bezier(self.p0.y, self.p1.y, self.p2.y, self.p3.y, t),
        )
    }

    /// First derivative at `t` (clamped to [0, 1]).
    #[inline]
    pub fn tangent_at(&self, t: f64) -> Point {
        let t = t.clamp(0.0, 1.0);
        Point::new(
            cubic_bezier_derivative(self.p0.x, self.p1.x, self.p2.x, self.p3.x, t),
            cubic_bezier_derivative(self.p0.y, self.p1.y, self.p2.y, self.p3.y, t),
        )
    }

    /// Direction of travel at `t`, or `None` where the tangent vanishes.
    #[inline]
    pub fn heading_at(&self, t: f64) -> Option<f64> {
        let tangent = self.tangent_at(t);
        if tangent.length() <= TANGENT_EPS {
            return None;
        }
        Some(crate::data::normalize_heading(tangent.bearing()))
    }
}

/// One row of the arc-length table.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArcSample {
    pub t: f64,
    /// Polyline length from `t = 0` up to this row.
    pub length: f64,
}

/// Cumulative polyline length of a curve at uniform parametric steps.
///
/// Rows are ordered by `t` and `length` never decreases. Built once per curve.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ArcLengthTable {
    rows: Vec<ArcSample>,
}

impl ArcLengthTable {
    /// Subdivide `curve` into `steps` (at least [`MIN_ARC_SAMPLES`]) uniform `t` steps.
    pub fn build(curve: &BezierCurve, steps: usize) -> Self {
        let steps = steps.max(MIN_ARC_SAMPLES);
        let mut rows = Vec::with_capacity(steps + 1);
        let mut prev = curve.p0;
        let mut total = 0.0;
        rows.push(ArcSample { t: 0.0, length: 0.0 });
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let p = curve.point_at(t);
            total += prev.distance(p);
            rows.push(ArcSample { t, length: total });
            prev = p;
        }
        Self { rows }
    }

    #[inline]
    pub fn rows(&self) -> &[ArcSample] {
        &self.rows
    }

    #[inline]
    pub fn total_length(&self) -> f64 {
        self.rows.last().map(|r| r.length).unwrap_or(0.0)
    }

    /// Parameter `t` at which `distance` along the polyline is reached.
    ///
    /// Binary search for the bracketing rows, then linear interpolation inside the bracket.
    /// Distances outside [0, total] clamp to the curve ends; a zero-length curve maps every
    /// distance to `t = 0`.
    pub fn param_at_length(&self, distance: f64) -> f64 {
        let total = self.total_length();
        if total <= 0.0 || distance <= 0.0 || !distance.is_finite() {
            return 0.0;
        }
        if distance >= total {
            return 1.0;
        }
        let hi = self.rows.partition_point(|r| r.length < distance);
        if hi == 0 {
            return 0.0;
        }
        let (left, right) = (self.rows[hi - 1], self.rows[hi]);
        let span = right.length - left.length;
        if span <= 0.0 {
            return right.t;
        }
        let local = (distance - left.length) / span;
        left.t + (right.t - left.t) * local
    }
}
