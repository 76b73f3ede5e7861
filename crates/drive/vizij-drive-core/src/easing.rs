//! Time easing for motion sessions.
//!
//! Every curve maps [0, 1] onto [0, 1] monotonically, with `ease(0) = 0`, `ease(1) = 1` and a
//! flat slope at both ends so the vehicle pulls away and pulls in smoothly.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::DriveError;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Easing {
    /// `cos((x + 1)π) / 2 + 0.5`
    #[default]
    AccelerateDecelerate,
    /// `x²(3 − 2x)`
    Smoothstep,
    /// CSS-style timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
    CubicBezier { x1: f64, y1: f64, x2: f64, y2: f64 },
}

impl Easing {
    /// The stock `ease-in-out` timing curve.
    pub const EASE_IN_OUT: Easing = Easing::CubicBezier {
        x1: 0.42,
        y1: 0.0,
        x2: 0.58,
        y2: 1.0,
    };

    /// Reject timing curves that leave or arrive with a nonzero slope.
    ///
    /// A `CubicBezier` is flat at both ends only when its first handle lies on the x axis
    /// (`y1 == 0`, `x1 > 0`) and its second on the `y = 1` line (`y2 == 1`, `x2 < 1`).
    pub fn validate(&self) -> Result<(), DriveError> {
        let Easing::CubicBezier { x1, y1, x2, y2 } = *self else {
            return Ok(());
        };
        if !(0.0..=1.0).contains(&x1) || !(0.0..=1.0).contains(&x2) {
            return Err(DriveError::InvalidConfig {
                reason: format!("cubic_bezier x control points must lie in [0,1], got {x1}, {x2}"),
            });
        }
        if y1 != 0.0 || x1 <= 0.0 || y2 != 1.0 || x2 >= 1.0 {
            return Err(DriveError::InvalidConfig {
                reason: format!(
                    "cubic_bezier ({x1}, {y1}, {x2}, {y2}) must start and end with zero slope"
                ),
            });
        }
        Ok(())
    }

    /// Eased fraction for a linear time fraction `x` (clamped to [0, 1]).
    pub fn apply(&self, x: f64) -> f64 {
        if x.is_nan() {
            return 0.0;
        }
        let x = x.clamp(0.0, 1.0);
        let eased = match *self {
            Easing::AccelerateDecelerate => ((x + 1.0) * PI).cos() / 2.0 + 0.5,
            Easing::Smoothstep => x * x * (3.0 - 2.0 * x),
            Easing::CubicBezier { x1, y1, x2, y2 } => bezier_ease_t(x, x1, y1, x2, y2),
        };
        eased.clamp(0.0, 1.0)
    }
}

/// Cubic Bezier basis function with fixed endpoints 0 and 1.
#[inline]
fn unit_bezier(p1: f64, p2: f64, t: f64) -> f64 {
    let u = 1.0 - t;
    3.0 * u * u * t * p1 + 3.0 * u * t * t * p2 + t * t * t
}

/// Given control points (x1, y1, x2, y2) and an input t in [0,1],
/// compute the eased y by inverting the x bezier via binary search.
fn bezier_ease_t(t: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    // Monotonic X in [0,1] assumed for x1/x2 ∈ [0,1]
    let mut lo = 0.0f64;
    let mut hi = 1.0f64;
    let mut mid = t;
    for _ in 0..48 {
        let x = unit_bezier(x1, x2, mid);
        if (x - t).abs() < 1e-10 {
            break;
        }
        if x < t {
            lo = mid;
        } else {
            hi = mid;
        }
        mid = 0.5 * (lo + hi);
    }
    unit_bezier(y1, y2, mid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ALL: [Easing; 3] = [
        Easing::AccelerateDecelerate,
        Easing::Smoothstep,
        Easing::EASE_IN_OUT,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.apply(-3.0), 0.0, "{easing:?}");
            assert_eq!(easing.apply(7.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn curves_are_monotonic_and_symmetric() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=200 {
                let v = easing.apply(i as f64 / 200.0);
                assert!(v >= prev, "{easing:?} decreased at step {i}");
                prev = v;
            }
            assert_relative_eq!(easing.apply(0.5), 0.5, epsilon = 1e-6);
        }
    }

    #[test]
    fn slopes_flatten_at_both_ends() {
        let h = 1e-4;
        for easing in ALL {
            let start = easing.apply(h) / h;
            let end = (1.0 - easing.apply(1.0 - h)) / h;
            assert!(start < 0.01, "{easing:?} start slope {start}");
            assert!(end < 0.01, "{easing:?} end slope {end}");
        }
    }

    #[test]
    fn validate_rejects_steep_ends() {
        for easing in ALL {
            assert!(easing.validate().is_ok(), "{easing:?}");
        }
        let steep = [
            (0.0, 0.0, 1.0, 1.0),
            (0.1, 0.9, 0.9, 0.1),
            (0.0, 0.0, 0.58, 1.0),
            (0.42, 0.0, 1.0, 1.0),
            (0.42, 0.2, 0.58, 1.0),
        ];
        for (x1, y1, x2, y2) in steep {
            let easing = Easing::CubicBezier { x1, y1, x2, y2 };
            assert!(
                matches!(easing.validate(), Err(DriveError::InvalidConfig { .. })),
                "{easing:?} accepted"
            );
        }
    }

    #[test]
    fn deserializes_tagged_json() {
        let e: Easing = serde_json::from_str(r#"{"kind":"smoothstep"}"#).unwrap();
        assert_eq!(e, Easing::Smoothstep);
        let e: Easing =
            serde_json::from_str(r#"{"kind":"cubic_bezier","x1":0.42,"y1":0,"x2":0.58,"y2":1}"#)
                .unwrap();
        assert_eq!(e, Easing::EASE_IN_OUT);
    }
}
