//! Value types shared by the planner, sampler and orientation adapter.
//!
//! Coordinates are screen-style: x grows rightward, y grows downward. Angles follow the
//! mathematical convention with y flipped, so heading 0 faces +x and heading π/2 faces up
//! (toward smaller y).

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Map any angle into (−π, π]. Non-finite input collapses to 0.
///
/// Angles already in range come back bit-for-bit unchanged.
#[inline]
pub fn normalize_heading(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    if angle > -PI && angle <= PI {
        return angle;
    }
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// A position on the frame.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` in screen coordinates.
    #[inline]
    pub fn unit(angle: f64) -> Self {
        Self::new(angle.cos(), -angle.sin())
    }

    #[inline]
    pub fn dot(self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Screen-convention angle of this vector, y flipped.
    #[inline]
    pub fn bearing(self) -> f64 {
        (-self.y).atan2(self.x)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Position plus heading of the vehicle.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    /// Radians in (−π, π].
    pub heading: f64,
}

impl Pose {
    /// Build a pose, normalizing the heading.
    #[inline]
    pub fn new(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x,
            y,
            heading: normalize_heading(heading),
        }
    }

    #[inline]
    pub fn at(position: Point, heading: f64) -> Self {
        Self::new(position.x, position.y, heading)
    }

    #[inline]
    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.heading.is_finite()
    }
}

/// Cubic Bezier from the vehicle's position (`p0`) to the requested target (`p3`).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BezierCurve {
    pub p0: Point,
    pub p1: Point,
    pub p2: Point,
    pub p3: Point,
}

impl BezierCurve {
    /// All four control points at `at`.
    #[inline]
    pub fn degenerate(at: Point) -> Self {
        Self {
            p0: at,
            p1: at,
            p2: at,
            p3: at,
        }
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.p0 == self.p1 && self.p1 == self.p2 && self.p2 == self.p3
    }

    #[inline]
    pub fn points(&self) -> [Point; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }
}

/// Absolute rotation of the containing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Deg0,
        Rotation::Deg90,
        Rotation::Deg180,
        Rotation::Deg270,
    ];

    #[inline]
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    #[inline]
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Row/column index into the transition table.
    #[inline]
    pub(crate) fn index(self) -> usize {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 1,
            Self::Deg180 => 2,
            Self::Deg270 => 3,
        }
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(degrees: u16) -> Result<Self, Self::Error> {
        Rotation::from_degrees(degrees).ok_or_else(|| format!("unsupported rotation {degrees}"))
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> u16 {
        rotation.degrees()
    }
}

/// Snapshot of the surface the vehicle is drawn within.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
    pub rotation: Rotation,
}

impl FrameGeometry {
    #[inline]
    pub fn new(width: u32, height: u32, rotation: Rotation) -> Self {
        Self {
            width,
            height,
            rotation,
        }
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.width as f64 / 2.0, self.height as f64 / 2.0)
    }

    /// Pose used when nothing better is known: frame center, heading 0.
    #[inline]
    pub fn default_pose(&self) -> Pose {
        Pose::at(self.center(), 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normalize_keeps_range() {
        assert_eq!(normalize_heading(0.0), 0.0);
        assert_eq!(normalize_heading(PI), PI);
        assert_relative_eq!(normalize_heading(-PI), PI);
        assert_relative_eq!(normalize_heading(3.0 * PI / 2.0), -PI / 2.0);
        assert_relative_eq!(normalize_heading(-5.0 * PI / 2.0), -PI / 2.0);
        assert_eq!(normalize_heading(f64::NAN), 0.0);
        assert_eq!(normalize_heading(f64::INFINITY), 0.0);
    }

    #[test]
    fn unit_points_up_for_quarter_turn() {
        let up = Point::unit(PI / 2.0);
        assert_relative_eq!(up.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(up.y, -1.0);
        assert_relative_eq!(up.bearing(), PI / 2.0);
    }

    #[test]
    fn rotation_rejects_unknown_degrees() {
        assert_eq!(Rotation::try_from(270), Ok(Rotation::Deg270));
        assert!(Rotation::try_from(45).is_err());
        let json = serde_json::to_string(&Rotation::Deg180).unwrap();
        assert_eq!(json, "180");
        assert!(serde_json::from_str::<Rotation>("30").is_err());
    }

    #[test]
    fn default_pose_is_frame_center() {
        let frame = FrameGeometry::new(400, 800, Rotation::Deg0);
        assert_eq!(frame.default_pose(), Pose::new(200.0, 400.0, 0.0));
    }
}
