//! Orientation adapter: keeps the vehicle's pose meaningful across frame rotations and
//! suspend/resume.
//!
//! A rotation change is looked up in a transition table keyed by (old rotation, new rotation).
//! Each transition class has one position formula written against the *prior* frame extent
//! `W × H`:
//!
//! | transition   | position         | heading |
//! |--------------|------------------|---------|
//! | Identity     | `(x, y)`         | `+0`    |
//! | Quarter      | `(y, W − x)`     | `+π/2`  |
//! | Half         | `(W − x, H − y)` | `+π`    |
//! | ThreeQuarter | `(H − y, x)`     | `−π/2`  |
//!
//! Quarter turns swap the axes, so a 90°→0° change is not the same formula as 180°→90° even
//! though both land on a "0°-class" layout; the table keeps those apart. When the new frame
//! is also resized, the rotated position is scaled per axis.
//!
//! Snapshots are bincode, fixed-width little-endian, prefixed with a format version. Anything
//! that fails to decode or validate restores the default pose (frame center, heading 0).

use std::f64::consts::{FRAC_PI_2, PI};

use bincode::Options;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::data::{FrameGeometry, Point, Pose, Rotation};
use crate::error::DriveError;

const SNAPSHOT_VERSION: u8 = 1;
const SNAPSHOT_LIMIT: u64 = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    Identity,
    Quarter,
    Half,
    ThreeQuarter,
}

use Transition::{Half, Identity, Quarter, ThreeQuarter};

/// Rows: old rotation; columns: new rotation (0°, 90°, 180°, 270°).
const TRANSITIONS: [[Transition; 4]; 4] = [
    [Identity, Quarter, Half, ThreeQuarter],
    [ThreeQuarter, Identity, Quarter, Half],
    [Half, ThreeQuarter, Identity, Quarter],
    [Quarter, Half, ThreeQuarter, Identity],
];

impl Transition {
    #[inline]
    pub fn between(old: Rotation, new: Rotation) -> Self {
        TRANSITIONS[old.index()][new.index()]
    }

    #[inline]
    pub fn inverse(self) -> Self {
        match self {
            Identity => Identity,
            Quarter => ThreeQuarter,
            Half => Half,
            ThreeQuarter => Quarter,
        }
    }

    /// Whether width and height trade places.
    #[inline]
    pub fn swaps_axes(self) -> bool {
        matches!(self, Quarter | ThreeQuarter)
    }

    #[inline]
    pub fn heading_delta(self) -> f64 {
        match self {
            Identity => 0.0,
            Quarter => FRAC_PI_2,
            Half => PI,
            ThreeQuarter => -FRAC_PI_2,
        }
    }

    /// Position in the rotated frame, given the prior frame's `width × height`.
    #[inline]
    pub fn map_point(self, p: Point, width: f64, height: f64) -> Point {
        match self {
            Identity => p,
            Quarter => Point::new(p.y, width - p.x),
            Half => Point::new(width - p.x, height - p.y),
            ThreeQuarter => Point::new(height - p.y, p.x),
        }
    }
}

/// Wire layout of a persisted pose.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
struct PersistedPose {
    version: u8,
    x: f64,
    y: f64,
    heading: f64,
    rotation: Rotation,
    width: u32,
    height: u32,
}

fn codec() -> impl Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .with_little_endian()
        .reject_trailing_bytes()
        .with_limit(SNAPSHOT_LIMIT)
}

/// Tracks the current frame and translates poses into it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationAdapter {
    frame: FrameGeometry,
}

impl OrientationAdapter {
    pub fn new(frame: FrameGeometry) -> Self {
        Self { frame }
    }

    #[inline]
    pub fn frame(&self) -> FrameGeometry {
        self.frame
    }

    /// Adopt `new` as the current frame and return `pose` expressed in it.
    pub fn frame_changed(&mut self, pose: Pose, new: FrameGeometry) -> Pose {
        let old = self.frame;
        self.frame = new;
        let remapped = Self::remap(pose, old, new);
        debug!(
            "frame {}x{}@{} -> {}x{}@{}: pose ({:.2}, {:.2}) -> ({:.2}, {:.2})",
            old.width,
            old.height,
            old.rotation.degrees(),
            new.width,
            new.height,
            new.rotation.degrees(),
            pose.x,
            pose.y,
            remapped.x,
            remapped.y
        );
        remapped
    }

    /// Express `pose` from frame `old` in frame `new`.
    pub fn remap(pose: Pose, old: FrameGeometry, new: FrameGeometry) -> Pose {
        let transition = Transition::between(old.rotation, new.rotation);
        let (w, h) = (old.width as f64, old.height as f64);
        let mut p = transition.map_point(pose.position(), w, h);

        let (rotated_w, rotated_h) = if transition.swaps_axes() {
            (h, w)
        } else {
            (w, h)
        };
        let (new_w, new_h) = (new.width as f64, new.height as f64);
        let resized = rotated_w != new_w || rotated_h != new_h;
        if resized && rotated_w > 0.0 && rotated_h > 0.0 && new_w > 0.0 && new_h > 0.0 {
            p.x *= new_w / rotated_w;
            p.y *= new_h / rotated_h;
        }

        Pose::at(p, pose.heading + transition.heading_delta())
    }

    /// Encode `pose` and the frame it lives in.
    pub fn encode(pose: Pose, frame: FrameGeometry) -> Result<Vec<u8>, DriveError> {
        let record = PersistedPose {
            version: SNAPSHOT_VERSION,
            x: pose.x,
            y: pose.y,
            heading: pose.heading,
            rotation: frame.rotation,
            width: frame.width,
            height: frame.height,
        };
        Ok(codec().serialize(&record)?)
    }

    /// Decode and validate a payload produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<(Pose, FrameGeometry), DriveError> {
        let record: PersistedPose = codec().deserialize(bytes)?;
        if record.version != SNAPSHOT_VERSION {
            return Err(DriveError::InvalidSnapshot {
                reason: format!("unsupported snapshot version {}", record.version),
            });
        }
        if !(record.x.is_finite() && record.y.is_finite() && record.heading.is_finite()) {
            return Err(DriveError::InvalidSnapshot {
                reason: "non-finite pose".to_string(),
            });
        }
        if record.width == 0 || record.height == 0 {
            return Err(DriveError::InvalidSnapshot {
                reason: format!("empty frame {}x{}", record.width, record.height),
            });
        }
        Ok((
            Pose::new(record.x, record.y, record.heading),
            FrameGeometry::new(record.width, record.height, record.rotation),
        ))
    }

    /// Persistable bytes for `pose` in `frame`. Empty if encoding fails, which restores as the
    /// default pose.
    pub fn snapshot(pose: Pose, frame: FrameGeometry) -> Vec<u8> {
        Self::encode(pose, frame).unwrap_or_else(|err| {
            warn!("pose snapshot failed ({}): {}", err.category(), err);
            Vec::new()
        })
    }

    /// Pose and frame stored in `bytes`, or the default pose in the current frame when the
    /// payload is absent or unusable.
    pub fn restore(&self, bytes: Option<&[u8]>) -> (Pose, FrameGeometry) {
        let Some(bytes) = bytes else {
            debug!("no pose snapshot; using frame center");
            return (self.frame.default_pose(), self.frame);
        };
        match Self::decode(bytes) {
            Ok(restored) => restored,
            Err(err) => {
                warn!(
                    "discarding pose snapshot ({}): {}; using frame center",
                    err.category(),
                    err
                );
                (self.frame.default_pose(), self.frame)
            }
        }
    }

    /// Restore a snapshot and bring it into the current frame.
    pub fn resume(&self, bytes: Option<&[u8]>) -> Pose {
        let (pose, stored) = self.restore(bytes);
        Self::remap(pose, stored, self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn portrait() -> FrameGeometry {
        FrameGeometry::new(400, 800, Rotation::Deg0)
    }

    fn rotated(frame: FrameGeometry, to: Rotation) -> FrameGeometry {
        if Transition::between(frame.rotation, to).swaps_axes() {
            FrameGeometry::new(frame.height, frame.width, to)
        } else {
            FrameGeometry::new(frame.width, frame.height, to)
        }
    }

    #[test]
    fn quarter_turn_from_portrait() {
        let pose = Pose::new(100.0, 200.0, 0.0);
        let new = FrameGeometry::new(800, 400, Rotation::Deg90);
        let remapped = OrientationAdapter::remap(pose, portrait(), new);
        assert_eq!(remapped, Pose::new(200.0, 300.0, FRAC_PI_2));
    }

    #[test]
    fn table_matches_rotation_difference() {
        for old in Rotation::ALL {
            for new in Rotation::ALL {
                let steps = (4 + new.index() - old.index()) % 4;
                let expected = [Identity, Quarter, Half, ThreeQuarter][steps];
                assert_eq!(Transition::between(old, new), expected, "{old:?} -> {new:?}");
                assert_eq!(
                    Transition::between(new, old),
                    expected.inverse(),
                    "{new:?} -> {old:?}"
                );
            }
        }
    }

    #[test]
    fn every_transition_round_trips() {
        let pose = Pose::new(123.5, 654.25, -2.5);
        for from in Rotation::ALL {
            let start = FrameGeometry::new(400, 800, from);
            for to in Rotation::ALL {
                let end = rotated(start, to);
                let there = OrientationAdapter::remap(pose, start, end);
                let back = OrientationAdapter::remap(there, end, start);
                assert_relative_eq!(back.x, pose.x, epsilon = 1e-9);
                assert_relative_eq!(back.y, pose.y, epsilon = 1e-9);
                assert_relative_eq!(back.heading, pose.heading, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn half_turn_flips_both_axes() {
        let pose = Pose::new(100.0, 200.0, FRAC_PI_2);
        let remapped = OrientationAdapter::remap(
            pose,
            FrameGeometry::new(400, 800, Rotation::Deg90),
            FrameGeometry::new(400, 800, Rotation::Deg270),
        );
        assert_eq!(remapped.position(), Point::new(300.0, 600.0));
        assert_relative_eq!(remapped.heading, -FRAC_PI_2);
    }

    #[test]
    fn resize_scales_position() {
        let pose = Pose::new(100.0, 200.0, 0.5);
        let remapped = OrientationAdapter::remap(
            pose,
            portrait(),
            FrameGeometry::new(800, 1600, Rotation::Deg0),
        );
        assert_eq!(remapped, Pose::new(200.0, 400.0, 0.5));
    }

    #[test]
    fn frame_changed_tracks_current_frame() {
        let mut adapter = OrientationAdapter::new(portrait());
        let landscape = FrameGeometry::new(800, 400, Rotation::Deg270);
        let pose = adapter.frame_changed(Pose::new(100.0, 200.0, 0.0), landscape);
        assert_eq!(adapter.frame(), landscape);
        assert_eq!(pose.position(), Point::new(600.0, 100.0));
        assert_relative_eq!(pose.heading, -FRAC_PI_2);
    }

    #[test]
    fn snapshot_round_trips_bit_exact() {
        let pose = Pose::new(0.1 + 0.2, -1.0 / 3.0, -2.9);
        let frame = FrameGeometry::new(1080, 2340, Rotation::Deg180);
        let bytes = OrientationAdapter::snapshot(pose, frame);
        let adapter = OrientationAdapter::new(portrait());
        let (restored, restored_frame) = adapter.restore(Some(bytes.as_slice()));
        assert_eq!(restored.x.to_bits(), pose.x.to_bits());
        assert_eq!(restored.y.to_bits(), pose.y.to_bits());
        assert_eq!(restored.heading.to_bits(), pose.heading.to_bits());
        assert_eq!(restored_frame, frame);
    }

    #[test]
    fn missing_or_corrupt_snapshots_fall_back_to_center() {
        let adapter = OrientationAdapter::new(portrait());
        let fallback = (Pose::new(200.0, 400.0, 0.0), portrait());
        let good = OrientationAdapter::snapshot(Pose::new(1.0, 2.0, 0.3), portrait());

        assert_eq!(adapter.restore(None), fallback);
        assert_eq!(adapter.restore(Some(&[0u8; 0][..])), fallback);
        assert_eq!(adapter.restore(Some(&good[..good.len() - 1])), fallback);

        let mut trailing = good.clone();
        trailing.push(0);
        assert_eq!(adapter.restore(Some(trailing.as_slice())), fallback);

        let mut wrong_version = good.clone();
        wrong_version[0] = 9;
        assert_eq!(adapter.restore(Some(wrong_version.as_slice())), fallback);

        // rotation id sits after version + three f64s
        let mut bad_rotation = good.clone();
        bad_rotation[25] = 45;
        bad_rotation[26] = 0;
        assert_eq!(adapter.restore(Some(bad_rotation.as_slice())), fallback);
    }

    #[test]
    fn invalid_values_are_rejected_on_decode() {
        let not_a_pose = Pose {
            x: f64::NAN,
            y: 0.0,
            heading: 0.0,
        };
        let nan = OrientationAdapter::snapshot(not_a_pose, portrait());
        assert!(matches!(
            OrientationAdapter::decode(&nan),
            Err(DriveError::InvalidSnapshot { .. })
        ));
        let empty = OrientationAdapter::snapshot(
            Pose::new(1.0, 1.0, 0.0),
            FrameGeometry::new(0, 800, Rotation::Deg0),
        );
        assert!(OrientationAdapter::decode(&empty).is_err());
    }

    #[test]
    fn resume_remaps_into_current_frame() {
        let saved = OrientationAdapter::snapshot(Pose::new(100.0, 200.0, 0.0), portrait());
        let adapter = OrientationAdapter::new(FrameGeometry::new(800, 400, Rotation::Deg90));
        assert_eq!(
            adapter.resume(Some(saved.as_slice())),
            Pose::new(200.0, 300.0, FRAC_PI_2)
        );
        assert_eq!(adapter.resume(None), Pose::new(400.0, 200.0, 0.0));
    }
}
