//! Driver: the host-facing facade over planner, sampler and orientation adapter.
//!
//! Methods:
//! - new, with_pose, resume (construction)
//! - drive_to (plan + start), tick, cancel
//! - frame_changed (rotation/resize), suspend (snapshot)

use log::debug;

use crate::config::{Config, InterruptPolicy};
use crate::data::{FrameGeometry, Point, Pose};
use crate::ids::SessionId;
use crate::orientation::OrientationAdapter;
use crate::planner::PathPlanner;
use crate::sampler::{MotionListener, MotionSampler, Sample, SessionState};
use crate::time::{Clock, MotionTime};

/// One vehicle on one frame.
#[derive(Debug)]
pub struct Driver {
    cfg: Config,
    planner: PathPlanner,
    sampler: MotionSampler,
    orientation: OrientationAdapter,
}

impl Driver {
    /// Vehicle parked at the frame center, facing heading 0.
    pub fn new(cfg: Config, frame: FrameGeometry) -> Self {
        Self::with_pose(cfg, frame, frame.default_pose())
    }

    /// Out-of-range config fields fall back to their defaults.
    pub fn with_pose(cfg: Config, frame: FrameGeometry, pose: Pose) -> Self {
        let cfg = cfg.sanitized();
        Self {
            planner: PathPlanner::from_config(&cfg),
            sampler: MotionSampler::new(pose, &cfg),
            orientation: OrientationAdapter::new(frame),
            cfg,
        }
    }

    /// Rebuild from a snapshot taken by [`suspend`](Self::suspend), translated into `frame`.
    /// Missing or unusable snapshots park the vehicle at the frame center.
    pub fn resume(cfg: Config, frame: FrameGeometry, snapshot: Option<&[u8]>) -> Self {
        let pose = OrientationAdapter::new(frame).resume(snapshot);
        Self::with_pose(cfg, frame, pose)
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Plan a trip from the current pose to `target` and start playing it.
    ///
    /// Under [`InterruptPolicy::Replace`] a running trip is cancelled and the new one begins
    /// at the last emitted pose. Under [`InterruptPolicy::IgnoreWhileRunning`] the target is
    /// dropped and `None` returned.
    pub fn drive_to(
        &mut self,
        target: Point,
        listener: Box<dyn MotionListener>,
    ) -> Option<SessionId> {
        if self.sampler.is_running() && self.cfg.interrupt == InterruptPolicy::IgnoreWhileRunning {
            debug!(
                "ignoring target ({:.2}, {:.2}) while a trip is running",
                target.x, target.y
            );
            return None;
        }
        self.sampler.cancel();
        let curve = self.planner.plan(self.sampler.current_pose(), target);
        Some(self.sampler.start(curve, self.cfg.trip_duration(), listener))
    }

    #[inline]
    pub fn tick(&mut self, now: MotionTime) -> Option<Sample> {
        self.sampler.tick(now)
    }

    /// Tick at the clock's current reading.
    #[inline]
    pub fn tick_with(&mut self, clock: &dyn Clock) -> Option<Sample> {
        self.sampler.tick(clock.now())
    }

    #[inline]
    pub fn cancel(&mut self) {
        self.sampler.cancel();
    }

    #[inline]
    pub fn current_pose(&self) -> Pose {
        self.sampler.current_pose()
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.sampler.state()
    }

    #[inline]
    pub fn sampler(&self) -> &MotionSampler {
        &self.sampler
    }

    #[inline]
    pub fn frame(&self) -> FrameGeometry {
        self.orientation.frame()
    }

    /// The containing surface was rotated or resized.
    ///
    /// A running trip is cancelled (its curve lives in the old frame) and the vehicle's pose is
    /// carried into `new`. Re-reporting the current geometry changes nothing.
    pub fn frame_changed(&mut self, new: FrameGeometry) -> Pose {
        if new == self.orientation.frame() {
            return self.sampler.current_pose();
        }
        self.sampler.cancel();
        let pose = self
            .orientation
            .frame_changed(self.sampler.current_pose(), new);
        self.sampler.rebase(pose);
        pose
    }

    /// Persistable snapshot of the current pose and frame.
    pub fn suspend(&self) -> Vec<u8> {
        OrientationAdapter::snapshot(self.current_pose(), self.orientation.frame())
    }
}
