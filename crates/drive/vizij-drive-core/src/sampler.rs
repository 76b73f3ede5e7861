//! Motion sampler: plays one curve back over wall-clock time.
//!
//! Per tick:
//! 1. `elapsed` = now − first tick of the session (never decreases)
//! 2. `fraction` = ease(elapsed / duration)
//! 3. `t` = arc-length inverse of `fraction * total_length`
//! 4. emit `B(t)` and the tangent heading at `t`
//!
//! Lifecycle: `Idle -> Running -> Completed | Cancelled`; a new `start` replaces whatever came
//! before. Exactly one of `on_complete` / `on_cancel` fires per session.

use std::fmt;

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::curve::ArcLengthTable;
use crate::data::{BezierCurve, Point, Pose};
use crate::easing::Easing;
use crate::ids::{IdAllocator, SessionId};
use crate::time::MotionTime;

/// Receives a session's lifecycle. All methods default to no-ops.
pub trait MotionListener {
    fn on_start(&mut self, _session: SessionId, _curve: &BezierCurve) {}
    fn on_sample(&mut self, _sample: &Sample) {}
    fn on_complete(&mut self, _session: SessionId, _pose: Pose) {}
    fn on_cancel(&mut self, _session: SessionId, _pose: Pose) {}
}

impl MotionListener for () {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

impl SessionState {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

/// One emitted `(position, heading)`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub session: SessionId,
    pub position: Point,
    /// Radians in (−π, π].
    pub heading: f64,
    /// Curve parameter the position was evaluated at.
    pub t: f64,
    /// Eased fraction of the trip length covered.
    pub fraction: f64,
    pub elapsed: MotionTime,
}

impl Sample {
    #[inline]
    pub fn pose(&self) -> Pose {
        Pose::at(self.position, self.heading)
    }
}

/// A single playback of one curve.
#[derive(Clone, Debug)]
pub struct AnimationSession {
    id: SessionId,
    curve: BezierCurve,
    duration: MotionTime,
    elapsed: MotionTime,
    state: SessionState,
    table: ArcLengthTable,
    /// Timestamp of the first tick; the session's clock origin.
    started_at: Option<MotionTime>,
    fraction: f64,
}

impl AnimationSession {
    fn new(id: SessionId, curve: BezierCurve, duration: MotionTime, arc_steps: usize) -> Self {
        Self {
            id,
            table: ArcLengthTable::build(&curve, arc_steps),
            curve,
            duration,
            elapsed: MotionTime::zero(),
            state: SessionState::Running,
            started_at: None,
            fraction: 0.0,
        }
    }

    #[inline]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[inline]
    pub fn curve(&self) -> &BezierCurve {
        &self.curve
    }

    #[inline]
    pub fn duration(&self) -> MotionTime {
        self.duration
    }

    #[inline]
    pub fn elapsed(&self) -> MotionTime {
        self.elapsed
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[inline]
    pub fn arc_length_table(&self) -> &ArcLengthTable {
        &self.table
    }

    /// Eased fraction emitted by the latest tick.
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

/// Drives at most one running session for one vehicle.
pub struct MotionSampler {
    easing: Easing,
    arc_steps: usize,
    ids: IdAllocator,
    session: Option<AnimationSession>,
    listener: Option<Box<dyn MotionListener>>,
    /// Last emitted pose, or the initial pose before anything was emitted.
    pose: Pose,
}

impl fmt::Debug for MotionSampler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionSampler")
            .field("easing", &self.easing)
            .field("arc_steps", &self.arc_steps)
            .field("session", &self.session)
            .field("pose", &self.pose)
            .finish_non_exhaustive()
    }
}

impl MotionSampler {
    /// A timing curve with steep ends is replaced by the default easing.
    pub fn new(initial: Pose, cfg: &Config) -> Self {
        let easing = match cfg.easing.validate() {
            Ok(()) => cfg.easing,
            Err(err) => {
                warn!("{err}; easing with {:?}", Easing::default());
                Easing::default()
            }
        };
        Self {
            easing,
            arc_steps: cfg.arc_steps(),
            ids: IdAllocator::new(),
            session: None,
            listener: None,
            pose: initial,
        }
    }

    /// Begin playing `curve` over `duration`.
    ///
    /// A running session is cancelled first, so its `on_cancel` fires before this session's
    /// `on_start`. The new session's clock starts at its first `tick`.
    pub fn start(
        &mut self,
        curve: BezierCurve,
        duration: MotionTime,
        mut listener: Box<dyn MotionListener>,
    ) -> SessionId {
        self.cancel();

        let id = self.ids.alloc_session();
        let session = AnimationSession::new(id, curve, duration, self.arc_steps);
        debug!(
            "motion session {:?} started: {:.1} units over {:.0} ms",
            id,
            session.table.total_length(),
            duration.as_millis()
        );
        listener.on_start(id, &session.curve);
        self.session = Some(session);
        self.listener = Some(listener);
        id
    }

    /// Stop the running session without completing it. No-op when nothing is running.
    pub fn cancel(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if !session.state.is_running() {
            return;
        }
        session.state = SessionState::Cancelled;
        debug!(
            "motion session {:?} cancelled after {:.0} ms",
            session.id,
            session.elapsed.as_millis()
        );
        if let Some(mut listener) = self.listener.take() {
            listener.on_cancel(session.id, self.pose);
        }
    }

    /// Advance the running session to `now` and emit its sample.
    ///
    /// Returns `None` when no session is running. The tick that reaches the duration emits
    /// exactly `p3` and completes the session.
    pub fn tick(&mut self, now: MotionTime) -> Option<Sample> {
        let session = self
            .session
            .as_mut()
            .filter(|session| session.state.is_running())?;

        let started_at = *session.started_at.get_or_insert(now);
        let elapsed = now.saturating_since(started_at).max(session.elapsed);
        session.elapsed = elapsed;

        let finished = elapsed >= session.duration;
        let (t, fraction, position) = if finished {
            (1.0, 1.0, session.curve.p3)
        } else {
            let fraction = self
                .easing
                .apply(elapsed.fraction_of(session.duration))
                .max(session.fraction);
            let t = session
                .table
                .param_at_length(fraction * session.table.total_length());
            (t, fraction, session.curve.point_at(t))
        };
        session.fraction = fraction;

        let heading = session.curve.heading_at(t).unwrap_or(self.pose.heading);
        let sample = Sample {
            session: session.id,
            position,
            heading,
            t,
            fraction,
            elapsed,
        };
        self.pose = sample.pose();
        trace!(
            "motion session {:?} t={:.4} fraction={:.4} at ({:.2}, {:.2})",
            sample.session,
            t,
            fraction,
            position.x,
            position.y
        );

        if finished {
            session.state = SessionState::Completed;
            debug!(
                "motion session {:?} completed at ({:.2}, {:.2})",
                sample.session, position.x, position.y
            );
        }

        if let Some(listener) = self.listener.as_mut() {
            listener.on_sample(&sample);
        }
        if finished {
            if let Some(mut listener) = self.listener.take() {
                listener.on_complete(sample.session, self.pose);
            }
        }
        Some(sample)
    }

    /// Pose of the latest emitted sample.
    #[inline]
    pub fn current_pose(&self) -> Pose {
        self.pose
    }

    /// Replace the current pose, e.g. after a frame remap or a restore.
    ///
    /// Refused (returns `false`) while a session is running; its samples own the pose.
    pub fn rebase(&mut self, pose: Pose) -> bool {
        if self.is_running() {
            return false;
        }
        self.pose = pose;
        true
    }

    #[inline]
    pub fn state(&self) -> SessionState {
        self.session
            .as_ref()
            .map(|session| session.state)
            .unwrap_or(SessionState::Idle)
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.state().is_running()
    }

    /// Latest session, running or finished.
    #[inline]
    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }
}
