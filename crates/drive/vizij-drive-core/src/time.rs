//! Monotonic time for motion sessions.
//!
//! Timestamps and durations share one integer-nanosecond type so that tick arithmetic is exact
//! and ordered. `instant::Instant` backs the wall clock so the same code runs under wasm.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::DriveError;

/// A monotonic timestamp or a duration, in nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Eq, Ord, Hash, Serialize, Deserialize, Default)]
pub struct MotionTime(u64);

impl MotionTime {
    /// Create from nanoseconds
    #[inline]
    pub fn from_nanos(nanoseconds: u64) -> Self {
        Self(nanoseconds)
    }

    /// Create from milliseconds
    #[inline]
    pub fn from_millis(milliseconds: f64) -> Result<Self, DriveError> {
        Self::from_seconds(milliseconds / 1000.0)
    }

    /// Create from seconds; negative and non-finite values are rejected.
    #[inline]
    pub fn from_seconds(seconds: f64) -> Result<Self, DriveError> {
        if seconds < 0.0 || !seconds.is_finite() {
            return Err(DriveError::InvalidTime { time: seconds });
        }
        Ok(Self((seconds * 1_000_000_000.0) as u64))
    }

    /// Whole milliseconds, infallible.
    #[inline]
    pub fn from_millis_u64(milliseconds: u64) -> Self {
        Self(milliseconds.saturating_mul(1_000_000))
    }

    #[inline]
    pub fn zero() -> Self {
        Self(0)
    }

    #[inline]
    pub fn as_seconds(&self) -> f64 {
        self.0 as f64 / 1_000_000_000.0
    }

    #[inline]
    pub fn as_millis(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    #[inline]
    pub fn as_nanos(&self) -> u64 {
        self.0
    }

    /// Time elapsed since `earlier`, zero if `earlier` lies in the future.
    #[inline]
    pub fn saturating_since(&self, earlier: MotionTime) -> MotionTime {
        Self(self.0.saturating_sub(earlier.0))
    }

    /// Ratio `self / total` clamped to [0, 1]. A zero total counts as already finished.
    #[inline]
    pub fn fraction_of(&self, total: MotionTime) -> f64 {
        if total.0 == 0 {
            return 1.0;
        }
        (self.0 as f64 / total.0 as f64).clamp(0.0, 1.0)
    }
}

impl std::ops::Add for MotionTime {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::ops::AddAssign for MotionTime {
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl std::ops::Sub for MotionTime {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl From<Duration> for MotionTime {
    fn from(duration: Duration) -> Self {
        MotionTime::from_nanos(duration.as_nanos().min(u64::MAX as u128) as u64)
    }
}

impl From<MotionTime> for Duration {
    fn from(time: MotionTime) -> Self {
        Duration::from_nanos(time.0)
    }
}

/// Monotonic time source supplying per-tick timestamps.
pub trait Clock {
    fn now(&self) -> MotionTime;
}

/// Wall clock measured from its own creation.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: instant::Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: instant::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> MotionTime {
        self.origin.elapsed().into()
    }
}

/// Host-driven clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: MotionTime) {
        self.nanos.set(self.nanos.get().saturating_add(by.as_nanos()));
    }

    /// Move forward by whole milliseconds.
    pub fn advance_millis(&self, millis: u64) {
        self.advance(MotionTime::from_millis_u64(millis));
    }

    /// Jump to `at`; earlier readings are ignored to keep the clock monotonic.
    pub fn set(&self, at: MotionTime) {
        self.nanos.set(self.nanos.get().max(at.as_nanos()));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> MotionTime {
        MotionTime::from_nanos(self.nanos.get())
    }
}
