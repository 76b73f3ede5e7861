//! Vizij Drive Core (engine-agnostic)
//!
//! Plans a single cubic Bezier trip from a vehicle's pose to a chosen point and plays it back
//! with eased, arc-length-uniform motion. Hosts feed it frame ticks and frame-geometry changes;
//! it hands back `(position, heading)` samples and keeps the pose consistent across rotations
//! and suspend/resume.
//!
//! Layers, leaves first:
//! - [`data`]: `Point`, `Pose`, `BezierCurve`, `FrameGeometry`
//! - [`planner`]: `PathPlanner::plan`
//! - [`sampler`]: `MotionSampler` sessions driven by `tick(now)`
//! - [`orientation`]: rotation remapping and snapshot/restore
//! - [`driver`]: a facade wiring the three together

pub mod config;
pub mod curve;
pub mod data;
pub mod driver;
pub mod easing;
pub mod error;
pub mod events;
pub mod ids;
pub mod orientation;
pub mod planner;
pub mod sampler;
pub mod time;

// Re-exports for consumers (adapters)
pub use config::{Config, InterruptPolicy};
pub use curve::ArcLengthTable;
pub use data::{normalize_heading, BezierCurve, FrameGeometry, Point, Pose, Rotation};
pub use driver::Driver;
pub use easing::Easing;
pub use error::DriveError;
pub use events::{EventLog, MotionEvent};
pub use ids::SessionId;
pub use orientation::{OrientationAdapter, Transition};
pub use planner::PathPlanner;
pub use sampler::{AnimationSession, MotionListener, MotionSampler, Sample, SessionState};
pub use time::{Clock, ManualClock, MotionTime, SystemClock};

/// Drive core result type
pub type Result<T> = core::result::Result<T, DriveError>;
