//! Core configuration for vizij-drive-core.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::curve::MIN_ARC_SAMPLES;
use crate::easing::Easing;
use crate::error::DriveError;
use crate::time::MotionTime;

/// What a new target does to a trip that is still running.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterruptPolicy {
    /// Cancel the running trip and plan from wherever the vehicle is now.
    #[default]
    Replace,
    /// Drop new targets until the running trip ends.
    IgnoreWhileRunning,
}

/// Planner geometry, playback timing and interruption behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Distance of the exit control point along the current heading.
    pub exit_distance: f64,
    /// Approach control point distance per degree of turn.
    pub control_scale: f64,
    /// Parametric steps in each arc-length table (floored at 64).
    pub arc_samples: usize,
    /// Length of one trip.
    pub trip_duration_ms: u64,
    pub easing: Easing,
    pub interrupt: InterruptPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exit_distance: 200.0,
            control_scale: 5.0,
            arc_samples: 128,
            trip_duration_ms: 4000,
            easing: Easing::default(),
            interrupt: InterruptPolicy::default(),
        }
    }
}

impl Config {
    /// Parse a (possibly partial) JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, DriveError> {
        let cfg: Config = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values the planner or sampler cannot work with.
    pub fn validate(&self) -> Result<(), DriveError> {
        if !self.exit_distance.is_finite() || self.exit_distance < 0.0 {
            return Err(DriveError::InvalidConfig {
                reason: format!(
                    "exit_distance must be finite and >= 0, got {}",
                    self.exit_distance
                ),
            });
        }
        if !self.control_scale.is_finite() || self.control_scale < 0.0 {
            return Err(DriveError::InvalidConfig {
                reason: format!(
                    "control_scale must be finite and >= 0, got {}",
                    self.control_scale
                ),
            });
        }
        self.easing.validate()
    }

    /// Copy with every invalid field replaced by its default, logging each replacement.
    pub fn sanitized(&self) -> Config {
        let defaults = Config::default();
        let mut cfg = self.clone();
        if !cfg.exit_distance.is_finite() || cfg.exit_distance < 0.0 {
            warn!(
                "exit_distance {} out of range; using {}",
                cfg.exit_distance, defaults.exit_distance
            );
            cfg.exit_distance = defaults.exit_distance;
        }
        if !cfg.control_scale.is_finite() || cfg.control_scale < 0.0 {
            warn!(
                "control_scale {} out of range; using {}",
                cfg.control_scale, defaults.control_scale
            );
            cfg.control_scale = defaults.control_scale;
        }
        if let Err(err) = cfg.easing.validate() {
            warn!("{err}; using {:?}", defaults.easing);
            cfg.easing = defaults.easing;
        }
        cfg
    }

    #[inline]
    pub fn arc_steps(&self) -> usize {
        self.arc_samples.max(MIN_ARC_SAMPLES)
    }

    #[inline]
    pub fn trip_duration(&self) -> MotionTime {
        MotionTime::from_millis_u64(self.trip_duration_ms)
    }
}
