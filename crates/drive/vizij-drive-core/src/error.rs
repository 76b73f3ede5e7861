//! Error types for the drive core

use serde::{Deserialize, Serialize};

/// Errors raised by configuration and internal decoding paths.
///
/// The core operations (`plan`, `tick`, `remap`, `restore`) never return these; they fall back
/// to a well-formed curve or pose instead.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DriveError {
    /// Configuration value out of range
    #[error("Invalid config: {reason}")]
    InvalidConfig { reason: String },

    /// Invalid time value
    #[error("Invalid time value: {time}")]
    InvalidTime { time: f64 },

    /// Snapshot decoded but failed validation
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Serialization error
    #[error("Serialization error: {reason}")]
    Serialization { reason: String },
}

impl DriveError {
    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "config",
            Self::InvalidTime { .. } => "validation",
            Self::InvalidSnapshot { .. } => "persistence",
            Self::Serialization { .. } => "serialization",
        }
    }
}

impl From<serde_json::Error> for DriveError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}

impl From<bincode::Error> for DriveError {
    fn from(err: bincode::Error) -> Self {
        Self::Serialization {
            reason: err.to_string(),
        }
    }
}
