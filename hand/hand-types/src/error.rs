//! Error types for hand rig operations.

use crate::bone::BoneId;

/// Errors that can occur while configuring or assembling a hand rig.
///
/// Per-frame anomalies (unknown bones in a command stream, degenerate probe
/// geometry, a zero frame delta) are tolerated rather than reported; this
/// enum covers the failures a caller has to act on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum HandError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A raw index does not name a bone.
    #[error("unknown bone index {0}")]
    UnknownBone(i32),

    /// The rest skeleton is unusable.
    #[error("invalid skeleton: {0}")]
    InvalidSkeleton(String),

    /// A command carried a non-finite value.
    #[error("non-finite command for bone {0}")]
    NonFiniteCommand(BoneId),
}

impl HandError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create an invalid skeleton error.
    #[must_use]
    pub fn invalid_skeleton(msg: impl Into<String>) -> Self {
        Self::InvalidSkeleton(msg.into())
    }
}

/// Result alias for hand rig operations.
pub type Result<T> = std::result::Result<T, HandError>;
