//! Configuration for the hand synchronization engine.
//!
//! [`HandConfig`] controls drift recovery, the fingertip collision probes and
//! the strength of the finger joint drives.
//!
//! # Example
//!
//! ```
//! use hand_types::HandConfig;
//!
//! let config = HandConfig::default()
//!     .with_position_reset(0.25)
//!     .with_rotation_reset_degrees(30.0)
//!     .with_tip_collision_distance(0.015);
//!
//! assert!(config.validate().is_ok());
//! assert!(config.reset_on_position_offset);
//! ```

use nalgebra::Vector3;

use crate::error::{HandError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a hand rig.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandConfig {
    /// Snap back to the tracked pose when the wrist drifts too far.
    pub reset_on_position_offset: bool,
    /// Wrist positional drift that triggers a snap (meters).
    pub max_position_offset: f64,
    /// Snap back to the tracked pose when the wrist twists too far.
    pub reset_on_rotation_offset: bool,
    /// Wrist rotational drift that triggers a snap (radians).
    pub max_rotation_offset: f64,
    /// Cast fingertip probes against `tip_ray_axis` instead of along it.
    pub flip_tip_rays: bool,
    /// Length of each fingertip probe (meters).
    pub tip_collision_distance: f64,
    /// Probe direction in the fingertip's local frame, out along the bone by default.
    pub tip_ray_axis: Vector3<f64>,
    /// Spring gain of the finger joint drives.
    pub finger_force: f64,
    /// Force limit of the finger joint drives.
    pub finger_force_limit: f64,
}

impl Default for HandConfig {
    fn default() -> Self {
        Self {
            reset_on_position_offset: false,
            max_position_offset: 2.0,
            reset_on_rotation_offset: false,
            max_rotation_offset: 45.0_f64.to_radians(),
            flip_tip_rays: false,
            tip_collision_distance: 0.02,
            tip_ray_axis: Vector3::x(),
            finger_force: 1000.0,
            finger_force_limit: f64::INFINITY,
        }
    }
}

impl HandConfig {
    /// Create a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable positional drift recovery with the given threshold (meters).
    #[must_use]
    pub fn with_position_reset(mut self, max_offset: f64) -> Self {
        self.reset_on_position_offset = true;
        self.max_position_offset = max_offset;
        self
    }

    /// Enable rotational drift recovery with the given threshold (radians).
    #[must_use]
    pub fn with_rotation_reset(mut self, max_offset: f64) -> Self {
        self.reset_on_rotation_offset = true;
        self.max_rotation_offset = max_offset;
        self
    }

    /// Enable rotational drift recovery with the given threshold (degrees).
    #[must_use]
    pub fn with_rotation_reset_degrees(self, max_offset: f64) -> Self {
        self.with_rotation_reset(max_offset.to_radians())
    }

    /// Reverse the fingertip probe direction.
    #[must_use]
    pub fn with_flipped_tip_rays(mut self, flip: bool) -> Self {
        self.flip_tip_rays = flip;
        self
    }

    /// Set the fingertip probe length.
    #[must_use]
    pub fn with_tip_collision_distance(mut self, distance: f64) -> Self {
        self.tip_collision_distance = distance;
        self
    }

    /// Set the fingertip probe direction in the tip's local frame.
    #[must_use]
    pub fn with_tip_ray_axis(mut self, axis: Vector3<f64>) -> Self {
        self.tip_ray_axis = axis;
        self
    }

    /// Set the finger joint drive gain.
    #[must_use]
    pub fn with_finger_force(mut self, force: f64) -> Self {
        self.finger_force = force;
        self
    }

    /// Probe direction in the tip's local frame, flip applied.
    #[must_use]
    pub fn local_probe_direction(&self) -> Vector3<f64> {
        if self.flip_tip_rays {
            -self.tip_ray_axis
        } else {
            self.tip_ray_axis
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidConfig`] for negative or non-finite
    /// thresholds, probe lengths and drive gains.
    pub fn validate(&self) -> Result<()> {
        if !self.max_position_offset.is_finite() || self.max_position_offset < 0.0 {
            return Err(HandError::invalid_config(format!(
                "max_position_offset must be finite and non-negative, got {}",
                self.max_position_offset
            )));
        }
        if !self.max_rotation_offset.is_finite() || self.max_rotation_offset < 0.0 {
            return Err(HandError::invalid_config(format!(
                "max_rotation_offset must be finite and non-negative, got {}",
                self.max_rotation_offset
            )));
        }
        if !self.tip_collision_distance.is_finite() || self.tip_collision_distance < 0.0 {
            return Err(HandError::invalid_config(format!(
                "tip_collision_distance must be finite and non-negative, got {}",
                self.tip_collision_distance
            )));
        }
        if !self.tip_ray_axis.iter().all(|c| c.is_finite()) {
            return Err(HandError::invalid_config("tip_ray_axis must be finite"));
        }
        if !self.finger_force.is_finite() || self.finger_force < 0.0 {
            return Err(HandError::invalid_config(format!(
                "finger_force must be finite and non-negative, got {}",
                self.finger_force
            )));
        }
        // An infinite limit is the usual setting; only NaN and negatives are rejected.
        if self.finger_force_limit.is_nan() || self.finger_force_limit < 0.0 {
            return Err(HandError::invalid_config(format!(
                "finger_force_limit must be non-negative, got {}",
                self.finger_force_limit
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let config = HandConfig::default();
        assert!(!config.reset_on_position_offset);
        assert!(!config.reset_on_rotation_offset);
        assert_eq!(config.max_position_offset, 2.0);
        assert_relative_eq!(config.max_rotation_offset.to_degrees(), 45.0, epsilon = 1e-10);
        assert!(config.finger_force_limit.is_infinite());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = HandConfig::new()
            .with_position_reset(0.1)
            .with_rotation_reset_degrees(10.0)
            .with_finger_force(250.0)
            .with_flipped_tip_rays(true);

        assert!(config.reset_on_position_offset);
        assert!(config.reset_on_rotation_offset);
        assert_eq!(config.max_position_offset, 0.1);
        assert_relative_eq!(config.max_rotation_offset, 10.0_f64.to_radians());
        assert_eq!(config.finger_force, 250.0);
        assert_eq!(config.local_probe_direction(), -Vector3::x());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(HandConfig::new().with_tip_collision_distance(-0.1).validate().is_err());
        assert!(HandConfig::new().with_finger_force(f64::NAN).validate().is_err());
        assert!(HandConfig::new().with_position_reset(f64::INFINITY).validate().is_err());
        assert!(
            HandConfig::new()
                .with_tip_ray_axis(Vector3::new(f64::NAN, 0.0, 1.0))
                .validate()
                .is_err()
        );

        let mut config = HandConfig::new();
        config.finger_force_limit = -1.0;
        assert!(matches!(config.validate(), Err(HandError::InvalidConfig(_))));
    }
}
