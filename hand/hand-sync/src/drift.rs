//! Wrist drift measurement.

use hand_types::{HandConfig, Pose};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Divergence between the simulated and tracked wrist.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WristOffset {
    /// Distance between the two positions.
    pub position: f64,
    /// Angle between the two orientations, in radians.
    pub rotation: f64,
}

impl WristOffset {
    /// Offset of `simulated` from `tracked`.
    #[must_use]
    pub fn between(simulated: &Pose, tracked: &Pose) -> Self {
        Self {
            position: simulated.distance_to(tracked),
            rotation: simulated.angle_to(tracked),
        }
    }

    /// Rotational offset in degrees.
    #[must_use]
    pub fn rotation_degrees(&self) -> f64 {
        self.rotation.to_degrees()
    }
}

/// Why the rig was snapped back to its tracked pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ResyncReason {
    /// The wrist body drifted too far from its target.
    PositionDrift,
    /// The wrist body turned too far from its target.
    RotationDrift,
}

/// Decides when wrist drift warrants a resynchronization.
///
/// Each threshold is independent; `None` disables that check. An offset
/// must strictly exceed its threshold to trigger.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriftMonitor {
    max_position: Option<f64>,
    max_rotation: Option<f64>,
}

impl DriftMonitor {
    /// Monitor that never triggers.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Monitor with the thresholds enabled in `config`.
    #[must_use]
    pub fn from_config(config: &HandConfig) -> Self {
        Self {
            max_position: config.reset_on_position_offset.then_some(config.max_position_offset),
            max_rotation: config.reset_on_rotation_offset.then_some(config.max_rotation_offset),
        }
    }

    /// Positional threshold, if enabled.
    #[must_use]
    pub fn max_position(&self) -> Option<f64> {
        self.max_position
    }

    /// Rotational threshold in radians, if enabled.
    #[must_use]
    pub fn max_rotation(&self) -> Option<f64> {
        self.max_rotation
    }

    /// Reason to resynchronize, if `offset` breaks an enabled threshold.
    ///
    /// Positional drift wins when both are exceeded.
    #[must_use]
    pub fn check(&self, offset: &WristOffset) -> Option<ResyncReason> {
        if self.max_position.is_some_and(|max| offset.position > max) {
            return Some(ResyncReason::PositionDrift);
        }
        if self.max_rotation.is_some_and(|max| offset.rotation > max) {
            return Some(ResyncReason::RotationDrift);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Point3, UnitQuaternion, Vector3};

    #[test]
    fn test_offset_between_poses() {
        let tracked = Pose::identity();
        let simulated = Pose::from_position_rotation(
            Point3::new(0.0, 3.0, 4.0),
            UnitQuaternion::from_axis_angle(&Vector3::x_axis(), 0.25),
        );
        let offset = WristOffset::between(&simulated, &tracked);

        assert_relative_eq!(offset.position, 5.0, epsilon = 1e-12);
        assert_relative_eq!(offset.rotation, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_disabled_by_default() {
        let monitor = DriftMonitor::from_config(&HandConfig::default());
        let huge = WristOffset {
            position: 1e6,
            rotation: 3.0,
        };
        assert_eq!(monitor.check(&huge), None);
        assert_eq!(DriftMonitor::disabled().check(&huge), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let monitor = DriftMonitor::from_config(&HandConfig::default().with_position_reset(0.1));
        let at = WristOffset {
            position: 0.1,
            rotation: 0.0,
        };
        let over = WristOffset {
            position: 0.100_001,
            rotation: 0.0,
        };
        assert_eq!(monitor.check(&at), None);
        assert_eq!(monitor.check(&over), Some(ResyncReason::PositionDrift));
    }

    #[test]
    fn test_flags_are_independent() {
        let config = HandConfig::default().with_rotation_reset_degrees(10.0);
        let monitor = DriftMonitor::from_config(&config);
        assert_eq!(monitor.max_position(), None);

        let moved = WristOffset {
            position: 50.0,
            rotation: 0.0,
        };
        let turned = WristOffset {
            position: 0.0,
            rotation: 20f64.to_radians(),
        };
        assert_eq!(monitor.check(&moved), None);
        assert_eq!(monitor.check(&turned), Some(ResyncReason::RotationDrift));
    }

    #[test]
    fn test_nan_offset_never_triggers() {
        let config = HandConfig::default().with_position_reset(0.1).with_rotation_reset(0.1);
        let monitor = DriftMonitor::from_config(&config);
        let nan = WristOffset {
            position: f64::NAN,
            rotation: f64::NAN,
        };
        assert_eq!(monitor.check(&nan), None);
    }
}
