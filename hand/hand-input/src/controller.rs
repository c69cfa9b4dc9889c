//! Hand emulation from a handheld controller.
//!
//! Three channels drive the hand: the thumb rest (near-touch), the index
//! trigger and the grip. Each channel is smoothed, spread over three
//! knuckles and scaled per knuckle, so a half-pressed grip curls the
//! proximal phalanges fully and leaves the distal ones open.

use hand_types::{BoneId, BoneValueSource, BoneValues, UnitQuaternion, Vector3};

use crate::smoothing::{Smoother, spread_value};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Thumb knuckle scale when the hand closes into a fist.
pub const THUMB_CLOSE: [f64; 3] = [0.4, 0.8, 0.6];
/// Thumb knuckle scale when the hand closes into a pinch.
pub const THUMB_PINCH: [f64; 3] = [0.1, 0.4, 0.6];
/// Index knuckle scale when the hand closes into a pinch.
pub const INDEX_PINCH: [f64; 3] = [0.3, 0.8, 0.7];

const THUMB: [BoneId; 3] = [BoneId::Thumb1, BoneId::Thumb2, BoneId::Thumb3];
const INDEX: [BoneId; 3] = [BoneId::Index1, BoneId::Index2, BoneId::Index3];
const GRIP: [[BoneId; 3]; 3] = [
    [BoneId::Middle1, BoneId::Middle2, BoneId::Middle3],
    [BoneId::Ring1, BoneId::Ring2, BoneId::Ring3],
    [BoneId::Pinky1, BoneId::Pinky2, BoneId::Pinky3],
];

/// One reading of the controller's finger sensors.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerState {
    /// Thumb resting on (or hovering over) the face buttons.
    pub thumb_near_touch: bool,
    /// Index finger resting on (or hovering over) the trigger.
    pub index_near_touch: bool,
    /// Index trigger travel in `[0, 1]`.
    pub index_trigger: f64,
    /// Grip trigger travel in `[0, 1]`.
    pub grip: f64,
}

/// Settings for [`ControllerEmulation`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ControllerConfig {
    /// Curl the index from near-touch instead of trigger travel.
    pub index_from_near_touch: bool,
    /// Close thumb and index into a pinch instead of a fist.
    pub pinch_on_close: bool,
    /// Thumb channel smoothing.
    pub thumb_smoothing: Smoother,
    /// Index channel smoothing.
    pub index_smoothing: Smoother,
    /// Grip channel smoothing.
    pub grip_smoothing: Smoother,
    /// Orientation commanded for the wrist.
    pub wrist_rotation: UnitQuaternion<f64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            index_from_near_touch: false,
            pinch_on_close: false,
            thumb_smoothing: Smoother::default(),
            index_smoothing: Smoother::default(),
            grip_smoothing: Smoother::default(),
            wrist_rotation: UnitQuaternion::identity(),
        }
    }
}

impl ControllerConfig {
    /// Curl the index from near-touch.
    #[must_use]
    pub fn with_index_from_near_touch(mut self, enabled: bool) -> Self {
        self.index_from_near_touch = enabled;
        self
    }

    /// Close into a pinch.
    #[must_use]
    pub fn with_pinch_on_close(mut self, enabled: bool) -> Self {
        self.pinch_on_close = enabled;
        self
    }

    /// Disable smoothing on every channel.
    #[must_use]
    pub fn without_smoothing(mut self) -> Self {
        self.thumb_smoothing = Smoother::disabled();
        self.index_smoothing = Smoother::disabled();
        self.grip_smoothing = Smoother::disabled();
        self
    }

    /// Wrist orientation from Euler angles about `X`, `Y` and `Z`, in degrees.
    ///
    /// Rotations are applied about the fixed axes in the order `Z`, `X`,
    /// `Y`, so the result is `Ry * Rx * Rz`. This is not nalgebra's
    /// roll-pitch-yaw order; the two agree only for single-axis inputs.
    #[must_use]
    pub fn with_wrist_euler_degrees(mut self, x: f64, y: f64, z: f64) -> Self {
        let about = |axis: &nalgebra::Unit<Vector3<f64>>, degrees: f64| {
            UnitQuaternion::from_axis_angle(axis, degrees.to_radians())
        };
        self.wrist_rotation =
            about(&Vector3::y_axis(), y) * about(&Vector3::x_axis(), x) * about(&Vector3::z_axis(), z);
        self
    }

    fn thumb_weights(&self) -> [f64; 3] {
        if self.pinch_on_close { THUMB_PINCH } else { THUMB_CLOSE }
    }

    fn index_weights(&self) -> [f64; 3] {
        if self.pinch_on_close { INDEX_PINCH } else { [1.0; 3] }
    }
}

/// A [`BoneValueSource`] emulating finger curl from controller sensors.
///
/// The host writes the latest [`ControllerState`] with
/// [`set_state`](Self::set_state) before the rig pulls values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControllerEmulation {
    config: ControllerConfig,
    state: ControllerState,
}

impl ControllerEmulation {
    /// Create an emulation with the given settings.
    #[must_use]
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            config,
            state: ControllerState::default(),
        }
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Latest sensor reading.
    #[must_use]
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Replace the sensor reading.
    pub fn set_state(&mut self, state: ControllerState) {
        self.state = state;
    }

    /// Raw channel values before smoothing: thumb, index, grip.
    fn raw_channels(&self) -> (f64, f64, f64) {
        let flag = |on: bool| if on { 1.0 } else { 0.0 };
        let index = if self.config.index_from_near_touch {
            flag(self.state.index_near_touch)
        } else {
            self.state.index_trigger
        };
        (flag(self.state.thumb_near_touch), index, self.state.grip)
    }
}

impl BoneValueSource for ControllerEmulation {
    fn bone_values(&mut self, dt: f64) -> BoneValues {
        let (thumb, index, grip) = self.raw_channels();
        let thumb = self.config.thumb_smoothing.step(thumb, dt);
        let index = self.config.index_smoothing.step(index, dt);
        let grip = self.config.grip_smoothing.step(grip, dt);

        let thumb = spread_value::<3>(thumb);
        let index = spread_value::<3>(index);
        let grip = spread_value::<3>(grip);
        let thumb_weights = self.config.thumb_weights();
        let index_weights = self.config.index_weights();

        let mut values = BoneValues::new().with_orientation(BoneId::WristRoot, self.config.wrist_rotation);
        for k in 0..3 {
            values = values
                .with_flex(THUMB[k], thumb[k] * thumb_weights[k])
                .with_flex(INDEX[k], index[k] * index_weights[k]);
            for digit in &GRIP {
                values = values.with_flex(digit[k], grip[k]);
            }
        }
        values
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use hand_types::BoneCommand;

    fn flex(values: &BoneValues, bone: BoneId) -> f64 {
        match values.get(bone) {
            Some(BoneCommand::Flex(v)) => *v,
            other => panic!("expected flex for {bone}, got {other:?}"),
        }
    }

    fn raw() -> ControllerEmulation {
        ControllerEmulation::new(ControllerConfig::default().without_smoothing())
    }

    #[test]
    fn test_idle_controller_opens_hand() {
        let values = raw().bone_values(0.01);

        assert_eq!(values.len(), 16);
        assert!(values.get(BoneId::WristRoot).is_some_and(BoneCommand::is_orientation));
        for bone in [BoneId::Thumb1, BoneId::Index3, BoneId::Ring2, BoneId::Pinky1] {
            assert_eq!(flex(&values, bone), 0.0);
        }
        assert!(values.get(BoneId::Pinky0).is_none());
        assert!(values.get(BoneId::Thumb0).is_none());
    }

    #[test]
    fn test_full_grip_closes_fist() {
        let mut source = raw();
        source.set_state(ControllerState {
            thumb_near_touch: true,
            index_near_touch: true,
            index_trigger: 1.0,
            grip: 1.0,
        });
        let values = source.bone_values(0.01);

        for (k, bone) in THUMB.iter().enumerate() {
            assert_relative_eq!(flex(&values, *bone), THUMB_CLOSE[k], epsilon = 1e-12);
        }
        for bone in INDEX.iter().chain(GRIP.iter().flatten()) {
            assert_eq!(flex(&values, *bone), 1.0);
        }
    }

    #[test]
    fn test_pinch_weights() {
        let mut source = ControllerEmulation::new(
            ControllerConfig::default().without_smoothing().with_pinch_on_close(true),
        );
        source.set_state(ControllerState {
            thumb_near_touch: true,
            index_trigger: 1.0,
            ..ControllerState::default()
        });
        let values = source.bone_values(0.01);

        assert_relative_eq!(flex(&values, BoneId::Thumb1), 0.1, epsilon = 1e-12);
        assert_relative_eq!(flex(&values, BoneId::Index2), 0.8, epsilon = 1e-12);
        assert_eq!(flex(&values, BoneId::Middle1), 0.0);
    }

    #[test]
    fn test_half_grip_spreads_over_knuckles() {
        let mut source = raw();
        source.set_state(ControllerState {
            grip: 0.5,
            ..ControllerState::default()
        });
        let values = source.bone_values(0.01);

        assert_eq!(flex(&values, BoneId::Ring1), 1.0);
        assert_relative_eq!(flex(&values, BoneId::Ring2), 0.5, epsilon = 1e-12);
        assert_eq!(flex(&values, BoneId::Ring3), 0.0);
    }

    #[test]
    fn test_index_source_selection() {
        let state = ControllerState {
            index_near_touch: true,
            index_trigger: 0.0,
            ..ControllerState::default()
        };

        let mut trigger = raw();
        trigger.set_state(state);
        assert_eq!(flex(&trigger.bone_values(0.01), BoneId::Index1), 0.0);

        let mut near = ControllerEmulation::new(
            ControllerConfig::default().without_smoothing().with_index_from_near_touch(true),
        );
        near.set_state(state);
        assert_eq!(flex(&near.bone_values(0.01), BoneId::Index1), 1.0);
    }

    #[test]
    fn test_smoothing_eases_in() {
        let mut source = ControllerEmulation::default();
        source.set_state(ControllerState {
            grip: 1.0,
            ..ControllerState::default()
        });

        // Rate 5/s over 0.1 s covers half the gap.
        let first = source.bone_values(0.1);
        assert_relative_eq!(flex(&first, BoneId::Middle1), 1.0, epsilon = 1e-12);
        assert_relative_eq!(flex(&first, BoneId::Middle2), 0.5, epsilon = 1e-12);
        assert_eq!(flex(&first, BoneId::Middle3), 0.0);
    }

    #[test]
    fn test_wrist_orientation() {
        let source_config = ControllerConfig::default().with_wrist_euler_degrees(0.0, 90.0, 0.0);
        let mut source = ControllerEmulation::new(source_config);
        match source.bone_values(0.01).get(BoneId::WristRoot) {
            Some(BoneCommand::Orientation(q)) => assert_relative_eq!(q.angle(), std::f64::consts::FRAC_PI_2, epsilon = 1e-12),
            other => panic!("expected wrist orientation, got {other:?}"),
        }
    }

    #[test]
    fn test_wrist_euler_applies_z_then_x_then_y() {
        let wrist = |x, y, z| ControllerConfig::default().with_wrist_euler_degrees(x, y, z).wrist_rotation;

        // Z a quarter turn takes +X to +Y, then Y leaves it there.
        let zy = wrist(0.0, 90.0, 90.0);
        assert_relative_eq!(zy * Vector3::x(), Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(zy * Vector3::y(), Vector3::z(), epsilon = 1e-12);

        // Z takes +X to +Y, then X lifts it to +Z.
        let zx = wrist(90.0, 0.0, 90.0);
        assert_relative_eq!(zx * Vector3::x(), Vector3::z(), epsilon = 1e-12);

        // X takes +Y to +Z, then Y swings it to +X.
        let xy = wrist(90.0, 90.0, 0.0);
        assert_relative_eq!(xy * Vector3::y(), Vector3::x(), epsilon = 1e-12);
    }
}
