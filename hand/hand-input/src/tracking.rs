//! Commands from optical skeletal hand tracking.
//!
//! The capture runtime delivers a local rotation for every skinnable bone.
//! Those are forwarded as explicit orientation commands, after converting
//! from the runtime's handedness and turning the wrist a half turn about up
//! so the hand faces the same way as the rig's rest pose.

use std::f64::consts::PI;

use hand_types::{BoneCommand, BoneId, BoneValueSource, BoneValues, HandError, Result};
use nalgebra::{Quaternion, UnitQuaternion, Vector3};
use tracing::trace;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of bones carried by a tracking frame.
pub const TRACKED_BONES: usize = BoneId::MAX_SKINNABLE;

/// One frame of skeletal tracking data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonFrame {
    /// Whether the runtime produced a pose at all.
    pub valid: bool,
    /// Whether the runtime is confident in the pose.
    pub high_confidence: bool,
    /// Local rotation of each skinnable bone, by bone index.
    pub rotations: [UnitQuaternion<f64>; TRACKED_BONES],
}

impl SkeletonFrame {
    /// Valid, confident frame with the given rotations.
    #[must_use]
    pub fn new(rotations: [UnitQuaternion<f64>; TRACKED_BONES]) -> Self {
        Self {
            valid: true,
            high_confidence: true,
            rotations,
        }
    }

    /// Valid, confident frame from a slice of rotations.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidSkeleton`] unless `rotations` holds exactly
    /// one entry per skinnable bone.
    pub fn from_slice(rotations: &[UnitQuaternion<f64>]) -> Result<Self> {
        let rotations: [UnitQuaternion<f64>; TRACKED_BONES] = rotations.try_into().map_err(|_| {
            HandError::invalid_skeleton(format!(
                "expected {TRACKED_BONES} bone rotations, got {}",
                rotations.len()
            ))
        })?;
        Ok(Self::new(rotations))
    }

    /// Frame at rest: every bone at identity.
    #[must_use]
    pub fn rest() -> Self {
        Self::new([UnitQuaternion::identity(); TRACKED_BONES])
    }

    /// Set the quality flags.
    #[must_use]
    pub fn with_quality(mut self, valid: bool, high_confidence: bool) -> Self {
        self.valid = valid;
        self.high_confidence = high_confidence;
        self
    }
}

/// Settings for [`SkeletonTracking`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TrackingConfig {
    /// Treat frames the runtime marks invalid as bad data.
    pub hide_when_invalid: bool,
    /// Treat low-confidence frames as bad data.
    pub hide_when_low_confidence: bool,
    /// Mirror rotations across the `YZ` plane on the way in.
    pub flip_handedness: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            hide_when_invalid: true,
            hide_when_low_confidence: true,
            flip_handedness: true,
        }
    }
}

/// Rotation about local up by a half turn, applied after the wrist reading.
#[must_use]
pub fn wrist_fixup() -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), PI)
}

/// Mirror a rotation across the `YZ` plane: `(x, y, z, w)` to `(x, -y, -z, w)`.
#[must_use]
pub fn flip_x(rotation: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
    let q = rotation.quaternion();
    UnitQuaternion::new_unchecked(Quaternion::new(q.w, q.i, -q.j, -q.k))
}

/// A [`BoneValueSource`] forwarding skeletal tracking rotations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkeletonTracking {
    config: TrackingConfig,
    frame: Option<SkeletonFrame>,
    good_data: bool,
}

impl SkeletonTracking {
    /// Create a tracking source with no data yet.
    #[must_use]
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            config,
            frame: None,
            good_data: false,
        }
    }

    /// Settings.
    #[must_use]
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Hand over the latest frame from the runtime.
    pub fn set_frame(&mut self, frame: SkeletonFrame) {
        self.frame = Some(frame);
    }

    /// Drop the current frame, as when tracking is lost.
    pub fn clear_frame(&mut self) {
        self.frame = None;
    }

    fn is_good(&self, frame: &SkeletonFrame) -> bool {
        (!self.config.hide_when_invalid || frame.valid)
            && (!self.config.hide_when_low_confidence || frame.high_confidence)
    }

    fn local_rotation(&self, bone: BoneId, raw: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        let rotation = if self.config.flip_handedness { flip_x(raw) } else { *raw };
        if bone == BoneId::WristRoot {
            rotation * wrist_fixup()
        } else {
            rotation
        }
    }
}

impl BoneValueSource for SkeletonTracking {
    fn bone_values(&mut self, _dt: f64) -> BoneValues {
        let Some(frame) = self.frame.as_ref() else {
            self.good_data = false;
            return BoneValues::new();
        };

        self.good_data = self.is_good(frame);
        if !self.good_data {
            trace!(valid = frame.valid, confident = frame.high_confidence, "skipping tracking frame");
            return BoneValues::new();
        }

        BoneId::ALL
            .iter()
            .take(TRACKED_BONES)
            .map(|&bone| {
                let rotation = self.local_rotation(bone, &frame.rotations[bone.index()]);
                (bone, BoneCommand::Orientation(rotation))
            })
            .collect()
    }

    fn show_hand(&self) -> bool {
        self.good_data
    }
}
