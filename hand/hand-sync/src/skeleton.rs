//! Rest pose of the hand and forward kinematics.
//!
//! A [`HandSkeleton`] gives every bone an offset from its parent (in the
//! parent's frame) and a rest local orientation. The rest orientation is the
//! bone's start orientation: the zero reference for flexion commands.

use hand_types::{BoneId, HandError, Pose, Result, parent};
use nalgebra::{UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Rest placement of one bone relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneRest {
    /// Offset from the parent origin, in the parent frame.
    pub offset: Vector3<f64>,
    /// Local orientation at rest.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for BoneRest {
    fn default() -> Self {
        Self {
            offset: Vector3::zeros(),
            rotation: UnitQuaternion::identity(),
        }
    }
}

/// Rest pose for every bone of a hand.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HandSkeleton {
    bones: [BoneRest; BoneId::COUNT],
}

impl Default for HandSkeleton {
    fn default() -> Self {
        Self {
            bones: [BoneRest::default(); BoneId::COUNT],
        }
    }
}

impl HandSkeleton {
    /// Skeleton with every bone collapsed onto the wrist.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A flat, open right hand about 19 cm long.
    ///
    /// Fingers extend along `+X`, the thumb sits on the `+Z` side and the
    /// palm faces `-Y`, so flexion about `-Z` curls fingers toward the palm.
    #[must_use]
    pub fn reference() -> Self {
        let x = |d: f64| Vector3::new(d, 0.0, 0.0);
        Self::new()
            .with_offset(BoneId::ForearmStub, x(-0.05))
            .with_bone(
                BoneId::Thumb0,
                Vector3::new(0.02, -0.01, 0.025),
                UnitQuaternion::from_axis_angle(&Vector3::y_axis(), -0.5),
            )
            .with_offset(BoneId::Thumb1, x(0.03))
            .with_offset(BoneId::Thumb2, x(0.035))
            .with_offset(BoneId::Thumb3, x(0.03))
            .with_offset(BoneId::ThumbTip, x(0.025))
            .with_offset(BoneId::Index1, Vector3::new(0.09, 0.0, 0.022))
            .with_offset(BoneId::Index2, x(0.04))
            .with_offset(BoneId::Index3, x(0.025))
            .with_offset(BoneId::IndexTip, x(0.02))
            .with_offset(BoneId::Middle1, x(0.095))
            .with_offset(BoneId::Middle2, x(0.045))
            .with_offset(BoneId::Middle3, x(0.028))
            .with_offset(BoneId::MiddleTip, x(0.022))
            .with_offset(BoneId::Ring1, Vector3::new(0.088, 0.0, -0.02))
            .with_offset(BoneId::Ring2, x(0.042))
            .with_offset(BoneId::Ring3, x(0.026))
            .with_offset(BoneId::RingTip, x(0.021))
            .with_offset(BoneId::Pinky0, Vector3::new(0.03, 0.0, -0.035))
            .with_offset(BoneId::Pinky1, x(0.05))
            .with_offset(BoneId::Pinky2, x(0.03))
            .with_offset(BoneId::Pinky3, x(0.02))
            .with_offset(BoneId::PinkyTip, x(0.018))
    }

    /// Set the offset and rest orientation of `bone`.
    #[must_use]
    pub fn with_bone(mut self, bone: BoneId, offset: Vector3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        self.bones[bone.index()] = BoneRest { offset, rotation };
        self
    }

    /// Set the offset of `bone`, keeping its rest orientation.
    #[must_use]
    pub fn with_offset(mut self, bone: BoneId, offset: Vector3<f64>) -> Self {
        self.bones[bone.index()].offset = offset;
        self
    }

    /// Set the rest orientation of `bone`, keeping its offset.
    #[must_use]
    pub fn with_rotation(mut self, bone: BoneId, rotation: UnitQuaternion<f64>) -> Self {
        self.bones[bone.index()].rotation = rotation;
        self
    }

    /// Rest placement of `bone`.
    #[must_use]
    pub fn bone(&self, bone: BoneId) -> &BoneRest {
        &self.bones[bone.index()]
    }

    /// Check that every offset and rotation is finite.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::InvalidSkeleton`] naming the first bad bone.
    pub fn validate(&self) -> Result<()> {
        for bone in BoneId::ALL {
            let rest = self.bone(bone);
            if !rest.offset.iter().all(|c| c.is_finite()) {
                return Err(HandError::invalid_skeleton(format!("{bone} has a non-finite offset")));
            }
            if !rest.rotation.coords.iter().all(|c| c.is_finite()) {
                return Err(HandError::invalid_skeleton(format!("{bone} has a non-finite rotation")));
            }
        }
        Ok(())
    }

    /// World poses of every bone at rest, with the hand root placed at `root`.
    #[must_use]
    pub fn rest_poses(&self, root: &Pose) -> [Pose; BoneId::COUNT] {
        let mut local = [UnitQuaternion::identity(); BoneId::COUNT];
        let mut offsets = [Vector3::zeros(); BoneId::COUNT];
        for bone in BoneId::ALL {
            local[bone.index()] = self.bone(bone).rotation;
            offsets[bone.index()] = self.bone(bone).offset;
        }
        forward_kinematics(root, &offsets, &local)
    }
}

/// World poses from per-bone offsets and local orientations.
///
/// Bones are visited in index order, which places every parent before its
/// children.
#[must_use]
pub fn forward_kinematics(
    root: &Pose,
    offsets: &[Vector3<f64>; BoneId::COUNT],
    local: &[UnitQuaternion<f64>; BoneId::COUNT],
) -> [Pose; BoneId::COUNT] {
    let mut world = [Pose::identity(); BoneId::COUNT];
    for bone in BoneId::ALL {
        let i = bone.index();
        let parent_pose = parent(bone).map_or(*root, |p| world[p.index()]);
        world[i] = parent_pose.child(&offsets[i], &local[i]);
    }
    world
}
