//! Per-bone records of the rig.
//!
//! The rig owns one [`BoneNode`] per [`BoneId`], stored in a fixed array
//! indexed by the bone's dense offset.

use hand_types::{BoneId, Pose, parent};
use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::body::PhysicsBody;

/// Fixed-size table of bone records, indexed by [`BoneId::index`].
pub type BoneTable<B, J> = [BoneNode<B, J>; BoneId::COUNT];

/// Physics body and optional joint bound to a bone.
#[derive(Debug, Clone)]
pub struct PhysicsBinding<B, J> {
    /// Body placed kinematically every frame.
    pub body: B,
    /// Rotational drive toward the physics parent. Ignored on the wrist root.
    pub joint: Option<J>,
}

/// Everything the rig tracks about one bone.
#[derive(Debug, Clone)]
pub struct BoneNode<B, J> {
    pub(crate) id: BoneId,
    pub(crate) offset: Vector3<f64>,
    pub(crate) tracked_local: UnitQuaternion<f64>,
    pub(crate) tracked: Pose,
    pub(crate) mesh: Option<Pose>,
    pub(crate) physics: Option<PhysicsBinding<B, J>>,
    pub(crate) start_orientation: UnitQuaternion<f64>,
    pub(crate) cached_orientation: UnitQuaternion<f64>,
    pub(crate) previous_position: Point3<f64>,
    pub(crate) previous_tracked_orientation: UnitQuaternion<f64>,
    pub(crate) has_been_tracked: bool,
    pub(crate) committed_bend: Vector3<f64>,
}

impl<B, J> BoneNode<B, J> {
    pub(crate) fn new(id: BoneId, offset: Vector3<f64>, rest: UnitQuaternion<f64>) -> Self {
        Self {
            id,
            offset,
            tracked_local: rest,
            tracked: Pose::identity(),
            mesh: None,
            physics: None,
            start_orientation: rest,
            cached_orientation: rest,
            previous_position: Point3::origin(),
            previous_tracked_orientation: rest,
            has_been_tracked: false,
            committed_bend: Vector3::zeros(),
        }
    }

    /// Which bone this is.
    #[must_use]
    pub fn id(&self) -> BoneId {
        self.id
    }

    /// Offset from the parent, in the parent frame.
    #[must_use]
    pub fn offset(&self) -> &Vector3<f64> {
        &self.offset
    }

    /// Tracked local orientation: the kinematic target before physics.
    #[must_use]
    pub fn tracked_orientation(&self) -> &UnitQuaternion<f64> {
        &self.tracked_local
    }

    /// Tracked world pose.
    #[must_use]
    pub fn tracked_pose(&self) -> &Pose {
        &self.tracked
    }

    /// Render pose, if a mesh is bound.
    #[must_use]
    pub fn mesh_pose(&self) -> Option<&Pose> {
        self.mesh.as_ref()
    }

    /// Physics binding, if any.
    #[must_use]
    pub fn physics(&self) -> Option<&PhysicsBinding<B, J>> {
        self.physics.as_ref()
    }

    /// Mutable physics binding, if any.
    pub fn physics_mut(&mut self) -> Option<&mut PhysicsBinding<B, J>> {
        self.physics.as_mut()
    }

    /// Local orientation captured at rig assembly.
    #[must_use]
    pub fn start_orientation(&self) -> &UnitQuaternion<f64> {
        &self.start_orientation
    }

    /// Local orientation captured at the last activation.
    #[must_use]
    pub fn cached_orientation(&self) -> &UnitQuaternion<f64> {
        &self.cached_orientation
    }

    /// Tracked world position recorded last frame.
    #[must_use]
    pub fn previous_position(&self) -> &Point3<f64> {
        &self.previous_position
    }

    /// Tracked local orientation recorded last frame.
    #[must_use]
    pub fn previous_tracked_orientation(&self) -> &UnitQuaternion<f64> {
        &self.previous_tracked_orientation
    }

    /// Whether the bone has been driven at least once.
    #[must_use]
    pub fn has_been_tracked(&self) -> bool {
        self.has_been_tracked
    }

    /// Pose the rest of the hand sees for this bone: the mesh if bound,
    /// otherwise the tracked pose.
    #[must_use]
    pub fn visible_pose(&self) -> &Pose {
        self.mesh.as_ref().unwrap_or(&self.tracked)
    }
}

impl<B: PhysicsBody, J> BoneNode<B, J> {
    /// Pose the physics solver currently has the bone at, if bound.
    #[must_use]
    pub fn physics_pose(&self) -> Option<Pose> {
        self.physics.as_ref().map(|p| p.body.simulated_pose())
    }
}

/// Recompute tracked world poses from local orientations.
pub(crate) fn update_tracked_poses<B, J>(nodes: &mut BoneTable<B, J>, root: &Pose) {
    for bone in BoneId::ALL {
        let parent_pose = parent(bone).map_or(*root, |p| nodes[p.index()].tracked);
        let node = &mut nodes[bone.index()];
        node.tracked = parent_pose.child(&node.offset, &node.tracked_local);
    }
}
