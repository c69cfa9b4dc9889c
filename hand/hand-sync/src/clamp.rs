//! Collision clamping of closing fingers.
//!
//! When a fingertip probe reports contact, phalanges of that digit may keep
//! opening but may not curl further than the mesh has actually managed to.
//! Bones are visited parent-first, so a bone's world orientation always
//! reflects this frame's decision for its parents.
//!
//! # Algorithm
//!
//! For every phalange with a target this frame:
//!
//! 1. `delta = target⁻¹ · current`, decomposed into angle and axis.
//! 2. The axis is taken to world space with the bone's current world
//!    orientation, and compared with the bone's closing direction (the
//!    negated bend axis, in world space). A positive dot product is closing.
//! 3. Closing against a fingertip hit rebuilds the target as
//!    `current · R(committed)⁻¹ · R(achieved)`, where `achieved` is the
//!    in-plane bend the mesh currently shows and `committed` is the in-plane
//!    bend of the orientation last written to the bone.
//!
//! In-plane bends are rotation vectors relative to the start orientation
//! with their right (`X`) component removed, i.e. projected onto the plane
//! spanned by the bone's forward and up axes.

use hand_types::{BoneId, HandConfig, Pose, finger, is_phalange, parent};
use nalgebra::{UnitQuaternion, Vector3};
use smallvec::SmallVec;
use tracing::trace;

use crate::node::BoneTable;
use crate::probe::{CollisionProbe, FingertipProbes};
use crate::resolver::{ResolvedTargets, bend_axis};

/// Bones clamped during one frame.
pub type ClampedBones = SmallVec<[BoneId; 8]>;

/// Bend of `local` away from `start`, projected onto the forward/up plane.
#[must_use]
pub fn in_plane_bend(start: &UnitQuaternion<f64>, local: &UnitQuaternion<f64>) -> Vector3<f64> {
    let bend = (start.inverse() * local).scaled_axis();
    Vector3::new(0.0, bend.y, bend.z)
}

/// Whether moving `bone` from `current` to `target` curls it further.
///
/// `world` is the bone's current world orientation.
#[must_use]
pub fn is_closing(
    bone: BoneId,
    current: &UnitQuaternion<f64>,
    target: &UnitQuaternion<f64>,
    world: &UnitQuaternion<f64>,
) -> bool {
    let delta = target.inverse() * current;
    let Some((axis, _angle)) = delta.axis_angle() else {
        return false;
    };
    let world_axis = world * axis.into_inner();
    let closing_direction = world * -bend_axis(bone).into_inner();
    world_axis.dot(&closing_direction) > 0.0
}

/// Local orientation the mesh currently shows for `bone`.
fn achieved_orientation<B, J>(nodes: &BoneTable<B, J>, bone: BoneId, root: &Pose) -> UnitQuaternion<f64> {
    let own = nodes[bone.index()].visible_pose().rotation;
    let parent_rotation = parent(bone).map_or(root.rotation, |p| nodes[p.index()].visible_pose().rotation);
    parent_rotation.inverse() * own
}

/// Commit this frame's targets, clamping closing fingers in contact.
///
/// Bones without a target keep their orientation. Returns the bones whose
/// target was clamped.
pub fn apply<B, J, P>(
    nodes: &mut BoneTable<B, J>,
    root: &Pose,
    targets: &ResolvedTargets,
    config: &HandConfig,
    probes: &mut FingertipProbes,
    probe: &P,
) -> ClampedBones
where
    P: CollisionProbe + ?Sized,
{
    let mut clamped = ClampedBones::new();
    let mut world = [UnitQuaternion::identity(); BoneId::COUNT];

    for bone in BoneId::ALL {
        let i = bone.index();
        let parent_world = parent(bone).map_or(root.rotation, |p| world[p.index()]);

        if let Some(target) = targets[i] {
            let node = &nodes[i];
            let current = node.tracked_local;
            let mut resolved = target;

            let digit = if is_phalange(bone) { finger(bone) } else { None };
            if let Some(digit) = digit {
                let current_world = parent_world * current;
                if is_closing(bone, &current, &target, &current_world) {
                    let tip = *nodes[digit.tip().index()].visible_pose();
                    if probes.hit(digit, &tip, config, probe) {
                        let start = node.start_orientation;
                        let achieved = in_plane_bend(&start, &achieved_orientation(nodes, bone, root));
                        let committed = node.committed_bend;
                        resolved = current
                            * UnitQuaternion::from_scaled_axis(committed).inverse()
                            * UnitQuaternion::from_scaled_axis(achieved);
                        trace!(%bone, achieved = achieved.norm(), "clamped closing bone");
                        clamped.push(bone);
                    }
                }
            }

            let node = &mut nodes[i];
            node.tracked_local = resolved;
            node.committed_bend = in_plane_bend(&node.start_orientation, &resolved);
        }

        world[i] = parent_world * nodes[i].tracked_local;
    }

    clamped
}
