//! Pushing tracked poses into physics, and reading the result back.
//!
//! Every bone with a physics body is placed kinematically on its tracked
//! pose each frame. Bones with a joint additionally get a rotational drive
//! toward their tracked local orientation, measured from the orientation
//! captured at activation. The wrist root carries no drive; instead its
//! simulated pose is compared against the tracked one for drift monitoring.

use hand_types::{BoneId, HandConfig, Pose, parent};
use nalgebra::{Point3, Vector3};

use crate::body::{AngularDrive, DriveAxis, JointDrive, PhysicsBody};
use crate::drift::WristOffset;
use crate::node::BoneTable;

/// Linear velocity carrying a body from `previous` to `current` over `dt`.
///
/// Returns zero for a zero, negative or non-finite `dt`.
#[must_use]
pub fn target_velocity(current: &Point3<f64>, previous: &Point3<f64>, dt: f64) -> Vector3<f64> {
    if dt.is_finite() && dt > 0.0 {
        (current - previous) / dt
    } else {
        Vector3::zeros()
    }
}

/// Drive every physics binding toward the tracked pose.
///
/// Returns the wrist root's drift, measured before its body is moved. A
/// rig without a wrist body reports zero drift.
pub fn drive<B, J>(nodes: &mut BoneTable<B, J>, config: &HandConfig, dt: f64) -> WristOffset
where
    B: PhysicsBody,
    J: JointDrive,
{
    let gain = AngularDrive::new(config.finger_force, config.finger_force_limit);
    let mut wrist = WristOffset::default();

    for bone in BoneId::ALL {
        let node = &mut nodes[bone.index()];

        if let Some(physics) = node.physics.as_mut() {
            if bone == BoneId::WristRoot {
                wrist = WristOffset::between(&physics.body.simulated_pose(), &node.tracked);
            } else if let Some(joint) = physics.joint.as_mut() {
                joint.set_target_rotation(&node.tracked_local, &node.cached_orientation);
                for axis in DriveAxis::ALL {
                    joint.set_axis_drive(axis, gain);
                }
            }

            let velocity = if node.has_been_tracked {
                target_velocity(&node.tracked.position, &node.previous_position, dt)
            } else {
                Vector3::zeros()
            };
            physics.body.set_kinematic_target(&node.tracked);
            physics.body.set_target_velocity(velocity);
        }

        node.previous_position = node.tracked.position;
        node.previous_tracked_orientation = node.tracked_local;
        node.has_been_tracked = true;
    }

    wrist
}

/// Copy simulated poses onto bound meshes.
///
/// A mesh without a physics body follows its parent's mesh through the
/// bone's rest offset and tracked local orientation.
pub fn sync_meshes<B: PhysicsBody, J>(nodes: &mut BoneTable<B, J>, root: &Pose) {
    for bone in BoneId::ALL {
        let i = bone.index();
        if nodes[i].mesh.is_none() {
            continue;
        }
        let pose = match nodes[i].physics.as_ref() {
            Some(physics) => physics.body.simulated_pose(),
            None => {
                let parent_pose = parent(bone).map_or(*root, |p| *nodes[p.index()].visible_pose());
                parent_pose.child(&nodes[i].offset, &nodes[i].tracked_local)
            }
        };
        nodes[i].mesh = Some(pose);
    }
}
