//! Snapping the rig back onto its last good tracked state.

use hand_types::Pose;

use crate::body::PhysicsBody;
use crate::clamp::in_plane_bend;
use crate::node::{BoneTable, update_tracked_poses};

/// Re-seat the rig on `anchor` and the last recorded tracked orientations.
///
/// Bones never driven keep their current orientation. Meshes and bodies
/// are placed exactly on the restored tracked poses, and the velocity
/// history restarts from there.
pub fn resynchronize<B: PhysicsBody, J>(nodes: &mut BoneTable<B, J>, root: &mut Pose, anchor: &Pose) {
    *root = *anchor;

    for node in nodes.iter_mut() {
        if node.has_been_tracked {
            node.tracked_local = node.previous_tracked_orientation;
        }
    }
    update_tracked_poses(nodes, root);

    for node in nodes.iter_mut() {
        if node.mesh.is_some() {
            node.mesh = Some(node.tracked);
        }
        if let Some(physics) = node.physics.as_mut() {
            physics.body.teleport(&node.tracked);
        }
        node.committed_bend = in_plane_bend(&node.start_orientation, &node.tracked_local);
        node.previous_position = node.tracked.position;
    }
}
