//! The hand rig: bone table, lifecycle and the per-frame pipeline.
//!
//! One [`HandRig::update`] call runs the whole tick in a fixed order:
//!
//! 1. pull a sparse command set from the value source
//! 2. place the tracked root on the anchor and resolve commands to targets
//! 3. commit targets, clamping closing fingers whose tip is in contact
//! 4. forward kinematics for the tracked poses
//! 5. drive physics bodies and joints, measure wrist drift
//! 6. copy simulated poses onto meshes
//! 7. resynchronize if the drift breaks an enabled threshold

use hand_types::{BoneId, BoneValueSource, HandConfig, Pose, Result};
use tracing::debug;

use crate::body::{FollowerBody, JointDrive, PhysicsBody, RecordingJoint};
use crate::clamp::{self, ClampedBones};
use crate::drift::{DriftMonitor, ResyncReason, WristOffset};
use crate::driver;
use crate::node::{BoneNode, BoneTable, PhysicsBinding, update_tracked_poses};
use crate::probe::{CollisionProbe, FingertipProbes};
use crate::resolver;
use crate::resync;
use crate::skeleton::HandSkeleton;

/// Per-frame inputs from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameContext {
    /// World pose of the tracking anchor this frame.
    pub anchor: Pose,
    /// Seconds since the previous frame.
    pub dt: f64,
}

impl FrameContext {
    /// Create a frame context.
    #[must_use]
    pub fn new(anchor: Pose, dt: f64) -> Self {
        Self { anchor, dt }
    }
}

/// What happened during one [`HandRig::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Whether the tick ran. False for an inactive rig or a missing source.
    pub ran: bool,
    /// Visibility hint from the source.
    pub show_hand: bool,
    /// Fingertip rays cast against the scene.
    pub probes_issued: usize,
    /// Bones whose target was held back by contact.
    pub clamped: ClampedBones,
    /// Wrist drift measured before the wrist body was moved.
    pub wrist_offset: WristOffset,
    /// Set when the rig was snapped back this tick.
    pub resync: Option<ResyncReason>,
}

/// Rig running on the headless body and joint.
pub type HeadlessRig = HandRig<FollowerBody, RecordingJoint>;

/// A physically simulated hand driven by sparse bone commands.
#[derive(Debug, Clone)]
pub struct HandRig<B, J> {
    nodes: BoneTable<B, J>,
    tracked_root: Pose,
    anchor: Pose,
    config: HandConfig,
    monitor: DriftMonitor,
    active: bool,
}

impl<B: PhysicsBody, J: JointDrive> HandRig<B, J> {
    /// Assemble a rig from a rest skeleton, rooted at the origin.
    ///
    /// The rig starts active with no physics or mesh bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` or `skeleton` is invalid.
    pub fn new(skeleton: &HandSkeleton, config: HandConfig) -> Result<Self> {
        config.validate()?;
        skeleton.validate()?;

        let mut nodes: BoneTable<B, J> = std::array::from_fn(|i| {
            let bone = BoneId::ALL[i];
            let rest = skeleton.bone(bone);
            BoneNode::new(bone, rest.offset, rest.rotation)
        });

        let root = Pose::identity();
        update_tracked_poses(&mut nodes, &root);
        for node in &mut nodes {
            node.previous_position = node.tracked.position;
        }

        Ok(Self {
            nodes,
            tracked_root: root,
            anchor: root,
            monitor: DriftMonitor::from_config(&config),
            config,
            active: true,
        })
    }

    /// Attach a physics body, and optionally a joint, to `bone`.
    ///
    /// The body is teleported onto the bone's tracked pose.
    pub fn bind_physics(&mut self, bone: BoneId, mut body: B, joint: Option<J>) {
        let node = &mut self.nodes[bone.index()];
        body.teleport(&node.tracked);
        node.physics = Some(PhysicsBinding { body, joint });
    }

    /// Detach and return the physics binding of `bone`.
    pub fn unbind_physics(&mut self, bone: BoneId) -> Option<PhysicsBinding<B, J>> {
        self.nodes[bone.index()].physics.take()
    }

    /// Give `bone` a render pose, starting at its tracked pose.
    pub fn bind_mesh(&mut self, bone: BoneId) {
        let node = &mut self.nodes[bone.index()];
        node.mesh = Some(node.tracked);
    }

    /// Remove the render pose of `bone`.
    pub fn unbind_mesh(&mut self, bone: BoneId) {
        self.nodes[bone.index()].mesh = None;
    }

    /// Run one tick.
    ///
    /// With no source, or while inactive, nothing changes and the report
    /// has `ran == false`.
    pub fn update<P>(
        &mut self,
        source: Option<&mut dyn BoneValueSource>,
        frame: &FrameContext,
        probe: &P,
    ) -> FrameReport
    where
        P: CollisionProbe + ?Sized,
    {
        if !self.active {
            return FrameReport::default();
        }
        let Some(source) = source else {
            return FrameReport::default();
        };

        let values = source.bone_values(frame.dt);
        let show_hand = source.show_hand();

        self.anchor = frame.anchor;
        self.tracked_root = frame.anchor;

        let targets = resolver::resolve(&values, |bone| self.nodes[bone.index()].start_orientation);
        let mut probes = FingertipProbes::new();
        let clamped = clamp::apply(&mut self.nodes, &self.tracked_root, &targets, &self.config, &mut probes, probe);
        update_tracked_poses(&mut self.nodes, &self.tracked_root);

        let wrist_offset = driver::drive(&mut self.nodes, &self.config, frame.dt);
        driver::sync_meshes(&mut self.nodes, &self.tracked_root);

        let resync = self.monitor.check(&wrist_offset);
        if let Some(reason) = resync {
            debug!(
                ?reason,
                position = wrist_offset.position,
                rotation = wrist_offset.rotation_degrees(),
                "wrist drifted, resynchronizing"
            );
            resync::resynchronize(&mut self.nodes, &mut self.tracked_root, &self.anchor);
        }

        FrameReport {
            ran: true,
            show_hand,
            probes_issued: probes.issued(),
            clamped,
            wrist_offset,
            resync,
        }
    }

    /// Snap the rig onto `anchor` and the last tracked orientations.
    pub fn resynchronize(&mut self, anchor: &Pose) {
        self.anchor = *anchor;
        resync::resynchronize(&mut self.nodes, &mut self.tracked_root, anchor);
    }

    /// Resume updates, recapturing every joint's reference orientation.
    pub fn activate(&mut self) {
        for node in &mut self.nodes {
            node.cached_orientation = node.tracked_local;
        }
        self.active = true;
        debug!("hand rig activated");
    }

    /// Stop updates after snapping back to the last tracked state.
    pub fn deactivate(&mut self) {
        let anchor = self.anchor;
        resync::resynchronize(&mut self.nodes, &mut self.tracked_root, &anchor);
        self.active = false;
        debug!("hand rig deactivated");
    }

    /// Whether [`update`](Self::update) currently runs.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> &HandConfig {
        &self.config
    }

    /// Replace the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error, leaving the rig untouched, if `config` is invalid.
    pub fn set_config(&mut self, config: HandConfig) -> Result<()> {
        config.validate()?;
        self.monitor = DriftMonitor::from_config(&config);
        self.config = config;
        Ok(())
    }

    /// Pose the hand hangs from: the anchor at the last tick.
    #[must_use]
    pub fn tracked_root(&self) -> &Pose {
        &self.tracked_root
    }

    /// Record of `bone`.
    #[must_use]
    pub fn node(&self, bone: BoneId) -> &BoneNode<B, J> {
        &self.nodes[bone.index()]
    }

    /// Every bone record, in index order.
    #[must_use]
    pub fn nodes(&self) -> &BoneTable<B, J> {
        &self.nodes
    }

    /// Physics body of `bone`, if bound.
    pub fn body_mut(&mut self, bone: BoneId) -> Option<&mut B> {
        self.nodes[bone.index()].physics.as_mut().map(|p| &mut p.body)
    }

    /// Joint of `bone`, if bound.
    #[must_use]
    pub fn joint(&self, bone: BoneId) -> Option<&J> {
        self.nodes[bone.index()].physics.as_ref().and_then(|p| p.joint.as_ref())
    }
}

impl HeadlessRig {
    /// Rig with headless bodies on every skinnable bone, joints on all of
    /// them but the wrist, and meshes on every bone.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` or `skeleton` is invalid.
    pub fn headless(skeleton: &HandSkeleton, config: HandConfig) -> Result<Self> {
        let mut rig = Self::new(skeleton, config)?;
        for bone in BoneId::ALL {
            if bone.is_skinnable() {
                let joint = (bone != BoneId::WristRoot).then(RecordingJoint::new);
                rig.bind_physics(bone, FollowerBody::default(), joint);
            }
            rig.bind_mesh(bone);
        }
        Ok(rig)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::probe::NoCollision;
    use approx::assert_relative_eq;
    use hand_types::BoneValues;
    use nalgebra::Point3;

    struct Fixed(BoneValues);

    impl BoneValueSource for Fixed {
        fn bone_values(&mut self, _dt: f64) -> BoneValues {
            self.0.clone()
        }
    }

    fn rig() -> HeadlessRig {
        HeadlessRig::headless(&HandSkeleton::reference(), HandConfig::default()).unwrap()
    }

    #[test]
    fn test_new_rejects_bad_config() {
        let config = HandConfig::default().with_tip_collision_distance(-1.0);
        assert!(HeadlessRig::new(&HandSkeleton::reference(), config).is_err());
    }

    #[test]
    fn test_headless_bindings() {
        let rig = rig();
        assert!(rig.joint(BoneId::WristRoot).is_none());
        assert!(rig.node(BoneId::WristRoot).physics().is_some());
        assert!(rig.joint(BoneId::Index2).is_some());
        assert!(rig.node(BoneId::IndexTip).physics().is_none());
        assert!(rig.node(BoneId::IndexTip).mesh_pose().is_some());
    }

    #[test]
    fn test_missing_source_is_a_no_op() {
        let mut rig = rig();
        let before = *rig.node(BoneId::Middle1).tracked_pose();
        let frame = FrameContext::new(Pose::from_position(Point3::new(1.0, 0.0, 0.0)), 0.01);

        let report = rig.update(None, &frame, &NoCollision);

        assert!(!report.ran);
        assert_eq!(*rig.node(BoneId::Middle1).tracked_pose(), before);
        assert!(!rig.node(BoneId::Middle1).has_been_tracked());
    }

    #[test]
    fn test_root_follows_anchor() {
        let mut rig = rig();
        let mut source = Fixed(BoneValues::new());
        let anchor = Pose::from_position(Point3::new(0.0, 1.0, 0.0));

        let report = rig.update(Some(&mut source), &FrameContext::new(anchor, 0.01), &NoCollision);

        assert!(report.ran);
        assert!(report.show_hand);
        assert_eq!(*rig.tracked_root(), anchor);
        let wrist = rig.node(BoneId::WristRoot);
        assert_relative_eq!(wrist.tracked_pose().position, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(wrist.mesh_pose().unwrap().position, Point3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_unbound_mesh_follows_parent() {
        let mut rig = rig();
        let mut source = Fixed(BoneValues::new().with_flex(BoneId::Index3, 1.0));
        rig.update(Some(&mut source), &FrameContext::new(Pose::identity(), 0.01), &NoCollision);

        let index3 = rig.node(BoneId::Index3).mesh_pose().copied().unwrap();
        let tip = rig.node(BoneId::IndexTip);
        let expected = index3.child(tip.offset(), tip.tracked_orientation());
        assert_relative_eq!(tip.mesh_pose().unwrap().position, expected.position, epsilon = 1e-12);
    }

    #[test]
    fn test_set_config_validates() {
        let mut rig = rig();
        let bad = HandConfig::default().with_finger_force(f64::NAN);
        assert!(rig.set_config(bad).is_err());
        assert!(rig.set_config(HandConfig::default().with_finger_force(10.0)).is_ok());
        assert_relative_eq!(rig.config().finger_force, 10.0);
    }
}
