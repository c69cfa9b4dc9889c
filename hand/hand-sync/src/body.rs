//! Physics bindings: kinematic bodies and rotational joint drives.
//!
//! The physics engine is an external collaborator. The rig only needs to
//! place bodies, give them a target velocity, program joint drives and read
//! back where the solver actually put things. [`PhysicsBody`] and
//! [`JointDrive`] are that boundary.
//!
//! [`FollowerBody`] and [`RecordingJoint`] are headless implementations: the
//! body settles exactly on its kinematic target (plus any external
//! displacement applied with [`FollowerBody::push`]) and the joint records
//! what it was told. They are enough to run the rig without an engine.

use hand_types::Pose;
use nalgebra::{UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One rotational drive channel of a joint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DriveAxis {
    /// Twist about the joint's primary axis.
    Twist,
    /// Swing about the two secondary axes.
    Swing,
    /// Combined spherical interpolation drive.
    Slerp,
}

impl DriveAxis {
    /// Every drive channel.
    pub const ALL: [Self; 3] = [Self::Twist, Self::Swing, Self::Slerp];
}

/// Spring drive settings for one rotational channel.
///
/// The engine behind [`JointDrive`] owns the control law; the rig only
/// chooses the spring gain and the force limit.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AngularDrive {
    spring: f64,
    max_force: f64,
}

impl AngularDrive {
    /// Create a drive with the given spring gain and force limit.
    ///
    /// The limit is a magnitude; its sign is ignored.
    #[must_use]
    pub fn new(spring: f64, max_force: f64) -> Self {
        Self {
            spring,
            max_force: max_force.abs(),
        }
    }

    /// A drive that applies no torque.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Spring gain.
    #[must_use]
    pub fn spring(&self) -> f64 {
        self.spring
    }

    /// Force limit.
    #[must_use]
    pub fn max_force(&self) -> f64 {
        self.max_force
    }
}

impl Default for AngularDrive {
    fn default() -> Self {
        Self::disabled()
    }
}

/// A body the rig places kinematically and reads back after simulation.
pub trait PhysicsBody {
    /// Where the solver currently has the body.
    fn simulated_pose(&self) -> Pose;

    /// Set the pose the body is driven toward.
    fn set_kinematic_target(&mut self, target: &Pose);

    /// Set the linear velocity the body should carry toward its target.
    fn set_target_velocity(&mut self, velocity: Vector3<f64>);

    /// Move the body to `pose` immediately, discarding solver state.
    fn teleport(&mut self, pose: &Pose);
}

/// A rotational constraint between a body and its physics parent.
pub trait JointDrive {
    /// Drive the joint so that the local orientation `from` maps to `target`.
    fn set_target_rotation(&mut self, target: &UnitQuaternion<f64>, from: &UnitQuaternion<f64>);

    /// Program one drive channel.
    fn set_axis_drive(&mut self, axis: DriveAxis, drive: AngularDrive);
}

/// Headless body that settles on its kinematic target.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowerBody {
    target: Pose,
    velocity: Vector3<f64>,
    displacement: Vector3<f64>,
    twist: UnitQuaternion<f64>,
}

impl FollowerBody {
    /// Create a body resting at `pose`.
    #[must_use]
    pub fn new(pose: Pose) -> Self {
        Self {
            target: pose,
            velocity: Vector3::zeros(),
            displacement: Vector3::zeros(),
            twist: UnitQuaternion::identity(),
        }
    }

    /// Knock the body away from its target, as an external contact would.
    ///
    /// The displacement persists until the next [`teleport`](PhysicsBody::teleport).
    pub fn push(&mut self, translation: Vector3<f64>, rotation: UnitQuaternion<f64>) {
        self.displacement += translation;
        self.twist = rotation * self.twist;
    }

    /// Last kinematic target.
    #[must_use]
    pub fn target(&self) -> &Pose {
        &self.target
    }

    /// Last target velocity.
    #[must_use]
    pub fn velocity(&self) -> Vector3<f64> {
        self.velocity
    }

    /// Whether the body currently sits off its target.
    #[must_use]
    pub fn is_displaced(&self) -> bool {
        self.displacement != Vector3::zeros() || self.twist != UnitQuaternion::identity()
    }
}

impl Default for FollowerBody {
    fn default() -> Self {
        Self::new(Pose::identity())
    }
}

impl PhysicsBody for FollowerBody {
    fn simulated_pose(&self) -> Pose {
        Pose::from_position_rotation(
            self.target.position + self.displacement,
            self.twist * self.target.rotation,
        )
    }

    fn set_kinematic_target(&mut self, target: &Pose) {
        self.target = *target;
    }

    fn set_target_velocity(&mut self, velocity: Vector3<f64>) {
        self.velocity = velocity;
    }

    fn teleport(&mut self, pose: &Pose) {
        self.target = *pose;
        self.velocity = Vector3::zeros();
        self.displacement = Vector3::zeros();
        self.twist = UnitQuaternion::identity();
    }
}

/// Headless joint that records its programming.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingJoint {
    target_rotation: UnitQuaternion<f64>,
    drives: [AngularDrive; 3],
    updates: usize,
}

impl RecordingJoint {
    /// Create a joint at zero deflection with disabled drives.
    #[must_use]
    pub fn new() -> Self {
        Self {
            target_rotation: UnitQuaternion::identity(),
            drives: [AngularDrive::disabled(); 3],
            updates: 0,
        }
    }

    /// Deflection from the reference orientation the drive is pulling toward.
    #[must_use]
    pub fn target_rotation(&self) -> &UnitQuaternion<f64> {
        &self.target_rotation
    }

    /// Settings of one drive channel.
    #[must_use]
    pub fn drive(&self, axis: DriveAxis) -> &AngularDrive {
        &self.drives[axis as usize]
    }

    /// Number of times a target rotation was set.
    #[must_use]
    pub fn updates(&self) -> usize {
        self.updates
    }
}

impl Default for RecordingJoint {
    fn default() -> Self {
        Self::new()
    }
}

impl JointDrive for RecordingJoint {
    fn set_target_rotation(&mut self, target: &UnitQuaternion<f64>, from: &UnitQuaternion<f64>) {
        self.target_rotation = from.inverse() * target;
        self.updates += 1;
    }

    fn set_axis_drive(&mut self, axis: DriveAxis, drive: AngularDrive) {
        self.drives[axis as usize] = drive;
    }
}
