//! Physics synchronization for tracked hands.
//!
//! A [`HandRig`] turns a stream of sparse bone commands into a simulated hand
//! that stays collision-plausible:
//!
//! - [`resolver`] - flexion values and explicit orientations to local targets
//! - [`clamp`] - stop closing fingers at whatever their tip is touching
//! - [`driver`] - kinematic bodies, joint drives and target velocities
//! - [`drift`] - wrist drift measurement and thresholds
//! - [`resync`] - snap back to the last good tracked state
//!
//! The physics engine and the scene stay outside. Bodies, joints and ray
//! queries are reached through [`PhysicsBody`], [`JointDrive`] and
//! [`CollisionProbe`]. [`FollowerBody`] and [`RecordingJoint`] run the rig
//! headless.
//!
//! # Example
//!
//! ```
//! use hand_sync::{FrameContext, HandSkeleton, HeadlessRig, NoCollision};
//! use hand_types::{BoneId, BoneValueSource, BoneValues, HandConfig, Pose};
//!
//! struct HalfCurl;
//!
//! impl BoneValueSource for HalfCurl {
//!     fn bone_values(&mut self, _dt: f64) -> BoneValues {
//!         BoneValues::new().with_flex(BoneId::Index1, 0.5)
//!     }
//! }
//!
//! let mut rig = HeadlessRig::headless(&HandSkeleton::reference(), HandConfig::default())?;
//! let frame = FrameContext::new(Pose::identity(), 1.0 / 90.0);
//! let report = rig.update(Some(&mut HalfCurl), &frame, &NoCollision);
//!
//! assert!(report.ran);
//! assert!(report.resync.is_none());
//! let angle = rig.node(BoneId::Index1).tracked_orientation().angle();
//! assert!((angle - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
//! # Ok::<(), hand_types::HandError>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for skeletons, drives
//!   and drift reports

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod body;
pub mod clamp;
pub mod drift;
pub mod driver;
pub mod node;
pub mod probe;
pub mod resolver;
pub mod resync;
pub mod rig;
pub mod skeleton;

pub use body::{AngularDrive, DriveAxis, FollowerBody, JointDrive, PhysicsBody, RecordingJoint};
pub use clamp::ClampedBones;
pub use drift::{DriftMonitor, ResyncReason, WristOffset};
pub use node::{BoneNode, BoneTable, PhysicsBinding};
pub use probe::{CollisionProbe, FingertipProbes, NoCollision, TipRay};
pub use resolver::ResolvedTargets;
pub use rig::{FrameContext, FrameReport, HandRig, HeadlessRig};
pub use skeleton::{BoneRest, HandSkeleton};
