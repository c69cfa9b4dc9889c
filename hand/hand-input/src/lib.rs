//! Bone command sources for physics hand rigs.
//!
//! Every source implements [`hand_types::BoneValueSource`]:
//!
//! - [`ControllerEmulation`] - finger curl from controller buttons and triggers
//! - [`SkeletonTracking`] - per-bone rotations from optical hand tracking
//! - [`ScriptedSource`] - queued command sets, for tests and tools
//!
//! [`ValueSource`] wraps any of them in one type, and [`SourceSelector`]
//! swaps between a controller slot and a hand tracking slot as devices
//! connect.
//!
//! # Example
//!
//! ```
//! use hand_input::{ControllerConfig, ControllerEmulation, ControllerState};
//! use hand_types::{BoneCommand, BoneId, BoneValueSource};
//!
//! let mut source = ControllerEmulation::new(ControllerConfig::default().without_smoothing());
//! source.set_state(ControllerState { grip: 1.0, ..ControllerState::default() });
//!
//! let values = source.bone_values(1.0 / 90.0);
//! assert_eq!(values.get(BoneId::Middle3), Some(&BoneCommand::Flex(1.0)));
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for readings and settings

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod controller;
pub mod scripted;
pub mod selector;
pub mod smoothing;
pub mod tracking;

pub use controller::{ControllerConfig, ControllerEmulation, ControllerState};
pub use scripted::ScriptedSource;
pub use selector::{InputDevice, SourceSelector, ValueSource};
pub use smoothing::{Smoother, lerp, spread_value};
pub use tracking::{SkeletonFrame, SkeletonTracking, TrackingConfig};
