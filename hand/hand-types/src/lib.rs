//! Core types for physics-driven hand rigs.
//!
//! This crate holds the data model shared by the input sources and the
//! synchronization engine:
//!
//! - [`BoneId`] and the static hand topology ([`parent`], [`finger`],
//!   [`fingertip`], [`kind`])
//! - [`Pose`] - rigid position and orientation
//! - [`BoneCommand`] and [`BoneValues`] - sparse per-frame bone commands
//! - [`BoneValueSource`] - the interface every input backend implements
//! - [`HandConfig`] - drift recovery, fingertip probe and joint drive settings
//! - [`HandError`] - configuration and assembly failures
//!
//! # Layer 0
//!
//! No engine, renderer or device SDK dependency. Everything here is plain data
//! over `nalgebra`.
//!
//! # Example
//!
//! ```
//! use hand_types::{BoneId, Finger, fingertip, parent};
//!
//! assert_eq!(fingertip(BoneId::Index2), Some(BoneId::IndexTip));
//! assert_eq!(parent(BoneId::Index2), Some(BoneId::Index1));
//! assert_eq!(Finger::Thumb.tip(), BoneId::ThumbTip);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bone;
pub mod command;
pub mod config;
pub mod error;
pub mod pose;

pub use bone::{
    BoneId, BoneKind, Finger, finger, fingertip, is_phalange, is_thumb_base, kind, parent,
};
pub use command::{BoneCommand, BoneValueSource, BoneValues};
pub use config::HandConfig;
pub use error::{HandError, Result};
pub use pose::Pose;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, UnitQuaternion, Vector3};
