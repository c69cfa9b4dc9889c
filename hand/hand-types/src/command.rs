//! Per-bone commands and the source interface that produces them.
//!
//! A frame of input is a sparse [`BoneValues`] set: only the bones a source
//! cares about are present. Each entry is either a scalar flexion in `[0, 1]`
//! or an explicit local orientation. The two are mutually exclusive.
//!
//! # Example
//!
//! ```
//! use hand_types::{BoneCommand, BoneId, BoneValues};
//! use nalgebra::UnitQuaternion;
//!
//! let values = BoneValues::new()
//!     .with_flex(BoneId::Index1, 0.5)
//!     .with_orientation(BoneId::WristRoot, UnitQuaternion::identity());
//!
//! assert_eq!(values.len(), 2);
//! assert_eq!(values.get(BoneId::Index1), Some(&BoneCommand::Flex(0.5)));
//! assert!(values.get(BoneId::Middle1).is_none());
//! ```

use hashbrown::HashMap;
use nalgebra::UnitQuaternion;
use tracing::trace;

use crate::bone::BoneId;
use crate::error::{HandError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Command for one bone.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoneCommand {
    /// Flexion in `[0, 1]`: `0` is the rest orientation, `1` a quarter turn
    /// about the bone's bend axis.
    Flex(f64),
    /// Explicit local orientation, bypassing the flexion formula.
    Orientation(UnitQuaternion<f64>),
}

impl BoneCommand {
    /// Whether this command carries an explicit orientation.
    #[must_use]
    pub fn is_orientation(&self) -> bool {
        matches!(self, Self::Orientation(_))
    }

    /// Whether every component of the command is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Flex(value) => value.is_finite(),
            Self::Orientation(rotation) => rotation.coords.iter().all(|c| c.is_finite()),
        }
    }
}

/// Sparse set of bone commands for one frame.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoneValues {
    commands: HashMap<BoneId, BoneCommand>,
}

impl BoneValues {
    /// Create an empty command set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the command for `bone`, replacing any previous one.
    pub fn insert(&mut self, bone: BoneId, command: BoneCommand) {
        self.commands.insert(bone, command);
    }

    /// Set the command for a bone given by raw runtime index.
    ///
    /// Sentinels and unknown indices are dropped. Returns whether the command
    /// was stored.
    pub fn insert_raw(&mut self, raw: i32, command: BoneCommand) -> bool {
        match BoneId::from_raw(raw) {
            Some(bone) => {
                self.insert(bone, command);
                true
            }
            None => {
                trace!(raw, "dropping command for unknown bone");
                false
            }
        }
    }

    /// Builder form of [`insert`](Self::insert) for a flexion value.
    #[must_use]
    pub fn with_flex(mut self, bone: BoneId, value: f64) -> Self {
        self.insert(bone, BoneCommand::Flex(value));
        self
    }

    /// Builder form of [`insert`](Self::insert) for an explicit orientation.
    #[must_use]
    pub fn with_orientation(mut self, bone: BoneId, rotation: UnitQuaternion<f64>) -> Self {
        self.insert(bone, BoneCommand::Orientation(rotation));
        self
    }

    /// Command for `bone`, if present this frame.
    #[must_use]
    pub fn get(&self, bone: BoneId) -> Option<&BoneCommand> {
        self.commands.get(&bone)
    }

    /// Number of bones carrying a command.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no bone carries a command.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Check that every command is finite.
    ///
    /// # Errors
    ///
    /// Returns [`HandError::NonFiniteCommand`] for the lowest-indexed bone
    /// carrying a non-finite command.
    pub fn validate(&self) -> Result<()> {
        for bone in BoneId::ALL {
            if self.get(bone).is_some_and(|command| !command.is_finite()) {
                return Err(HandError::NonFiniteCommand(bone));
            }
        }
        Ok(())
    }

    /// Iterate over the commands in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (BoneId, &BoneCommand)> {
        self.commands.iter().map(|(bone, cmd)| (*bone, cmd))
    }
}

impl FromIterator<(BoneId, BoneCommand)> for BoneValues {
    fn from_iter<I: IntoIterator<Item = (BoneId, BoneCommand)>>(iter: I) -> Self {
        Self {
            commands: iter.into_iter().collect(),
        }
    }
}

impl Extend<(BoneId, BoneCommand)> for BoneValues {
    fn extend<I: IntoIterator<Item = (BoneId, BoneCommand)>>(&mut self, iter: I) {
        self.commands.extend(iter);
    }
}

/// A provider of bone commands.
///
/// Implementations wrap a capture backend (controller buttons, skeletal hand
/// tracking, recorded playback). The rig pulls one set of values per frame.
pub trait BoneValueSource {
    /// Produce this frame's commands. `dt` is the frame delta in seconds.
    fn bone_values(&mut self, dt: f64) -> BoneValues;

    /// Whether the surrounding presentation should show the hand.
    fn show_hand(&self) -> bool {
        true
    }
}
