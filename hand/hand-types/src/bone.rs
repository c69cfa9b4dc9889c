//! Bone identifiers and the static hand topology.
//!
//! [`BoneId`] is a dense, totally ordered identifier: its discriminant is the
//! offset of the bone's record in every per-bone table. The ordering walks the
//! wrist root, the forearm stub and then each digit from proximal to distal,
//! followed by the five position-only fingertip markers.
//!
//! The topology helpers ([`parent`], [`finger`], [`fingertip`], [`kind`]) are
//! plain functions over a constant table. They carry no state.

use std::fmt;

use crate::error::HandError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of a single skeletal element of the hand.
///
/// Raw indices outside `0..BoneId::COUNT` are the sentinels of the tracking
/// runtime (see [`BoneId::INVALID`], [`BoneId::MAX_SKINNABLE`],
/// [`BoneId::END`]) and never name a bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum BoneId {
    /// Root frame of the hand, where the wrist is located.
    WristRoot = 0,
    /// Frame for the user's forearm.
    ForearmStub = 1,
    /// Thumb trapezium bone.
    Thumb0 = 2,
    /// Thumb metacarpal bone.
    Thumb1 = 3,
    /// Thumb proximal phalange.
    Thumb2 = 4,
    /// Thumb distal phalange.
    Thumb3 = 5,
    /// Index proximal phalange.
    Index1 = 6,
    /// Index intermediate phalange.
    Index2 = 7,
    /// Index distal phalange.
    Index3 = 8,
    /// Middle proximal phalange.
    Middle1 = 9,
    /// Middle intermediate phalange.
    Middle2 = 10,
    /// Middle distal phalange.
    Middle3 = 11,
    /// Ring proximal phalange.
    Ring1 = 12,
    /// Ring intermediate phalange.
    Ring2 = 13,
    /// Ring distal phalange.
    Ring3 = 14,
    /// Pinky metacarpal bone.
    Pinky0 = 15,
    /// Pinky proximal phalange.
    Pinky1 = 16,
    /// Pinky intermediate phalange.
    Pinky2 = 17,
    /// Pinky distal phalange.
    Pinky3 = 18,
    /// Tip of the thumb (position only).
    ThumbTip = 19,
    /// Tip of the index finger (position only).
    IndexTip = 20,
    /// Tip of the middle finger (position only).
    MiddleTip = 21,
    /// Tip of the ring finger (position only).
    RingTip = 22,
    /// Tip of the pinky (position only).
    PinkyTip = 23,
}

impl BoneId {
    /// Number of bones, and the length of every per-bone table.
    pub const COUNT: usize = 24;

    /// Raw sentinel for "no bone".
    pub const INVALID: i32 = -1;

    /// Raw index of the first bone.
    pub const START: i32 = 0;

    /// Raw index one past the last skinnable bone. Equal to the first tip.
    pub const MAX_SKINNABLE: usize = 19;

    /// Raw index one past the last bone.
    pub const END: usize = Self::COUNT;

    /// Every bone in index order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::WristRoot,
        Self::ForearmStub,
        Self::Thumb0,
        Self::Thumb1,
        Self::Thumb2,
        Self::Thumb3,
        Self::Index1,
        Self::Index2,
        Self::Index3,
        Self::Middle1,
        Self::Middle2,
        Self::Middle3,
        Self::Ring1,
        Self::Ring2,
        Self::Ring3,
        Self::Pinky0,
        Self::Pinky1,
        Self::Pinky2,
        Self::Pinky3,
        Self::ThumbTip,
        Self::IndexTip,
        Self::MiddleTip,
        Self::RingTip,
        Self::PinkyTip,
    ];

    /// Dense array offset of this bone.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a bone by its dense offset.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up a bone by a raw runtime index, rejecting sentinels.
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        usize::try_from(raw).ok().and_then(Self::from_index)
    }

    /// Whether this bone is part of the skinned mesh (everything but the tips).
    #[must_use]
    pub const fn is_skinnable(self) -> bool {
        self.index() < Self::MAX_SKINNABLE
    }

    /// Whether this bone is a position-only fingertip marker.
    #[must_use]
    pub const fn is_tip(self) -> bool {
        !self.is_skinnable()
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::WristRoot => "wrist_root",
            Self::ForearmStub => "forearm_stub",
            Self::Thumb0 => "thumb0",
            Self::Thumb1 => "thumb1",
            Self::Thumb2 => "thumb2",
            Self::Thumb3 => "thumb3",
            Self::Index1 => "index1",
            Self::Index2 => "index2",
            Self::Index3 => "index3",
            Self::Middle1 => "middle1",
            Self::Middle2 => "middle2",
            Self::Middle3 => "middle3",
            Self::Ring1 => "ring1",
            Self::Ring2 => "ring2",
            Self::Ring3 => "ring3",
            Self::Pinky0 => "pinky0",
            Self::Pinky1 => "pinky1",
            Self::Pinky2 => "pinky2",
            Self::Pinky3 => "pinky3",
            Self::ThumbTip => "thumb_tip",
            Self::IndexTip => "index_tip",
            Self::MiddleTip => "middle_tip",
            Self::RingTip => "ring_tip",
            Self::PinkyTip => "pinky_tip",
        }
    }
}

impl fmt::Display for BoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for BoneId {
    type Error = HandError;

    fn try_from(raw: i32) -> Result<Self, Self::Error> {
        Self::from_raw(raw).ok_or(HandError::UnknownBone(raw))
    }
}

/// One of the five digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Finger {
    /// Thumb.
    Thumb,
    /// Index finger.
    Index,
    /// Middle finger.
    Middle,
    /// Ring finger.
    Ring,
    /// Pinky.
    Pinky,
}

impl Finger {
    /// Number of digits.
    pub const COUNT: usize = 5;

    /// Every digit, thumb first.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    /// Dense offset of this digit.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The fingertip marker terminating this digit.
    #[must_use]
    pub const fn tip(self) -> BoneId {
        match self {
            Self::Thumb => BoneId::ThumbTip,
            Self::Index => BoneId::IndexTip,
            Self::Middle => BoneId::MiddleTip,
            Self::Ring => BoneId::RingTip,
            Self::Pinky => BoneId::PinkyTip,
        }
    }

    /// Phalanges of this digit, proximal to distal, tip excluded.
    #[must_use]
    pub const fn phalanges(self) -> &'static [BoneId] {
        match self {
            Self::Thumb => &[BoneId::Thumb0, BoneId::Thumb1, BoneId::Thumb2, BoneId::Thumb3],
            Self::Index => &[BoneId::Index1, BoneId::Index2, BoneId::Index3],
            Self::Middle => &[BoneId::Middle1, BoneId::Middle2, BoneId::Middle3],
            Self::Ring => &[BoneId::Ring1, BoneId::Ring2, BoneId::Ring3],
            Self::Pinky => &[BoneId::Pinky0, BoneId::Pinky1, BoneId::Pinky2, BoneId::Pinky3],
        }
    }
}

/// Structural role of a bone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoneKind {
    /// The wrist root, placed kinematically.
    Root,
    /// The forearm stub.
    Stub,
    /// A rotating bone of a digit.
    Phalange,
    /// A position-only fingertip marker.
    Tip,
}

#[derive(Debug, Clone, Copy)]
struct BoneInfo {
    parent: Option<BoneId>,
    finger: Option<Finger>,
    kind: BoneKind,
}

const fn root() -> BoneInfo {
    BoneInfo {
        parent: None,
        finger: None,
        kind: BoneKind::Root,
    }
}

const fn stub(parent: BoneId) -> BoneInfo {
    BoneInfo {
        parent: Some(parent),
        finger: None,
        kind: BoneKind::Stub,
    }
}

const fn phalange(parent: BoneId, finger: Finger) -> BoneInfo {
    BoneInfo {
        parent: Some(parent),
        finger: Some(finger),
        kind: BoneKind::Phalange,
    }
}

const fn tip(parent: BoneId, finger: Finger) -> BoneInfo {
    BoneInfo {
        parent: Some(parent),
        finger: Some(finger),
        kind: BoneKind::Tip,
    }
}

const TOPOLOGY: [BoneInfo; BoneId::COUNT] = [
    root(),
    stub(BoneId::WristRoot),
    phalange(BoneId::WristRoot, Finger::Thumb),
    phalange(BoneId::Thumb0, Finger::Thumb),
    phalange(BoneId::Thumb1, Finger::Thumb),
    phalange(BoneId::Thumb2, Finger::Thumb),
    phalange(BoneId::WristRoot, Finger::Index),
    phalange(BoneId::Index1, Finger::Index),
    phalange(BoneId::Index2, Finger::Index),
    phalange(BoneId::WristRoot, Finger::Middle),
    phalange(BoneId::Middle1, Finger::Middle),
    phalange(BoneId::Middle2, Finger::Middle),
    phalange(BoneId::WristRoot, Finger::Ring),
    phalange(BoneId::Ring1, Finger::Ring),
    phalange(BoneId::Ring2, Finger::Ring),
    phalange(BoneId::WristRoot, Finger::Pinky),
    phalange(BoneId::Pinky0, Finger::Pinky),
    phalange(BoneId::Pinky1, Finger::Pinky),
    phalange(BoneId::Pinky2, Finger::Pinky),
    tip(BoneId::Thumb3, Finger::Thumb),
    tip(BoneId::Index3, Finger::Index),
    tip(BoneId::Middle3, Finger::Middle),
    tip(BoneId::Ring3, Finger::Ring),
    tip(BoneId::Pinky3, Finger::Pinky),
];

/// Parent of `bone` in the hand hierarchy.
///
/// `None` for the wrist root, which hangs directly off the tracked root.
/// Parents always have a lower index than their children.
#[must_use]
pub fn parent(bone: BoneId) -> Option<BoneId> {
    TOPOLOGY[bone.index()].parent
}

/// Digit that `bone` belongs to, if any.
#[must_use]
pub fn finger(bone: BoneId) -> Option<Finger> {
    TOPOLOGY[bone.index()].finger
}

/// Structural role of `bone`.
#[must_use]
pub fn kind(bone: BoneId) -> BoneKind {
    TOPOLOGY[bone.index()].kind
}

/// Whether `bone` is a rotating bone of one of the digits.
#[must_use]
pub fn is_phalange(bone: BoneId) -> bool {
    kind(bone) == BoneKind::Phalange
}

/// Fingertip marker whose probe governs `bone`.
///
/// Only phalanges have one; the root, stub and tips themselves return `None`.
#[must_use]
pub fn fingertip(bone: BoneId) -> Option<BoneId> {
    if is_phalange(bone) {
        finger(bone).map(Finger::tip)
    } else {
        None
    }
}

/// The thumb's base bone, which bends in a different plane from the others.
#[must_use]
pub fn is_thumb_base(bone: BoneId) -> bool {
    bone == BoneId::Thumb1
}
