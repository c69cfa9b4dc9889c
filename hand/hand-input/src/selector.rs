//! Runtime choice between input backends.

use hand_types::{BoneValueSource, BoneValues};
use tracing::debug;

use crate::controller::ControllerEmulation;
use crate::scripted::ScriptedSource;
use crate::tracking::SkeletonTracking;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Any of the built-in command sources.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueSource {
    /// Finger curl emulated from controller sensors.
    Controller(ControllerEmulation),
    /// Optical skeletal tracking.
    Tracking(SkeletonTracking),
    /// Prepared playback.
    Scripted(ScriptedSource),
}

impl ValueSource {
    /// Short name of the backend, for logs.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Controller(_) => "controller",
            Self::Tracking(_) => "tracking",
            Self::Scripted(_) => "scripted",
        }
    }
}

impl BoneValueSource for ValueSource {
    fn bone_values(&mut self, dt: f64) -> BoneValues {
        match self {
            Self::Controller(source) => source.bone_values(dt),
            Self::Tracking(source) => source.bone_values(dt),
            Self::Scripted(source) => source.bone_values(dt),
        }
    }

    fn show_hand(&self) -> bool {
        match self {
            Self::Controller(source) => source.show_hand(),
            Self::Tracking(source) => source.show_hand(),
            Self::Scripted(source) => source.show_hand(),
        }
    }
}

impl From<ControllerEmulation> for ValueSource {
    fn from(source: ControllerEmulation) -> Self {
        Self::Controller(source)
    }
}

impl From<SkeletonTracking> for ValueSource {
    fn from(source: SkeletonTracking) -> Self {
        Self::Tracking(source)
    }
}

impl From<ScriptedSource> for ValueSource {
    fn from(source: ScriptedSource) -> Self {
        Self::Scripted(source)
    }
}

/// What the headset currently reports as connected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InputDevice {
    /// Bare hands seen by the tracking cameras.
    Hands,
    /// Handheld controllers, or nothing recognizable.
    #[default]
    Controllers,
}

/// Holds a controller source and a hand tracking source and exposes the
/// one matching the connected device.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceSelector {
    controllers: ValueSource,
    hands: ValueSource,
    device: InputDevice,
}

impl SourceSelector {
    /// Create a selector, starting on controllers.
    #[must_use]
    pub fn new(controllers: impl Into<ValueSource>, hands: impl Into<ValueSource>) -> Self {
        Self {
            controllers: controllers.into(),
            hands: hands.into(),
            device: InputDevice::default(),
        }
    }

    /// Follow the connected device. Returns whether the active source changed.
    pub fn select(&mut self, device: InputDevice) -> bool {
        if device == self.device {
            return false;
        }
        debug!(from = ?self.device, to = ?device, "switching hand input");
        self.device = device;
        true
    }

    /// Device the selector is following.
    #[must_use]
    pub fn device(&self) -> InputDevice {
        self.device
    }

    /// Source matching the current device.
    #[must_use]
    pub fn active(&self) -> &ValueSource {
        match self.device {
            InputDevice::Hands => &self.hands,
            InputDevice::Controllers => &self.controllers,
        }
    }

    /// Mutable source matching the current device.
    pub fn active_mut(&mut self) -> &mut ValueSource {
        match self.device {
            InputDevice::Hands => &mut self.hands,
            InputDevice::Controllers => &mut self.controllers,
        }
    }

    /// The controller slot, whatever is active.
    pub fn controllers_mut(&mut self) -> &mut ValueSource {
        &mut self.controllers
    }

    /// The hand tracking slot, whatever is active.
    pub fn hands_mut(&mut self) -> &mut ValueSource {
        &mut self.hands
    }
}

impl BoneValueSource for SourceSelector {
    fn bone_values(&mut self, dt: f64) -> BoneValues {
        self.active_mut().bone_values(dt)
    }

    fn show_hand(&self) -> bool {
        self.active().show_hand()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerConfig;
    use crate::tracking::{SkeletonFrame, TrackingConfig};
    use hand_types::BoneId;

    fn selector() -> SourceSelector {
        SourceSelector::new(
            ControllerEmulation::new(ControllerConfig::default()),
            SkeletonTracking::new(TrackingConfig::default()),
        )
    }

    #[test]
    fn test_starts_on_controllers() {
        let mut selector = selector();
        assert_eq!(selector.device(), InputDevice::Controllers);
        assert_eq!(selector.active().kind(), "controller");
        assert!(selector.show_hand());
        assert_eq!(selector.bone_values(0.01).len(), 16);
    }

    #[test]
    fn test_switches_to_hands() {
        let mut selector = selector();
        assert!(selector.select(InputDevice::Hands));
        assert!(!selector.select(InputDevice::Hands));
        assert_eq!(selector.active().kind(), "tracking");

        // No tracking frame yet: nothing to show.
        assert!(selector.bone_values(0.01).is_empty());
        assert!(!selector.show_hand());

        if let ValueSource::Tracking(tracking) = selector.hands_mut() {
            tracking.set_frame(SkeletonFrame::rest());
        }
        assert!(selector.bone_values(0.01).get(BoneId::Index1).is_some());
        assert!(selector.show_hand());
    }

    #[test]
    fn test_scripted_slot() {
        let script = ScriptedSource::holding(BoneValues::new().with_flex(BoneId::Pinky2, 1.0));
        let mut selector = SourceSelector::new(script, ScriptedSource::new());
        assert_eq!(selector.bone_values(0.01).len(), 1);

        selector.select(InputDevice::Hands);
        assert!(selector.bone_values(0.01).is_empty());
        assert!(matches!(selector.controllers_mut(), ValueSource::Scripted(_)));
    }
}
