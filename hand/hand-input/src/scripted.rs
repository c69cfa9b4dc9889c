//! Playback of prepared command sets.

use std::collections::VecDeque;

use hand_types::{BoneValueSource, BoneValues, Result};

/// A [`BoneValueSource`] replaying a queue of frames.
///
/// Each pull pops the next frame. Once the queue runs dry the last frame
/// played repeats, so a single pushed frame holds a pose indefinitely.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedSource {
    queue: VecDeque<BoneValues>,
    last: BoneValues,
    visible: bool,
    played: usize,
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self {
            queue: VecDeque::new(),
            last: BoneValues::new(),
            visible: true,
            played: 0,
        }
    }
}

impl ScriptedSource {
    /// Empty script. Pulls return an empty command set until frames arrive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script holding one pose forever.
    #[must_use]
    pub fn holding(values: BoneValues) -> Self {
        let mut source = Self::new();
        source.push(values);
        source
    }

    /// Queue a frame.
    pub fn push(&mut self, values: BoneValues) {
        self.queue.push_back(values);
    }

    /// Queue a frame after checking every command is finite.
    ///
    /// # Errors
    ///
    /// Returns [`hand_types::HandError::NonFiniteCommand`] and queues nothing
    /// if any command is non-finite.
    pub fn try_push(&mut self, values: BoneValues) -> Result<()> {
        values.validate()?;
        self.push(values);
        Ok(())
    }

    /// Frames still queued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Frames pulled so far.
    #[must_use]
    pub fn played(&self) -> usize {
        self.played
    }

    /// Set the visibility hint.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Extend<BoneValues> for ScriptedSource {
    fn extend<I: IntoIterator<Item = BoneValues>>(&mut self, iter: I) {
        self.queue.extend(iter);
    }
}

impl FromIterator<BoneValues> for ScriptedSource {
    fn from_iter<I: IntoIterator<Item = BoneValues>>(iter: I) -> Self {
        let mut source = Self::new();
        source.extend(iter);
        source
    }
}

impl BoneValueSource for ScriptedSource {
    fn bone_values(&mut self, _dt: f64) -> BoneValues {
        if let Some(next) = self.queue.pop_front() {
            self.last = next;
        }
        self.played += 1;
        self.last.clone()
    }

    fn show_hand(&self) -> bool {
        self.visible
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_types::{BoneCommand, BoneId, HandError};

    #[test]
    fn test_plays_in_order_then_holds() {
        let mut source: ScriptedSource = [
            BoneValues::new().with_flex(BoneId::Index1, 0.1),
            BoneValues::new().with_flex(BoneId::Index1, 0.2),
        ]
        .into_iter()
        .collect();

        assert_eq!(source.bone_values(0.01).get(BoneId::Index1), Some(&BoneCommand::Flex(0.1)));
        assert_eq!(source.bone_values(0.01).get(BoneId::Index1), Some(&BoneCommand::Flex(0.2)));
        assert_eq!(source.bone_values(0.01).get(BoneId::Index1), Some(&BoneCommand::Flex(0.2)));
        assert_eq!(source.remaining(), 0);
        assert_eq!(source.played(), 3);
    }

    #[test]
    fn test_empty_script() {
        let mut source = ScriptedSource::new();
        assert!(source.bone_values(0.01).is_empty());
        assert!(source.show_hand());
        source.set_visible(false);
        assert!(!source.show_hand());
    }

    #[test]
    fn test_try_push_rejects_non_finite() {
        let mut source = ScriptedSource::new();
        let err = source.try_push(BoneValues::new().with_flex(BoneId::Ring3, f64::NAN));
        assert_eq!(err, Err(HandError::NonFiniteCommand(BoneId::Ring3)));
        assert_eq!(source.remaining(), 0);

        assert!(source.try_push(BoneValues::new().with_flex(BoneId::Ring3, 0.4)).is_ok());
        assert_eq!(source.remaining(), 1);
    }
}
