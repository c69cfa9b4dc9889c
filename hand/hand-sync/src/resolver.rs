//! Pose resolution: sparse bone commands to target local orientations.
//!
//! A flexion value `v` rotates the bone away from its start orientation by
//! `v` quarter turns about the bone's bend axis. The bend axis is local
//! negative-forward for every bone except the thumb's base bone, which bends
//! about local negative-up. Explicit orientation commands are taken as-is.

use std::f64::consts::FRAC_PI_2;

use hand_types::{BoneCommand, BoneId, BoneValues, is_thumb_base};
use nalgebra::{Unit, UnitQuaternion, Vector3};
use tracing::warn;

/// Per-bone target local orientations for one frame.
///
/// `None` means the bone had no command and keeps its current orientation.
pub type ResolvedTargets = [Option<UnitQuaternion<f64>>; BoneId::COUNT];

/// Axis, in the bone's local frame, about which flexion rotates it.
#[must_use]
pub fn bend_axis(bone: BoneId) -> Unit<Vector3<f64>> {
    if is_thumb_base(bone) {
        Unit::new_unchecked(-Vector3::y())
    } else {
        Unit::new_unchecked(-Vector3::z())
    }
}

/// Local rotation produced by flexion `value` on `bone`, relative to its start.
///
/// `value` is clamped to `[0, 1]`.
#[must_use]
pub fn flex_rotation(bone: BoneId, value: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&bend_axis(bone), value.clamp(0.0, 1.0) * FRAC_PI_2)
}

/// Target orientation for a single command.
///
/// Returns `None` for commands that cannot be applied: anything addressed
/// to a position-only fingertip, and any command with a non-finite
/// component.
#[must_use]
pub fn resolve_command(
    bone: BoneId,
    start: &UnitQuaternion<f64>,
    command: &BoneCommand,
) -> Option<UnitQuaternion<f64>> {
    if bone.is_tip() {
        return None;
    }
    if !command.is_finite() {
        warn!(%bone, ?command, "dropping non-finite command");
        return None;
    }
    match command {
        BoneCommand::Orientation(rotation) => Some(*rotation),
        BoneCommand::Flex(value) => Some(start * flex_rotation(bone, *value)),
    }
}

/// Resolve a frame of commands against the bones' start orientations.
pub fn resolve<F>(values: &BoneValues, start: F) -> ResolvedTargets
where
    F: Fn(BoneId) -> UnitQuaternion<f64>,
{
    let mut targets = [None; BoneId::COUNT];
    for (bone, command) in values.iter() {
        targets[bone.index()] = resolve_command(bone, &start(bone), command);
    }
    targets
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Quaternion;

    fn identity(_: BoneId) -> UnitQuaternion<f64> {
        UnitQuaternion::identity()
    }

    #[test]
    fn test_flex_angle_is_quarter_turn_scaled() {
        for v in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let rot = flex_rotation(BoneId::Index1, v);
            assert_relative_eq!(rot.angle(), v * FRAC_PI_2, epsilon = 1e-12);
            if v > 0.0 {
                let axis = rot.axis().unwrap().into_inner();
                assert_relative_eq!(axis, -Vector3::z(), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_flex_is_start() {
        let start = UnitQuaternion::from_euler_angles(0.1, 0.2, 0.3);
        let target = resolve_command(BoneId::Middle2, &start, &BoneCommand::Flex(0.0));
        assert_relative_eq!(target.unwrap(), start, epsilon = 1e-12);
    }

    #[test]
    fn test_flex_is_relative_to_start() {
        let start = UnitQuaternion::from_euler_angles(0.4, -0.2, 0.1);
        let target = resolve_command(BoneId::Ring3, &start, &BoneCommand::Flex(1.0)).unwrap();

        let relative = start.inverse() * target;
        assert_relative_eq!(relative.angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(relative.axis().unwrap().into_inner(), -Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_thumb_base_bends_about_up() {
        let thumb = flex_rotation(BoneId::Thumb1, 0.6);
        let index = flex_rotation(BoneId::Index1, 0.6);

        assert_relative_eq!(thumb.angle(), index.angle(), epsilon = 1e-12);
        let thumb_axis = thumb.axis().unwrap().into_inner();
        assert_relative_eq!(thumb_axis, -Vector3::y(), epsilon = 1e-12);
        assert_relative_eq!(thumb_axis.dot(&bend_axis(BoneId::Index1).into_inner()), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_flex_is_clamped() {
        assert_relative_eq!(flex_rotation(BoneId::Index2, 3.0).angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(flex_rotation(BoneId::Index2, -1.0).angle(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_orientation_overrides_formula() {
        let explicit = UnitQuaternion::from_euler_angles(0.0, 1.0, 0.0);
        let start = UnitQuaternion::from_euler_angles(0.3, 0.0, 0.0);
        let target = resolve_command(BoneId::Index1, &start, &BoneCommand::Orientation(explicit));
        assert_eq!(target, Some(explicit));
    }

    #[test]
    fn test_tips_and_non_finite_are_dropped() {
        let start = UnitQuaternion::identity();
        assert!(resolve_command(BoneId::IndexTip, &start, &BoneCommand::Flex(0.5)).is_none());
        assert!(resolve_command(BoneId::Index1, &start, &BoneCommand::Flex(f64::NAN)).is_none());
    }

    #[test]
    fn test_non_finite_orientation_is_dropped() {
        let start = UnitQuaternion::identity();
        let nan = UnitQuaternion::new_unchecked(Quaternion::new(f64::NAN, 0.0, 0.0, 0.0));
        let inf = UnitQuaternion::new_unchecked(Quaternion::new(0.0, f64::INFINITY, 0.0, 0.0));

        assert!(resolve_command(BoneId::Index1, &start, &BoneCommand::Orientation(nan)).is_none());
        assert!(resolve_command(BoneId::WristRoot, &start, &BoneCommand::Orientation(inf)).is_none());

        let values = BoneValues::new()
            .with_orientation(BoneId::Middle1, nan)
            .with_flex(BoneId::Middle2, 0.5);
        let targets = resolve(&values, identity);
        assert!(targets[BoneId::Middle1.index()].is_none());
        assert!(targets[BoneId::Middle2.index()].is_some());
    }

    #[test]
    fn test_resolve_is_sparse() {
        let values = BoneValues::new().with_flex(BoneId::Index1, 0.5).with_flex(BoneId::PinkyTip, 1.0);
        let targets = resolve(&values, identity);

        assert!(targets[BoneId::Index1.index()].is_some());
        assert!(targets[BoneId::PinkyTip.index()].is_none());
        assert_eq!(targets.iter().filter(|t| t.is_some()).count(), 1);
    }
}
