//! Rigid poses.

use nalgebra::{Point3, UnitQuaternion, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Position and orientation of a frame.
///
/// Local axes follow the rig convention: forward is `+Z`, up is `+Y`,
/// right is `+X`. Bones extend along their local right axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pose {
    /// Position of the frame origin.
    pub position: Point3<f64>,
    /// Orientation of the frame.
    pub rotation: UnitQuaternion<f64>,
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

impl Pose {
    /// Pose at the origin with no rotation.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            position: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose at `position` with no rotation.
    #[must_use]
    pub fn from_position(position: Point3<f64>) -> Self {
        Self {
            position,
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Pose with the given position and rotation.
    #[must_use]
    pub fn from_position_rotation(position: Point3<f64>, rotation: UnitQuaternion<f64>) -> Self {
        Self { position, rotation }
    }

    /// Transform a point from this frame into the parent frame.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        self.position + self.rotation * point.coords
    }

    /// Rotate a vector from this frame into the parent frame.
    #[must_use]
    pub fn transform_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.rotation * vector
    }

    /// Transform a point from the parent frame into this frame.
    #[must_use]
    pub fn inverse_transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        Point3::from(self.rotation.inverse() * (point - self.position))
    }

    /// Child pose given as an offset and rotation relative to this frame.
    #[must_use]
    pub fn child(&self, offset: &Vector3<f64>, local_rotation: &UnitQuaternion<f64>) -> Self {
        Self {
            position: self.position + self.rotation * offset,
            rotation: self.rotation * local_rotation,
        }
    }

    /// Forward axis (`+Z`) in the parent frame.
    #[must_use]
    pub fn forward(&self) -> Vector3<f64> {
        self.rotation * Vector3::z()
    }

    /// Up axis (`+Y`) in the parent frame.
    #[must_use]
    pub fn up(&self) -> Vector3<f64> {
        self.rotation * Vector3::y()
    }

    /// Straight-line distance between the two origins.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    /// Angle in radians of the rotation taking this orientation to `other`'s.
    #[must_use]
    pub fn angle_to(&self, other: &Self) -> f64 {
        self.rotation.angle_to(&other.rotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_identity_is_default() {
        assert_eq!(Pose::default(), Pose::identity());
        assert_eq!(Pose::identity().position, Point3::origin());
    }

    #[test]
    fn test_transform_roundtrip() {
        let pose = Pose::from_position_rotation(
            Point3::new(1.0, 2.0, 3.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let p = Point3::new(0.5, -0.2, 0.1);
        let back = pose.inverse_transform_point(&pose.transform_point(&p));
        assert_relative_eq!(back, p, epsilon = 1e-12);
    }

    #[test]
    fn test_child_composes_offset_in_parent_frame() {
        let parent = Pose::from_position_rotation(
            Point3::new(0.0, 1.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let child = parent.child(&Vector3::new(0.0, 0.0, 1.0), &UnitQuaternion::identity());

        // +Z rotated a quarter turn about +Y lands on +X.
        assert_relative_eq!(child.position, Point3::new(1.0, 1.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(child.forward(), Vector3::x(), epsilon = 1e-12);
    }

    #[test]
    fn test_distance_and_angle() {
        let a = Pose::identity();
        let b = Pose::from_position_rotation(
            Point3::new(3.0, 4.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::z_axis(), 0.5),
        );
        assert_relative_eq!(a.distance_to(&b), 5.0, epsilon = 1e-12);
        assert_relative_eq!(a.angle_to(&b), 0.5, epsilon = 1e-12);
    }
}
