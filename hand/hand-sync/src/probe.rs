//! Fingertip collision probes.
//!
//! Each fingertip casts one short ray per frame along a configurable local
//! axis. The boolean result is cached per digit so every phalange of that
//! digit reuses the same answer. Rays with a degenerate direction or length
//! read as "no collision" without touching the scene.

use hand_types::{Finger, HandConfig, Pose};
use nalgebra::{Point3, UnitVector3, Vector3};
use tracing::trace;

/// A synchronous ray query against the scene.
///
/// Implement this for your physics world. Any closure with the same
/// signature works too.
pub trait CollisionProbe {
    /// Whether anything lies within `max_distance` of `origin` along `direction`.
    fn probe(&self, origin: &Point3<f64>, direction: &UnitVector3<f64>, max_distance: f64) -> bool;
}

impl<F> CollisionProbe for F
where
    F: Fn(&Point3<f64>, &UnitVector3<f64>, f64) -> bool,
{
    fn probe(&self, origin: &Point3<f64>, direction: &UnitVector3<f64>, max_distance: f64) -> bool {
        self(origin, direction, max_distance)
    }
}

/// A scene with nothing in it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoCollision;

impl CollisionProbe for NoCollision {
    fn probe(&self, _: &Point3<f64>, _: &UnitVector3<f64>, _: f64) -> bool {
        false
    }
}

/// World-space ray for a fingertip pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipRay {
    /// Ray origin.
    pub origin: Point3<f64>,
    /// Unnormalized ray direction.
    pub direction: Vector3<f64>,
    /// Ray length.
    pub max_distance: f64,
}

impl TipRay {
    /// Ray cast from `tip` using the probe settings in `config`.
    #[must_use]
    pub fn from_tip(tip: &Pose, config: &HandConfig) -> Self {
        Self {
            origin: tip.position,
            direction: tip.transform_vector(&config.local_probe_direction()),
            max_distance: config.tip_collision_distance,
        }
    }

    /// Unit direction, or `None` if the ray cannot be cast.
    #[must_use]
    pub fn unit_direction(&self) -> Option<UnitVector3<f64>> {
        if !self.max_distance.is_finite() || self.max_distance <= 0.0 {
            return None;
        }
        UnitVector3::try_new(self.direction, 1e-10)
    }
}

/// Per-frame cache of fingertip probe results.
#[derive(Debug, Clone, Default)]
pub struct FingertipProbes {
    results: [Option<bool>; Finger::COUNT],
    issued: usize,
}

impl FingertipProbes {
    /// Create an empty cache for a new frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe result for `finger`, casting at most once per frame.
    ///
    /// `tip` is only consulted on the first call for a digit.
    pub fn hit<P: CollisionProbe + ?Sized>(
        &mut self,
        finger: Finger,
        tip: &Pose,
        config: &HandConfig,
        probe: &P,
    ) -> bool {
        if let Some(hit) = self.results[finger.index()] {
            return hit;
        }

        let ray = TipRay::from_tip(tip, config);
        let hit = match ray.unit_direction() {
            Some(direction) => {
                self.issued += 1;
                probe.probe(&ray.origin, &direction, ray.max_distance)
            }
            None => false,
        };
        trace!(?finger, hit, "fingertip probe");

        self.results[finger.index()] = Some(hit);
        hit
    }

    /// Cached result for `finger`, if it was probed this frame.
    #[must_use]
    pub fn cached(&self, finger: Finger) -> Option<bool> {
        self.results[finger.index()]
    }

    /// Number of rays actually cast this frame.
    #[must_use]
    pub fn issued(&self) -> usize {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::UnitQuaternion;
    use std::cell::Cell;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_ray_follows_tip_orientation() {
        let tip = Pose::from_position_rotation(
            Point3::new(0.1, 0.0, 0.0),
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), FRAC_PI_2),
        );
        let ray = TipRay::from_tip(&tip, &HandConfig::default());
        assert_relative_eq!(ray.direction, -Vector3::z(), epsilon = 1e-12);

        let flipped = TipRay::from_tip(&tip, &HandConfig::default().with_flipped_tip_rays(true));
        assert_relative_eq!(flipped.direction, Vector3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_rays() {
        let tip = Pose::identity();
        let zero_len = TipRay::from_tip(&tip, &HandConfig::default().with_tip_collision_distance(0.0));
        assert!(zero_len.unit_direction().is_none());

        let zero_dir = TipRay::from_tip(&tip, &HandConfig::default().with_tip_ray_axis(Vector3::zeros()));
        assert!(zero_dir.unit_direction().is_none());
    }

    #[test]
    fn test_probe_is_cached_per_finger() {
        let calls = Cell::new(0);
        let probe = |_: &Point3<f64>, _: &UnitVector3<f64>, _: f64| {
            calls.set(calls.get() + 1);
            true
        };
        let config = HandConfig::default();
        let mut probes = FingertipProbes::new();

        assert!(probes.hit(Finger::Index, &Pose::identity(), &config, &probe));
        assert!(probes.hit(Finger::Index, &Pose::identity(), &config, &probe));
        assert!(probes.hit(Finger::Ring, &Pose::identity(), &config, &probe));

        assert_eq!(calls.get(), 2);
        assert_eq!(probes.issued(), 2);
        assert_eq!(probes.cached(Finger::Index), Some(true));
        assert_eq!(probes.cached(Finger::Thumb), None);
    }

    #[test]
    fn test_degenerate_probe_never_reaches_scene() {
        let probe = |_: &Point3<f64>, _: &UnitVector3<f64>, _: f64| -> bool {
            panic!("degenerate ray must not be cast")
        };
        let config = HandConfig::default().with_tip_collision_distance(0.0);
        let mut probes = FingertipProbes::new();

        assert!(!probes.hit(Finger::Pinky, &Pose::identity(), &config, &probe));
        assert_eq!(probes.issued(), 0);
        assert_eq!(probes.cached(Finger::Pinky), Some(false));
    }

    #[test]
    fn test_probe_receives_distance() {
        let probe = |origin: &Point3<f64>, dir: &UnitVector3<f64>, max: f64| {
            // A wall 1.5 cm in front of the tip.
            let wall_x = 0.015;
            dir.x > 0.0 && (wall_x - origin.x) / dir.x <= max
        };
        let mut probes = FingertipProbes::new();
        assert!(probes.hit(Finger::Thumb, &Pose::identity(), &HandConfig::default(), &probe));

        let mut probes = FingertipProbes::new();
        let short = HandConfig::default().with_tip_collision_distance(0.01);
        assert!(!probes.hit(Finger::Thumb, &Pose::identity(), &short, &probe));
        assert!(!NoCollision.probe(&Point3::origin(), &Vector3::z_axis(), 1.0));
    }
}
