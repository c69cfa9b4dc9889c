//! Scalar channel shaping: exponential smoothing and knuckle spreading.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Linear interpolation with `t` clamped to `[0, 1]`.
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    from + (to - from) * t
}

/// Split `value` in `[0, 1]` across `N` consecutive joints.
///
/// Joint `i` covers the sub-range `[i / N, (i + 1) / N]` and reads `0`
/// below it, `1` above it and ramps linearly inside it, so the joints curl
/// one after another as the value grows.
///
/// ```
/// use hand_input::spread_value;
///
/// assert_eq!(spread_value::<3>(0.5), [1.0, 0.5, 0.0]);
/// ```
#[must_use]
pub fn spread_value<const N: usize>(value: f64) -> [f64; N] {
    let mut out = [0.0; N];
    #[allow(clippy::cast_precision_loss)]
    let scaled = value.clamp(0.0, 1.0) * N as f64;
    for (i, slot) in out.iter_mut().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let joint = scaled - i as f64;
        *slot = joint.clamp(0.0, 1.0);
    }
    out
}

/// Exponential smoothing of one input channel.
///
/// Each step moves the output toward the raw reading by `rate * dt` of the
/// remaining gap. A disabled channel passes readings through.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Smoother {
    enabled: bool,
    rate: f64,
    previous: f64,
}

impl Smoother {
    /// Smoother approaching readings at `rate` per second.
    #[must_use]
    pub fn new(rate: f64) -> Self {
        Self {
            enabled: true,
            rate,
            previous: 0.0,
        }
    }

    /// Pass-through channel.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            rate: 0.0,
            previous: 0.0,
        }
    }

    /// Whether smoothing is applied.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Approach rate per second.
    #[must_use]
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Last smoothed output.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.previous
    }

    /// Feed a raw reading and return the smoothed value.
    pub fn step(&mut self, raw: f64, dt: f64) -> f64 {
        if !self.enabled {
            return raw;
        }
        self.previous = lerp(self.previous, raw, dt * self.rate);
        self.previous
    }

    /// Forget the smoothing history.
    pub fn reset(&mut self) {
        self.previous = 0.0;
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(5.0)
    }
}
