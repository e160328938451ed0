//! Rounded box distance field.
//!
//! Closed-form estimator for an axis-aligned cube centered at the origin with
//! rounded edges. Exact outside the box, so it doubles as a correctness oracle
//! for the root finder.

use glam::Vec3A;

use crate::field::{DistanceField, DistanceSample};

/// Rounded cube centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundedBox {
    /// Corner offset along each axis before rounding (half the inner cube's edge).
    pub side: f32,
    /// Radius of the rounding added around the inner cube.
    pub rounding: f32,
}

impl Default for RoundedBox {
    /// Side 0.5 with rounding of a tenth of the side.
    fn default() -> Self {
        Self::new(0.5, 0.05)
    }
}

impl RoundedBox {
    /// Create a rounded box. Negative sizes are clamped to 0.
    pub fn new(side: f32, rounding: f32) -> Self {
        Self {
            side: side.max(0.0),
            rounding: rounding.max(0.0),
        }
    }
}

impl DistanceField for RoundedBox {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        let q = (point.abs() - Vec3A::splat(self.side)).max(Vec3A::ZERO);
        DistanceSample::new(q.length() - self.rounding, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_on_axis_at_side_plus_rounding() {
        let b = RoundedBox::new(0.5, 0.05);
        for axis in [Vec3A::X, Vec3A::Y, Vec3A::Z, -Vec3A::X] {
            let d = b.distance(axis * 0.55);
            assert!(d.abs() < 1e-4, "expected surface at 0.55 along {axis:?}, got {d}");
        }
    }

    #[test]
    fn corner_distance_is_exact() {
        let b = RoundedBox::new(1.0, 0.1);
        let d = b.distance(Vec3A::new(2.0, 2.0, 2.0));
        assert!((d - (3.0f32.sqrt() - 0.1)).abs() < 1e-5);
    }

    #[test]
    fn inside_reports_minus_rounding() {
        let b = RoundedBox::new(0.5, 0.05);
        assert!((b.distance(Vec3A::ZERO) + 0.05).abs() < 1e-6);
        assert_eq!(b.shade(Vec3A::ZERO), 1.0);
    }
}
