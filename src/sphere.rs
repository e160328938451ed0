//! Sphere distance field.
//!
//! The simplest exact estimator. Used as a test oracle for the sphere tracer
//! and to build scenes that never intersect the view.

use glam::Vec3A;

use crate::field::{DistanceField, DistanceSample};

/// Sphere defined by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center point of the sphere in the field's local frame.
    pub center: Vec3A,

    /// Radius of the sphere (always non-negative).
    ///
    /// Negative radius values are clamped to 0.0 in the constructor.
    pub radius: f32,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// Negative radius values are clamped to 0.0.
    pub fn new(center: Vec3A, radius: f32) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
        }
    }
}

impl DistanceField for Sphere {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        DistanceSample::new((point - self.center).length() - self.radius, 1.0)
    }
}
