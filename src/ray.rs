//! Ray representation for sphere tracing.
//!
//! A ray is defined as r(t) = origin + t * direction. Primary rays are built
//! once per pixel sample and never outlive it.

use glam::Vec3A;

/// Ray in 3D space defined by origin and unit direction.
///
/// Mathematical representation: r(t) = origin + t * direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Starting point of the ray in world coordinates (the eye for primary rays).
    pub origin: Vec3A,

    /// Unit direction of the ray.
    ///
    /// The sphere tracer relies on `t` being a world-space distance, so the
    /// constructor normalizes whatever it is given. A zero vector stays zero.
    pub direction: Vec3A,
}

impl Ray {
    /// Create a new ray, normalizing the direction.
    pub fn new(origin: Vec3A, direction: Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Compute a point at parameter t along the ray.
    ///
    /// Returns r(t) = origin + t * direction.
    pub fn at(&self, t: f32) -> Vec3A {
        self.origin + t * self.direction
    }
}
