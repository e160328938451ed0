//! Mandelbulb distance estimator.
//!
//! The 3D analog of the Mandelbrot set: each iteration converts the orbit point
//! to spherical coordinates, raises the radius to `power`, multiplies both
//! angles by `power`, and adds back the query point. A running derivative turns
//! the discrete escape iteration into a continuous distance estimate.
//!
//! The estimate `0.5 * ln(r) * r / dr` is not a proven lower bound. It is close
//! enough for sphere tracing in practice, and the shading is tuned against it,
//! so its constants are kept as they are.

use glam::Vec3A;

use crate::field::{DistanceField, DistanceSample, MIN_SURFACE_DISTANCE};

/// Radius of the sphere that encloses the whole set.
const BOUNDING_RADIUS: f32 = 1.2;

/// Beyond this distance from the bounding sphere the bound itself is returned.
const BOUNDING_MARGIN: f32 = 1.0;

/// Higher is more detailed and fills holes.
const ITERATIONS: usize = 18;

/// Orbits leaving this radius have escaped.
const ESCAPE_RADIUS: f32 = 2.0;

/// Shade multiplier per iteration; points deeper in the set get darker.
const SHADE_DECAY: f32 = 0.725;

/// Subtracted from the estimate so the root finder sees a real sign change.
const DISTANCE_BIAS: f32 = 0.001;

/// Escape-time fractal of order `power`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mandelbulb {
    /// Exponent of the recurrence. 8 gives the familiar bulb.
    pub power: f32,
}

impl Default for Mandelbulb {
    fn default() -> Self {
        Self::new(8.0)
    }
}

impl Mandelbulb {
    /// Create a Mandelbulb of the given order.
    pub fn new(power: f32) -> Self {
        Self { power }
    }
}

impl DistanceField for Mandelbulb {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        let mut shade = 1.0;

        // Cheap bound so distant rays do not pay for the iteration.
        let bound = point.length() - BOUNDING_RADIUS;
        if bound > BOUNDING_MARGIN {
            return DistanceSample::new(bound, shade);
        }

        let power = self.power;
        let mut orbit = point;
        let mut derivative = 1.0;

        for _ in 0..ITERATIONS {
            shade *= SHADE_DECAY;
            let r = orbit.length();

            if r > ESCAPE_RADIUS {
                shade = ((shade + 0.075) * 4.1).min(1.0);
                let distance = 0.5 * r.ln() * r / derivative - DISTANCE_BIAS;
                return DistanceSample::new(distance, shade);
            }

            // At the origin the polar angle is undefined; r^power is 0 there anyway.
            let cos_theta = if r > 0.0 { orbit.z / r } else { 1.0 };
            let theta = cos_theta.clamp(-1.0, 1.0).acos() * power;
            let phi = orbit.y.atan2(orbit.x) * power;

            derivative = r.powf(power - 1.0) * power * derivative + 1.0;

            let (sin_theta, cos_theta) = theta.sin_cos();
            let (sin_phi, cos_phi) = phi.sin_cos();
            orbit = Vec3A::new(sin_theta * cos_phi, sin_theta * sin_phi, cos_theta)
                * r.powf(power)
                + point;
        }

        // Never escaped: on or inside the set. Not zero, so re-sampling a hit
        // point does not register as a fresh crossing.
        DistanceSample::new(MIN_SURFACE_DISTANCE, shade)
    }
}
