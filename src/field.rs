//! Distance fields: implicit surfaces sampled by the sphere tracer.
//!
//! Defines the [`DistanceField`] trait for surfaces, [`DistanceSample`] for
//! the value returned at a query point, and [`Oriented`] for evaluating a
//! field under a fixed rotation.

use glam::{Mat3A, Vec3A};

use crate::mandelbulb::Mandelbulb;
use crate::rounded_box::RoundedBox;
use crate::sphere::Sphere;

/// A point this close to the surface is considered to be on the surface.
///
/// Larger values converge faster but blur fine detail.
pub const MIN_SURFACE_DISTANCE: f32 = 0.0003;

/// Distance estimate and crack-darkening term at a query point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSample {
    /// Lower bound on the distance from the query point to the surface.
    pub distance: f32,
    /// Occlusion proxy in [0, 1]; lower in cracks, higher on ridges.
    pub shade: f32,
}

impl DistanceSample {
    /// Create a sample.
    pub fn new(distance: f32, shade: f32) -> Self {
        Self { distance, shade }
    }
}

/// Surface described by a distance estimator.
///
/// Must be thread-safe (Sync + Send) so rows of an image can be traced in
/// parallel against the same field.
pub trait DistanceField: Sync + Send {
    /// Estimate the distance to the surface and the shade at `point`.
    fn sample(&self, point: Vec3A) -> DistanceSample;

    /// Distance component of [`DistanceField::sample`].
    fn distance(&self, point: Vec3A) -> f32 {
        self.sample(point).distance
    }

    /// Shade component of [`DistanceField::sample`].
    fn shade(&self, point: Vec3A) -> f32 {
        self.sample(point).shade
    }

    /// Evaluate this field in the local frame given by `orientation`.
    fn oriented(self, orientation: Orientation) -> Oriented<Self>
    where
        Self: Sized,
    {
        Oriented::new(self, orientation)
    }
}

impl<F: DistanceField + ?Sized> DistanceField for &F {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        (**self).sample(point)
    }
}

/// Rotation applied to query points before a field is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    rotation: Mat3A,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Orientation {
    /// No rotation.
    pub const IDENTITY: Orientation = Orientation {
        rotation: Mat3A::IDENTITY,
    };

    /// Build the rotation roll ∘ pitch ∘ yaw (angles in radians).
    ///
    /// Yaw turns about Y, pitch about X and roll about Z; the axis order is
    /// fixed and the result is absolute, not relative to any earlier value.
    pub fn from_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Self {
        let (sr, cr) = roll.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sy, cy) = yaw.sin_cos();

        let roll = from_rows([[cr, -sr, 0.0], [sr, cr, 0.0], [0.0, 0.0, 1.0]]);
        let pitch = from_rows([[1.0, 0.0, 0.0], [0.0, cp, sp], [0.0, -sp, cp]]);
        let yaw = from_rows([[cy, 0.0, -sy], [0.0, 1.0, 0.0], [sy, 0.0, cy]]);

        Self {
            rotation: roll * pitch * yaw,
        }
    }

    /// The rotation matrix.
    pub fn matrix(&self) -> Mat3A {
        self.rotation
    }

    /// Transform a world-space point into the field's local frame.
    pub fn apply(&self, point: Vec3A) -> Vec3A {
        self.rotation * point
    }
}

/// glam matrices are column-major; the rotations above are written by row.
fn from_rows(rows: [[f32; 3]; 3]) -> Mat3A {
    Mat3A::from_cols_array_2d(&rows).transpose()
}

/// A field evaluated under a fixed [`Orientation`].
///
/// This is an immutable value: re-orienting builds a new wrapper instead of
/// mutating a shared shape, so evaluation stays referentially transparent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oriented<F> {
    field: F,
    orientation: Orientation,
}

impl<F: DistanceField> Oriented<F> {
    /// Wrap `field` with `orientation`.
    pub fn new(field: F, orientation: Orientation) -> Self {
        Self { field, orientation }
    }

    /// Replace the orientation. The previous rotation is discarded, not composed.
    pub fn with_orientation(self, orientation: Orientation) -> Self {
        Self {
            field: self.field,
            orientation,
        }
    }

    /// Current orientation.
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// The unrotated field.
    pub fn inner(&self) -> &F {
        &self.field
    }
}

impl<F: DistanceField> DistanceField for Oriented<F> {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        self.field.sample(self.orientation.apply(point))
    }
}

/// Closed set of shapes the renderer can be configured with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Escape-time fractal estimator.
    Mandelbulb(Mandelbulb),
    /// Analytic rounded box.
    RoundedBox(RoundedBox),
    /// Analytic sphere.
    Sphere(Sphere),
}

impl DistanceField for Shape {
    fn sample(&self, point: Vec3A) -> DistanceSample {
        match self {
            Shape::Mandelbulb(bulb) => bulb.sample(point),
            Shape::RoundedBox(rounded) => rounded.sample(point),
            Shape::Sphere(sphere) => sphere.sample(point),
        }
    }
}

impl From<Mandelbulb> for Shape {
    fn from(bulb: Mandelbulb) -> Self {
        Shape::Mandelbulb(bulb)
    }
}

impl From<RoundedBox> for Shape {
    fn from(rounded: RoundedBox) -> Self {
        Shape::RoundedBox(rounded)
    }
}

impl From<Sphere> for Shape {
    fn from(sphere: Sphere) -> Self {
        Shape::Sphere(sphere)
    }
}
