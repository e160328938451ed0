//! Camera for ray generation, shading and image rendering.

use glam::{Vec2, Vec3A};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use rayon::prelude::*;

use crate::config::RenderConfig;
use crate::error::ConfigError;
use crate::field::{DistanceField, MIN_SURFACE_DISTANCE};
use crate::interval::Interval;
use crate::ray::Ray;
use crate::roots::smallest_root_of_distance;
use crate::sink::{Color, HdrImage, PixelSink};

/// Distance from the eye to the image plane's origin along the view axis.
const CAMERA_DISTANCE: f32 = 5.0;

/// Range of ray parameters searched for a surface.
const RAY_RANGE: Interval = Interval {
    min: 0.0,
    max: 10.0,
};

/// Screen-space anchor of the background gradient, as a fraction of the image.
const BACKGROUND_ANCHOR: Vec2 = Vec2::new(0.66, 0.66);

/// Rotated-grid sub-pixel offsets for 4x supersampling.
const SAMPLE_OFFSETS: [Vec2; 4] = [
    Vec2::new(-0.125, -0.375),
    Vec2::new(0.375, -0.125),
    Vec2::new(0.125, 0.375),
    Vec2::new(-0.375, 0.125),
];

/// Surface color as a function of height (the occlusion term) on [0, 1].
///
/// Implement this to recolor the surface; the default is plain white.
pub trait Surface: Sync + Send {
    /// Albedo at the given height.
    fn color(&self, _height: f32) -> Color {
        Color::ONE
    }
}

/// Uniform white surface.
#[derive(Debug, Clone, Copy, Default)]
pub struct White;

impl Surface for White {}

/// Blend between two colors by height.
#[derive(Debug, Clone, Copy)]
pub struct HeightGradient {
    /// Color in the deepest cracks
    pub low: Color,
    /// Color on exposed ridges
    pub high: Color,
}

impl Surface for HeightGradient {
    fn color(&self, height: f32) -> Color {
        self.low.lerp(self.high, height.clamp(0.0, 1.0))
    }
}

/// Sphere-tracing camera with a fixed two-light shading model.
///
/// Holds only read-only configuration, so one camera can shade every pixel of
/// an image concurrently.
pub struct Camera {
    /// Rendered image width in pixel count
    image_width: u32,
    /// Rendered image height in pixel count
    image_height: u32,
    /// Lens factor dividing the outward bend of rays
    lens_zoom: f32,
    /// Unit direction toward the key light
    light_direction: Vec3A,
    key_light: Color,
    fill_light: Color,
    background_center: Color,
    background_rim: Color,
    highlight_tint: Color,
    surface: Box<dyn Surface>,
    /// Show an indicatif progress bar while rendering
    pub show_progress: bool,
}

impl std::fmt::Debug for Camera {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("image_width", &self.image_width)
            .field("image_height", &self.image_height)
            .field("lens_zoom", &self.lens_zoom)
            .field("light_direction", &self.light_direction)
            .finish_non_exhaustive()
    }
}

impl Camera {
    /// Creates a camera with a white surface.
    ///
    /// Fails if the configuration has empty dimensions, a non-positive scale
    /// factor or a zero light direction.
    pub fn new(config: &RenderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            image_width: config.width,
            image_height: config.height,
            lens_zoom: config.lens_zoom,
            light_direction: config.light_direction(),
            key_light: Color::from_array(config.key_light),
            fill_light: Color::from_array(config.fill_light),
            background_center: Color::from_array(config.background_center),
            background_rim: Color::from_array(config.background_rim),
            highlight_tint: Color::from_array(config.highlight_tint),
            surface: Box::new(White),
            show_progress: false,
        })
    }

    /// Replace the surface coloring.
    pub fn with_surface(mut self, surface: impl Surface + 'static) -> Self {
        self.surface = Box::new(surface);
        self
    }

    /// Image size in pixels.
    pub fn image_size(&self) -> Vec2 {
        Vec2::new(self.image_width as f32, self.image_height as f32)
    }

    /// Primary ray through `coord`, in pixel units.
    ///
    /// The eye sits on a plane at `z = -5` spanning normalized device
    /// coordinates (x scaled by the aspect ratio). Each ray aims at `(0, 0, 1)`
    /// and is bent outward in proportion to its screen position divided by the
    /// lens zoom, a cheap perspective.
    pub fn get_ray(&self, coord: Vec2) -> Ray {
        let size = self.image_size();
        let mut origin = Vec3A::new(
            2.0 * coord.x / size.x - 1.0,
            1.0 - 2.0 * coord.y / size.y,
            -CAMERA_DISTANCE,
        );
        origin.x *= size.x / size.y;

        let toward_center = (Vec3A::Z - origin).normalize_or_zero();
        let bend = 0.2 * Vec3A::new(origin.x, origin.y, 0.0) / self.lens_zoom;
        Ray::new(origin, toward_center + bend)
    }

    /// Background gradient at `coord`.
    pub fn background(&self, coord: Vec2) -> Color {
        let offset = (coord / self.image_size() - BACKGROUND_ANCHOR) * 2.5;
        self.background_center
            .lerp(self.background_rim, offset.length().sqrt())
    }

    /// Color of a single sample. `(0.5, 0.5)` is the center of the top-left pixel.
    pub fn compute_sample(&self, coord: Vec2, field: &dyn DistanceField) -> Color {
        let ray = self.get_ray(coord);
        match smallest_root_of_distance(|t| field.distance(ray.at(t)), RAY_RANGE) {
            Some(t) => self.shade_hit(&ray, t, field),
            None => self.background(coord),
        }
    }

    /// Shade the surface found at parameter `t` along `ray`.
    fn shade_hit(&self, ray: &Ray, t: f32, field: &dyn DistanceField) -> Color {
        // Small step for the numerical normal; scaled up for the broad one.
        let epsilon = MIN_SURFACE_DISTANCE * 5.0;

        let hit = ray.at(t);
        let sample = field.sample(hit);
        let (d, ao) = (sample.distance, sample.shade);

        // Back off the surface before differentiating.
        let x = hit - ray.direction * epsilon;

        let gradient = |scale: f32| {
            let h = epsilon * scale;
            Vec3A::new(
                d - field.distance(x - Vec3A::new(h, 0.0, 0.0)),
                d - field.distance(x - Vec3A::new(0.0, h, 0.0)),
                d - field.distance(x - Vec3A::new(0.0, 0.0, h)),
            )
            .normalize_or_zero()
        };
        let fine = gradient(1.0);
        let coarse = gradient(50.0);

        // Bend the detailed normal toward the broad shape and the bounding
        // sphere to tame fractal noise.
        let normal = (fine + coarse + x.normalize_or_zero()).normalize_or_zero();

        let wrap = (0.7 * self.light_direction.dot(normal) + 0.6).clamp(0.0, 1.0);
        let diffuse = self.fill_light.lerp(self.key_light, ao * wrap) * self.surface.color(ao);
        let highlight = self.light_direction.dot(coarse).max(0.0).powf(5.0) * self.highlight_tint;

        ao * (diffuse + highlight)
    }

    /// Antialiased, display-encoded color of the pixel centered at `coord`.
    pub fn compute_pixel(&self, coord: Vec2, field: &dyn DistanceField) -> Color {
        let sum: Color = SAMPLE_OFFSETS
            .iter()
            .map(|&offset| self.compute_sample(coord + offset, field))
            .sum();
        let color = sum / SAMPLE_OFFSETS.len() as f32;

        // Coarse linear to display encoding.
        let color = color.max(Color::ZERO).powf(0.5);

        color * self.vignette(coord)
    }

    /// Darkening toward the image corners.
    pub fn vignette(&self, coord: Vec2) -> f32 {
        let xy = 2.0 * coord / self.image_size() - Vec2::ONE;
        let falloff = (xy.x + 1.0) * (xy.y + 1.0) * (xy.x - 1.0) * (xy.y - 1.0);
        0.5 + 0.5 * falloff.max(0.0).powf(0.2)
    }

    /// Render every pixel of `field` into `sink`.
    ///
    /// Rows are computed in parallel and written back in row-major order, so
    /// the result is identical to a sequential render.
    pub fn render_into<S: PixelSink + ?Sized>(&self, field: &dyn DistanceField, sink: &mut S) {
        let width = self.image_width.min(sink.width());
        let height = self.image_height.min(sink.height());

        let pb = if self.show_progress {
            let pb = ProgressBar::new(u64::from(height));
            if let Ok(style) = ProgressStyle::default_bar().template("{bar:40} {pos}/{len} rows ETA: {eta}") {
                pb.set_style(style);
            }
            pb
        } else {
            ProgressBar::hidden()
        };

        let rows: Vec<Vec<Color>> = (0..height)
            .into_par_iter()
            .map(|y| {
                let row = (0..width)
                    .map(|x| self.compute_pixel(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), field))
                    .collect();
                pb.inc(1);
                row
            })
            .collect();
        pb.finish_and_clear();

        for (y, row) in rows.into_iter().enumerate() {
            for (x, color) in row.into_iter().enumerate() {
                sink.set_pixel(x as i64, y as i64, color);
            }
        }
    }

    /// Render `field` into a new image of the configured size.
    pub fn render(&self, field: &dyn DistanceField) -> HdrImage {
        let mut image = HdrImage::new(self.image_width, self.image_height);

        debug!("Tracing {}x{} pixels on {} threads", self.image_width, self.image_height, rayon::current_num_threads());
        let generation_start = std::time::Instant::now();
        self.render_into(field, &mut image);
        info!("Image generated in {:.2?}", generation_start.elapsed());

        image
    }
}
