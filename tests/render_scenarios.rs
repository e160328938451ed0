//! End-to-end checks of the root finders and the ray-cast pipeline.

use bulbtrace::camera::Camera;
use bulbtrace::config::RenderConfig;
use bulbtrace::field::{DistanceField, Orientation};
use bulbtrace::interval::Interval;
use bulbtrace::mandelbulb::Mandelbulb;
use bulbtrace::ray::Ray;
use bulbtrace::roots::{find_roots_bisection, smallest_root_of_distance};
use bulbtrace::rounded_box::RoundedBox;
use bulbtrace::sink::{Color, HdrImage, PixelSink};
use bulbtrace::sphere::Sphere;
use glam::{Vec2, Vec3A};

fn trace<F: DistanceField>(field: &F, ray: Ray, domain: Interval) -> Option<f32> {
    smallest_root_of_distance(|t| field.distance(ray.at(t)), domain)
}

// ============================================================================
// Root finding on distance fields
// ============================================================================

#[test]
fn rounded_box_hit_depth() {
    let field = RoundedBox::new(0.5, 0.05);
    let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::Z);
    let t = trace(&field, ray, Interval::new(0.0, 10.0)).expect("ray aimed at the box should hit");
    assert!((t - 4.45).abs() < 1e-3, "t = {t}");
}

#[test]
fn sphere_hit_depth_for_several_radii() {
    for (radius, distance) in [(0.5, 3.0), (1.0, 5.0), (2.0, 9.5)] {
        let field = Sphere::new(Vec3A::ZERO, radius);
        let dir = Vec3A::new(1.0, -2.0, 0.5).normalize();
        let ray = Ray::new(-dir * distance, dir);
        let t = trace(&field, ray, Interval::new(0.0, 10.0)).expect("should hit");
        assert!((t - (distance - radius)).abs() < 1e-3, "radius {radius}: t = {t}");
    }
}

#[test]
fn ray_facing_away_misses() {
    let field = Sphere::new(Vec3A::ZERO, 1.0);
    let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), -Vec3A::Z);
    assert_eq!(trace(&field, ray, Interval::new(0.0, 10.0)), None);

    let bulb = Mandelbulb::new(8.0);
    assert_eq!(trace(&bulb, ray, Interval::new(0.0, 10.0)), None);
}

#[test]
fn ray_passing_beside_the_box_misses() {
    let field = RoundedBox::new(0.5, 0.05);
    let ray = Ray::new(Vec3A::new(1.0, 0.0, -5.0), Vec3A::Z);
    assert_eq!(trace(&field, ray, Interval::new(0.0, 10.0)), None);
}

#[test]
fn mandelbulb_is_hit_from_outside() {
    let bulb = Mandelbulb::new(8.0);
    let ray = Ray::new(Vec3A::new(0.0, 0.0, -5.0), Vec3A::Z);
    let t = trace(&bulb, ray, Interval::new(0.0, 10.0)).expect("the bulb straddles the view axis");
    let hit = ray.at(t);
    assert!(hit.length() < 1.2, "hit point {hit:?} should be inside the bounding sphere");
    assert!(bulb.distance(hit) < 1e-2);
}

#[test]
fn mandelbulb_far_sample_is_bounding_sphere_distance() {
    let bulb = Mandelbulb::new(8.0).oriented(Orientation::from_yaw_pitch_roll(0.5, 0.5, 0.5));
    let origin = Vec3A::new(6.0, 0.0, -8.0);
    let ray = Ray::new(origin, -origin);
    let first = bulb.sample(ray.at(0.0));
    assert!((first.distance - (10.0 - 1.2)).abs() < 1e-4);
}

#[test]
fn quadratic_roots_by_bisection() {
    let mut roots = find_roots_bisection(|x| x * x - 1.0, Interval::new(-4.0, 4.0));
    roots.sort_by(f32::total_cmp);
    assert_eq!(roots.len(), 2);
    assert!((roots[0] + 1.0).abs() < 1e-3);
    assert!((roots[1] - 1.0).abs() < 1e-3);
}

// ============================================================================
// Whole-image rendering
// ============================================================================

/// Background color as the pixel pipeline should produce it, computed from the
/// configuration alone.
fn expected_background_pixel(config: &RenderConfig, x: u32, y: u32) -> Color {
    let size = Vec2::new(config.width as f32, config.height as f32);
    let center = Color::from_array(config.background_center);
    let rim = Color::from_array(config.background_rim);
    let coord = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

    let offsets = [(-0.125, -0.375), (0.375, -0.125), (0.125, 0.375), (-0.375, 0.125)];
    let mut sum = Color::ZERO;
    for (dx, dy) in offsets {
        let sample = coord + Vec2::new(dx, dy);
        let t = ((sample / size - Vec2::splat(0.66)) * 2.5).length().sqrt();
        sum += center + (rim - center) * t;
    }
    let mean = sum / 4.0;
    let encoded = Color::new(mean.x.sqrt(), mean.y.sqrt(), mean.z.sqrt());

    let xy = 2.0 * coord / size - Vec2::ONE;
    let vignette = 0.5 + 0.5 * ((xy.x + 1.0) * (xy.y + 1.0) * (xy.x - 1.0) * (xy.y - 1.0)).powf(0.2);
    encoded * vignette
}

#[test]
fn background_only_render_matches_gradient() {
    let config = RenderConfig {
        width: 4,
        height: 4,
        ..RenderConfig::default()
    };
    let camera = Camera::new(&config).unwrap();
    // Behind the eye, so no ray can reach it.
    let nothing = Sphere::new(Vec3A::new(0.0, 0.0, -100.0), 1.0);

    let image = camera.render(&nothing);
    for y in 0..4 {
        for x in 0..4 {
            let got = image.pixel(i64::from(x), i64::from(y));
            let want = expected_background_pixel(&config, x, y);
            assert!((got - want).abs().max_element() < 1e-5, "pixel ({x}, {y}): {got:?} != {want:?}");
        }
    }
}

#[test]
fn rendering_is_deterministic() {
    let config = RenderConfig {
        width: 24,
        height: 16,
        ..RenderConfig::default()
    };
    let camera = Camera::new(&config).unwrap();
    let field = Mandelbulb::new(6.0).oriented(Orientation::from_yaw_pitch_roll(0.5, 0.5, 0.5));
    let a = camera.render(&field);
    let b = camera.render(&field);
    assert_eq!(a, b);
}

#[test]
fn render_into_custom_sink() {
    struct Counting {
        writes: usize,
        inner: HdrImage,
    }

    impl PixelSink for Counting {
        fn width(&self) -> u32 {
            self.inner.width()
        }
        fn height(&self) -> u32 {
            self.inner.height()
        }
        fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
            self.writes += 1;
            self.inner.set_pixel(x, y, color);
        }
        fn pixel(&self, x: i64, y: i64) -> Color {
            self.inner.pixel(x, y)
        }
    }

    let config = RenderConfig {
        width: 5,
        height: 3,
        ..RenderConfig::default()
    };
    let camera = Camera::new(&config).unwrap();
    let mut sink = Counting {
        writes: 0,
        inner: HdrImage::new(5, 3),
    };
    camera.render_into(&RoundedBox::default(), &mut sink);
    assert_eq!(sink.writes, 15);
    assert_eq!(sink.inner, camera.render(&RoundedBox::default()));
}
