//! 2D function plotting.
//!
//! Draws axes and the graph of a real function into a [`PixelSink`], then
//! boxes every root the scanning root finders report. Pixel (0, 0) is the top
//! left; the origin of the plot sits at the image center and one pixel spans
//! the same distance on both axes.

use glam::{IVec2, Vec2};
use log::debug;

use crate::interval::Interval;
use crate::roots::{find_roots_bisection, find_roots_newton};
use crate::sink::{Color, PixelSink};

/// Color of the boxes drawn around roots.
pub const ROOT_BOX_COLOR: Color = Color::new(0.0, 1.0, 1.0);

/// Half-length of axis tick marks, in pixels.
const TICK_HALF_LENGTH: i64 = 3;

/// Which refinement the plotter runs after scanning for sign changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootMethod {
    /// Scan every 0.2 and bisect.
    #[default]
    Bisection,
    /// Scan every 0.3 and run Newton–Raphson.
    Newton,
}

/// Polynomial with coefficients from the highest power down.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f32>,
}

impl Polynomial {
    /// `coefficients[0] * x^(n-1) + ... + coefficients[n-1]`.
    pub fn new(coefficients: Vec<f32>) -> Self {
        Self { coefficients }
    }

    /// Evaluate with Horner's rule. The empty polynomial is 0.
    pub fn eval(&self, x: f32) -> f32 {
        self.coefficients.iter().fold(0.0, |acc, &c| acc * x + c)
    }
}

/// Draw a 1-pixel line from `p0` to `p1`, inclusive.
///
/// Steps along the longer axis so the line has no gaps. Vertical lines and
/// single points need no slope. Only the stretch inside the image is walked,
/// so endpoints far off-image cost nothing.
pub fn draw_line<S: PixelSink + ?Sized>(sink: &mut S, p0: IVec2, p1: IVec2, color: Color) {
    let (max_x, max_y) = (i64::from(sink.width()) - 1, i64::from(sink.height()) - 1);
    if max_x < 0 || max_y < 0 {
        return;
    }

    // Saturated plot coordinates overflow i32 deltas.
    let (x0, y0) = (i64::from(p0.x), i64::from(p0.y));
    let (x1, y1) = (i64::from(p1.x), i64::from(p1.y));
    let (dx, dy) = (x1 - x0, y1 - y0);

    if dx == 0 {
        for y in y0.min(y1).max(0)..=y0.max(y1).min(max_y) {
            sink.set_pixel(x0, y, color);
        }
        return;
    }

    let slope = dy as f64 / dx as f64;
    if slope.abs() < 1.0 {
        let (start_x, start_y, end_x) = if x0 <= x1 { (x0, y0, x1) } else { (x1, y1, x0) };
        for x in start_x.max(0)..=end_x.min(max_x) {
            let y = start_y as f64 + slope * (x - start_x) as f64;
            sink.set_pixel(x, y.round() as i64, color);
        }
    } else {
        let (start_x, start_y, end_y) = if y0 <= y1 { (x0, y0, y1) } else { (x1, y1, y0) };
        let inverse = 1.0 / slope;
        for y in start_y.max(0)..=end_y.min(max_y) {
            let x = start_x as f64 + inverse * (y - start_y) as f64;
            sink.set_pixel(x.round() as i64, y, color);
        }
    }
}

/// Draw the outline of the axis-aligned box with opposite corners `p0` and `p1`.
pub fn draw_box<S: PixelSink + ?Sized>(sink: &mut S, p0: IVec2, p1: IVec2, color: Color) {
    let corner_a = IVec2::new(p0.x, p1.y);
    let corner_b = IVec2::new(p1.x, p0.y);
    draw_line(sink, p0, corner_a, color);
    draw_line(sink, corner_a, p1, color);
    draw_line(sink, p1, corner_b, color);
    draw_line(sink, corner_b, p0, color);
}

/// Maps between plot coordinates and pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotFrame {
    center: Vec2,
    /// Plot units per pixel
    units_per_pixel: f32,
}

impl PlotFrame {
    /// Frame for a `width × height` image showing `domain` across its width.
    pub fn new(width: u32, height: u32, domain: Interval) -> Self {
        let span = (width.max(2) - 1) as f32;
        Self {
            center: Vec2::new((width.max(1) - 1) as f32 / 2.0, (height.max(1) - 1) as f32 / 2.0),
            units_per_pixel: domain.size() / span,
        }
    }

    /// Pixel position of the plot point `(x, y)`.
    pub fn to_pixel(&self, x: f32, y: f32) -> IVec2 {
        let p = self.center + Vec2::new(x, -y) / self.units_per_pixel;
        IVec2::new(p.x.round() as i32, p.y.round() as i32)
    }

    /// Plot units covered by one pixel.
    pub fn units_per_pixel(&self) -> f32 {
        self.units_per_pixel
    }
}

/// Draw both axes through the image center with `ticks_x`/`ticks_y` evenly
/// spaced tick marks.
pub fn draw_axes<S: PixelSink + ?Sized>(sink: &mut S, ticks_x: u32, ticks_y: u32, color: Color) {
    let (w, h) = (sink.width() as i32 - 1, sink.height() as i32 - 1);
    if w < 0 || h < 0 {
        return;
    }
    let (cx, cy) = (w / 2, h / 2);
    draw_line(sink, IVec2::new(0, cy), IVec2::new(w, cy), color);
    draw_line(sink, IVec2::new(cx, 0), IVec2::new(cx, h), color);

    let tick = TICK_HALF_LENGTH as i32;
    for i in 0..=ticks_x {
        let x = (w as f32 * i as f32 / ticks_x.max(1) as f32).round() as i32;
        draw_line(sink, IVec2::new(x, cy - tick), IVec2::new(x, cy + tick), color);
    }
    for i in 0..=ticks_y {
        let y = (h as f32 * i as f32 / ticks_y.max(1) as f32).round() as i32;
        draw_line(sink, IVec2::new(cx - tick, y), IVec2::new(cx + tick, y), color);
    }
}

/// Plot `f` over `domain`, box its roots, and return them.
///
/// The curve is drawn as a polyline through one sample per pixel column.
pub fn plot_function<S, F>(sink: &mut S, f: F, domain: Interval, method: RootMethod, color: Color) -> Vec<f32>
where
    S: PixelSink + ?Sized,
    F: Fn(f32) -> f32,
{
    let frame = PlotFrame::new(sink.width(), sink.height(), domain);
    let step = frame.units_per_pixel();

    let columns = sink.width().saturating_sub(1);
    for i in 0..columns {
        let x0 = domain.min + i as f32 * step;
        let x1 = x0 + step;
        let (y0, y1) = (f(x0), f(x1));
        if y0.is_finite() && y1.is_finite() {
            draw_line(sink, frame.to_pixel(x0, y0), frame.to_pixel(x1, y1), color);
        }
    }

    let roots = match method {
        RootMethod::Bisection => find_roots_bisection(&f, domain),
        RootMethod::Newton => find_roots_newton(&f, domain),
    };
    debug!("Found {} root(s) with {:?}: {:?}", roots.len(), method, roots);

    for &root in &roots {
        let p = frame.to_pixel(root, 0.0);
        let tick = TICK_HALF_LENGTH as i32;
        draw_box(sink, p - IVec2::splat(tick), p + IVec2::new(tick + 1, tick), ROOT_BOX_COLOR);
    }

    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::HdrImage;

    #[test]
    fn polynomial_uses_highest_power_first() {
        let cubic = Polynomial::new(vec![-1.0, 0.0, 1.0, 0.0]);
        assert_eq!(cubic.eval(2.0), -6.0);
        assert_eq!(Polynomial::new(vec![]).eval(3.0), 0.0);
    }

    #[test]
    fn horizontal_line_fills_every_column() {
        let mut image = HdrImage::new(8, 3);
        draw_line(&mut image, IVec2::new(6, 1), IVec2::new(1, 1), Color::ONE);
        for x in 1..=6 {
            assert_eq!(image.pixel(x, 1), Color::ONE);
        }
        assert_eq!(image.pixel(0, 1), Color::ZERO);
    }

    #[test]
    fn vertical_and_steep_lines_have_no_gaps() {
        let mut image = HdrImage::new(5, 9);
        draw_line(&mut image, IVec2::new(2, 8), IVec2::new(2, 0), Color::ONE);
        draw_line(&mut image, IVec2::new(0, 0), IVec2::new(1, 8), Color::X);
        for y in 0..9 {
            assert_eq!(image.pixel(2, y), Color::ONE);
            assert!(image.pixel(0, y) == Color::X || image.pixel(1, y) == Color::X);
        }
    }

    #[test]
    fn single_point_line() {
        let mut image = HdrImage::new(3, 3);
        draw_line(&mut image, IVec2::new(1, 1), IVec2::new(1, 1), Color::ONE);
        assert_eq!(image.pixel(1, 1), Color::ONE);
    }

    #[test]
    fn lines_are_clipped_to_the_image() {
        let mut image = HdrImage::new(4, 4);
        draw_line(&mut image, IVec2::new(-10, 2), IVec2::new(10, 2), Color::ONE);
        for x in 0..4 {
            assert_eq!(image.pixel(x, 2), Color::ONE);
        }
    }

    #[test]
    fn box_outline() {
        let mut image = HdrImage::new(6, 6);
        draw_box(&mut image, IVec2::new(1, 4), IVec2::new(4, 1), Color::ONE);
        assert_eq!(image.pixel(1, 1), Color::ONE);
        assert_eq!(image.pixel(4, 4), Color::ONE);
        assert_eq!(image.pixel(2, 4), Color::ONE);
        assert_eq!(image.pixel(2, 2), Color::ZERO);
    }

    #[test]
    fn axes_cross_at_center() {
        let mut image = HdrImage::new(9, 9);
        draw_axes(&mut image, 4, 4, Color::ONE);
        assert_eq!(image.pixel(4, 0), Color::ONE);
        assert_eq!(image.pixel(0, 4), Color::ONE);
        assert_eq!(image.pixel(8, 4), Color::ONE);
    }

    #[test]
    fn plot_boxes_roots_of_cubic() {
        let mut image = HdrImage::new(81, 81);
        let cubic = Polynomial::new(vec![-1.0, 0.0, 1.0, 0.0]);
        let domain = Interval::new(-4.0, 4.0);
        let mut roots = plot_function(&mut image, |x| cubic.eval(x), domain, RootMethod::Bisection, Color::X);
        roots.sort_by(f32::total_cmp);
        assert_eq!(roots.len(), 3);

        // 0.1 units per pixel: the root at x = 1 sits 10 pixels right of center.
        let frame = PlotFrame::new(81, 81, domain);
        let p = frame.to_pixel(1.0, 0.0);
        assert_eq!(p, IVec2::new(50, 40));
        assert_eq!(image.pixel(47, 37), ROOT_BOX_COLOR);
        assert_eq!(image.pixel(54, 43), ROOT_BOX_COLOR);
    }

    #[test]
    fn steep_curve_plots_without_overflow() {
        let mut image = HdrImage::new(81, 81);
        let domain = Interval::new(-4.0, 4.0);
        let roots = plot_function(&mut image, |x| 1e12 * x, domain, RootMethod::Bisection, Color::X);
        assert_eq!(roots.len(), 1);
        assert!(roots[0].abs() < 1e-3, "root = {}", roots[0]);

        // The curve leaves the image vertically through the center column.
        assert_eq!(image.pixel(40, 10), Color::X);
        assert_eq!(image.pixel(40, 70), Color::X);
    }

    #[test]
    fn far_off_image_line_is_clipped() {
        let mut image = HdrImage::new(5, 5);
        draw_line(&mut image, IVec2::new(2, i32::MIN), IVec2::new(2, i32::MAX), Color::ONE);
        draw_line(&mut image, IVec2::new(0, 0), IVec2::new(4, i32::MAX), Color::Y);
        draw_line(&mut image, IVec2::new(i32::MIN, 1), IVec2::new(i32::MAX, 1), Color::X);
        for i in 0..5 {
            assert_eq!(image.pixel(i, 1), Color::X);
        }
        for y in [0, 2, 3, 4] {
            assert_eq!(image.pixel(2, y), Color::ONE);
            assert_eq!(image.pixel(0, y), Color::Y);
        }
    }
}
