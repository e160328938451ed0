//! Pixel sinks: where rendered and plotted pixels end up.
//!
//! The renderer and the plotter only ever talk to a [`PixelSink`]. The
//! concrete framebuffer is an `image` crate buffer of linear f32 RGB.

use glam::Vec3A;
use image::{ImageBuffer, Rgb};

/// RGB color type using Vec3A for SIMD optimization.
pub type Color = Vec3A;

/// Linear HDR framebuffer, row-major with (0, 0) at the top left.
pub type HdrImage = ImageBuffer<Rgb<f32>, Vec<f32>>;

/// A fixed `width × height` grid of colors.
pub trait PixelSink {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// Store `color` at `(x, y)`. Coordinates outside the grid are ignored.
    fn set_pixel(&mut self, x: i64, y: i64, color: Color);

    /// Color at `(x, y)`, or black outside the grid.
    fn pixel(&self, x: i64, y: i64) -> Color;

    /// Whether `(x, y)` lies on the grid.
    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.width()) && y < i64::from(self.height())
    }
}

impl PixelSink for HdrImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if self.in_bounds(x, y) {
            self.put_pixel(x as u32, y as u32, Rgb(color.to_array()));
        }
    }

    fn pixel(&self, x: i64, y: i64) -> Color {
        if self.in_bounds(x, y) {
            Color::from_array(self.get_pixel(x as u32, y as u32).0)
        } else {
            Color::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_major_top_left_origin() {
        let mut image = HdrImage::new(3, 2);
        image.set_pixel(2, 1, Color::new(0.25, 0.5, 1.0));
        assert_eq!(image.pixel(2, 1), Color::new(0.25, 0.5, 1.0));
        // Last pixel of the raw buffer.
        assert_eq!(&image.as_raw()[15..18], &[0.25, 0.5, 1.0]);
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut image = HdrImage::new(2, 2);
        image.set_pixel(-1, 0, Color::ONE);
        image.set_pixel(0, 2, Color::ONE);
        assert!(image.as_raw().iter().all(|&c| c == 0.0));
        assert_eq!(image.pixel(5, 5), Color::ZERO);
    }
}
