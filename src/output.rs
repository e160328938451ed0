//! # Output Module
//!
//! Everything that leaves the renderer goes through here:
//! - Tone mapping from linear HDR values to display bytes
//! - PPM (ASCII) and TGA (binary) export, plus PNG and EXR
//! - Real-time display via TEV (The EXR Viewer)
//!
//! ## Tone Mapping
//!
//! All display-referred outputs share one mapping so files match the screen:
//! values are scaled by the exposure constant, clamped to [0, 1], raised to
//! `1 / (DEVICE_GAMMA / gamma)` and truncated to 8 bits. EXR stays linear and
//! only receives the exposure scale.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::net::TcpStream;
use std::path::Path;

use exr::prelude::write_rgb_file;
use image::imageops::{self, FilterType};
use image::{ImageBuffer, Rgb};
use log::{debug, info};
use tev_client::{PacketCreateImage, PacketUpdateImage, TevClient};

use crate::app::Present;
use crate::config::RenderConfig;
use crate::error::{ExportError, PresentError};
use crate::sink::HdrImage;

/// Gamma the display is assumed to apply.
pub const DEVICE_GAMMA: f32 = 2.1;

/// Default TEV port, used when the address has none.
pub const TEV_DEFAULT_PORT: u16 = 14158;

/// Exposure and gamma mapping from linear values to display values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToneMap {
    /// Linear scale applied first
    pub exposure: f32,
    /// Gamma the image values are encoded with
    pub gamma: f32,
}

impl Default for ToneMap {
    fn default() -> Self {
        Self {
            exposure: 1.0,
            gamma: DEVICE_GAMMA,
        }
    }
}

impl ToneMap {
    /// Tone map described by a render configuration.
    pub fn from_config(config: &RenderConfig) -> Self {
        Self {
            exposure: config.exposure,
            gamma: config.gamma,
        }
    }

    /// Display value in [0, 1].
    pub fn encode(&self, value: f32) -> f32 {
        let gamma = DEVICE_GAMMA / self.gamma;
        (value * self.exposure).clamp(0.0, 1.0).powf(1.0 / gamma)
    }

    /// Display value as an 8-bit channel. Truncates rather than rounds.
    pub fn to_byte(&self, value: f32) -> u8 {
        (self.encode(value) * 255.0) as u8
    }

    /// All three channels of a pixel as bytes.
    pub fn pixel_bytes(&self, pixel: &Rgb<f32>) -> [u8; 3] {
        let [r, g, b] = pixel.0;
        [self.to_byte(r), self.to_byte(g), self.to_byte(b)]
    }
}

/// File formats the exporter can write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// ASCII portable pixmap (P3)
    Ppm,
    /// Uncompressed 24-bit Targa
    Tga,
    /// 8-bit PNG
    Png,
    /// Linear 32-bit float OpenEXR
    Exr,
}

impl ImageFormat {
    /// Conventional lower-case file extension.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Ppm => "ppm",
            ImageFormat::Tga => "tga",
            ImageFormat::Png => "png",
            ImageFormat::Exr => "exr",
        }
    }
}

/// Save `image` to `path` in `format`.
pub fn save_image(image: &HdrImage, path: &Path, format: ImageFormat, tone: ToneMap) -> Result<(), ExportError> {
    match format {
        ImageFormat::Ppm => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_ppm(image, tone, &mut writer)?;
            writer.flush()?;
        }
        ImageFormat::Tga => {
            let mut writer = BufWriter::new(File::create(path)?);
            write_tga(image, tone, &mut writer)?;
            writer.flush()?;
        }
        ImageFormat::Png => to_display_image(image, tone).save_with_format(path, image::ImageFormat::Png)?,
        ImageFormat::Exr => save_image_as_exr(image, path, tone.exposure)?,
    }
    info!("Image saved as {}", path.display());
    Ok(())
}

/// Write an ASCII PPM: a `P3` header, then one `r g b` line per pixel with a
/// comment marking the start of every row.
pub fn write_ppm<W: Write>(image: &HdrImage, tone: ToneMap, writer: &mut W) -> std::io::Result<()> {
    let (width, height) = image.dimensions();
    writeln!(writer, "P3 {width} {height} 255")?;
    for (y, row) in image.rows().enumerate() {
        write!(writer, "\n# y = {y}\n")?;
        for pixel in row {
            let [r, g, b] = tone.pixel_bytes(pixel);
            writeln!(writer, "{r} {g} {b}")?;
        }
    }
    Ok(())
}

/// Write an uncompressed 24-bit TGA with a top-left origin.
///
/// Pixels are stored as BGR triples, rows top to bottom.
pub fn write_tga<W: Write>(image: &HdrImage, tone: ToneMap, writer: &mut W) -> Result<(), ExportError> {
    let (width, height) = image.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ExportError::TooLargeForTga { width, height });
    };

    let mut header = [0u8; 18];
    header[2] = 2; // uncompressed true-color
    header[12..14].copy_from_slice(&w.to_le_bytes());
    header[14..16].copy_from_slice(&h.to_le_bytes());
    header[16] = 24; // bits per pixel
    header[17] = 1 << 5; // origin at top left
    writer.write_all(&header)?;

    let mut body = Vec::with_capacity(image.pixels().len() * 3);
    for pixel in image.pixels() {
        let [r, g, b] = tone.pixel_bytes(pixel);
        body.extend_from_slice(&[b, g, r]);
    }
    writer.write_all(&body)?;
    Ok(())
}

/// Tone-mapped 8-bit copy of `image`.
pub fn to_display_image(image: &HdrImage, tone: ToneMap) -> ImageBuffer<Rgb<u8>, Vec<u8>> {
    ImageBuffer::from_fn(image.width(), image.height(), |x, y| Rgb(tone.pixel_bytes(image.get_pixel(x, y))))
}

/// Save an f32 RGB image as EXR, linear apart from the exposure scale.
pub fn save_image_as_exr(image: &HdrImage, path: &Path, exposure: f32) -> Result<(), ExportError> {
    write_rgb_file(path, image.width() as usize, image.height() as usize, |x, y| {
        let [r, g, b] = image.get_pixel(x as u32, y as u32).0;
        (r * exposure, g * exposure, b * exposure)
    })?;
    Ok(())
}

/// Streams frames to a TEV viewer over TCP.
///
/// Frames are tone mapped exactly like exported files and upscaled by the
/// display zoom with nearest-neighbour filtering.
pub struct TevPresenter {
    client: TevClient,
    address: String,
    tone: ToneMap,
    zoom: f32,
    image_name: String,
    created: Option<(u32, u32)>,
}

impl std::fmt::Debug for TevPresenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TevPresenter")
            .field("address", &self.address)
            .field("tone", &self.tone)
            .field("zoom", &self.zoom)
            .finish_non_exhaustive()
    }
}

impl TevPresenter {
    /// Connect to TEV at `address` (`host` or `host:port`).
    pub fn connect(address: &str, tone: ToneMap, zoom: f32) -> Result<Self, PresentError> {
        let address = if address.contains(':') {
            address.to_string()
        } else {
            format!("{address}:{TEV_DEFAULT_PORT}")
        };

        debug!("Attempting to connect to TEV at {address}");
        let stream = TcpStream::connect(&address).map_err(|source| PresentError::Connect {
            address: address.clone(),
            source,
        })?;
        // Latency matters more than throughput for animation.
        if let Err(e) = stream.set_nodelay(true) {
            debug!("Failed to set TCP_NODELAY: {e}");
        }

        Ok(Self {
            client: TevClient::wrap(stream),
            address,
            tone,
            zoom,
            image_name: "bulbtrace".to_string(),
            created: None,
        })
    }

    /// Display-ready planar (RRR...GGG...BBB...) data at display size.
    fn planar_display_data(&self, image: &HdrImage) -> (u32, u32, Vec<f32>) {
        let width = ((image.width() as f32 * self.zoom).ceil() as u32).max(1);
        let height = ((image.height() as f32 * self.zoom).ceil() as u32).max(1);
        let scaled = imageops::resize(image, width, height, FilterType::Nearest);

        let pixel_count = (width * height) as usize;
        let mut data = Vec::with_capacity(pixel_count * 3);
        for channel in 0..3 {
            data.extend(scaled.pixels().map(|p| self.tone.encode(p[channel])));
        }
        (width, height, data)
    }
}

impl Present for TevPresenter {
    fn present(&mut self, image: &HdrImage) -> Result<(), PresentError> {
        let start = std::time::Instant::now();
        let (width, height, data) = self.planar_display_data(image);

        if self.created != Some((width, height)) {
            self.client.send(PacketCreateImage {
                image_name: &self.image_name,
                grab_focus: true,
                width,
                height,
                channel_names: &["R", "G", "B"],
            })?;
            self.created = Some((width, height));
        }

        let plane = u64::from(width) * u64::from(height);
        self.client.send(PacketUpdateImage {
            image_name: &self.image_name,
            grab_focus: false,
            channel_names: &["R", "G", "B"],
            channel_offsets: &[0, plane, 2 * plane],
            channel_strides: &[1, 1, 1],
            x: 0,
            y: 0,
            width,
            height,
            data: &data,
        })?;

        debug!("Frame sent to TEV at {} in {:.2?}", self.address, start.elapsed());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Color, PixelSink};

    fn gradient_image() -> HdrImage {
        let mut image = HdrImage::new(2, 2);
        image.set_pixel(0, 0, Color::new(0.0, 0.5, 1.0));
        image.set_pixel(1, 0, Color::new(2.0, -1.0, 0.25));
        image.set_pixel(0, 1, Color::splat(1.0));
        image
    }

    #[test]
    fn tone_map_matches_display_formula() {
        let tone = ToneMap::default();
        assert_eq!(tone.to_byte(0.0), 0);
        assert_eq!(tone.to_byte(1.0), 255);
        assert_eq!(tone.to_byte(7.0), 255);
        assert_eq!(tone.to_byte(-3.0), 0);
        assert_eq!(tone.to_byte(0.5), 127);

        let brighter = ToneMap {
            exposure: 2.0,
            gamma: DEVICE_GAMMA,
        };
        assert_eq!(brighter.to_byte(0.25), 127);

        let encoded = ToneMap {
            exposure: 1.0,
            gamma: 1.05,
        };
        // gamma ratio 2, so the value is square rooted
        assert!((encoded.encode(0.25) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ppm_layout() {
        let mut out = Vec::new();
        write_ppm(&gradient_image(), ToneMap::default(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let expected = "P3 2 2 255\n\n# y = 0\n0 127 255\n255 0 63\n\n# y = 1\n255 255 255\n0 0 0\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn tga_layout() {
        let mut out = Vec::new();
        write_tga(&gradient_image(), ToneMap::default(), &mut out).unwrap();
        assert_eq!(out.len(), 18 + 4 * 3);
        assert_eq!(&out[..3], &[0, 0, 2]);
        assert_eq!(&out[12..18], &[2, 0, 2, 0, 24, 0x20]);
        // First pixel in BGR order.
        assert_eq!(&out[18..21], &[255, 127, 0]);
    }

    #[test]
    fn display_image_uses_same_mapping() {
        let display = to_display_image(&gradient_image(), ToneMap::default());
        assert_eq!(display.get_pixel(1, 0).0, [255, 0, 63]);
    }

    #[test]
    fn files_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let image = gradient_image();
        for format in [ImageFormat::Ppm, ImageFormat::Tga, ImageFormat::Png, ImageFormat::Exr] {
            let path = dir.path().join(format!("out.{}", format.extension()));
            save_image(&image, &path, format, ToneMap::default()).unwrap();
            assert!(std::fs::metadata(&path).unwrap().len() > 0);
        }
    }
}
