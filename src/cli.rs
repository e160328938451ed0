use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use bulbtrace::config::RenderConfig;
use bulbtrace::output::ImageFormat;
use bulbtrace::plot::RootMethod;

/// Custom enum for log levels that can be used with clap's ValueEnum
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convert our custom LogLevel enum to log crate's LevelFilter
impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// What to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Ray-cast a single frame of the scene
    Render,
    /// Render successive frames with a spinning orientation
    Animate,
    /// Plot a polynomial and box its roots
    Plot,
}

/// Shape to ray-cast
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    Mandelbulb,
    RoundedBox,
    Sphere,
}

/// Root refinement used by plot mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlotMethod {
    Bisection,
    Newton,
}

impl From<PlotMethod> for RootMethod {
    fn from(method: PlotMethod) -> Self {
        match method {
            PlotMethod::Bisection => RootMethod::Bisection,
            PlotMethod::Newton => RootMethod::Newton,
        }
    }
}

/// Explicit output format, overriding the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Ppm,
    Tga,
    Png,
    Exr,
}

impl From<FormatArg> for ImageFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Ppm => ImageFormat::Ppm,
            FormatArg::Tga => ImageFormat::Tga,
            FormatArg::Png => ImageFormat::Png,
            FormatArg::Exr => ImageFormat::Exr,
        }
    }
}

/// Pick an image format from a lower-case file extension.
pub fn format_from_path(path: &Path) -> Option<ImageFormat> {
    match path.extension()?.to_str()? {
        "ppm" => Some(ImageFormat::Ppm),
        "tga" => Some(ImageFormat::Tga),
        "png" => Some(ImageFormat::Png),
        "exr" => Some(ImageFormat::Exr),
        _ => None,
    }
}

/// Command line arguments structure using clap derive macros
#[derive(Parser, Debug)]
#[command(name = "bulbtrace")]
#[command(about = "Sphere-traced Mandelbulb renderer and root-finding plotter")]
pub struct Args {
    /// TOML render configuration; command-line values override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Set the logging level (defaults to "info")
    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub debug_level: LogLevel,

    /// What to draw
    #[arg(long, value_enum, default_value = "render")]
    pub mode: Mode,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Camera lens zoom (larger values flatten the perspective)
    #[arg(long)]
    pub lens_zoom: Option<f32>,

    /// Exposure constant applied before tone mapping
    #[arg(long)]
    pub exposure: Option<f32>,

    /// Gamma the image values are encoded with
    #[arg(long)]
    pub gamma: Option<f32>,

    /// Shape to render
    #[arg(long, value_enum, default_value = "mandelbulb")]
    pub scene: SceneKind,

    /// Order of the Mandelbulb recurrence
    #[arg(long, default_value = "6.0")]
    pub power: f32,

    /// Orientation yaw in radians
    #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
    pub yaw: f32,

    /// Orientation pitch in radians
    #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
    pub pitch: f32,

    /// Orientation roll in radians
    #[arg(long, default_value = "0.5", allow_hyphen_values = true)]
    pub roll: f32,

    /// Number of frames to render in animate mode
    #[arg(long, default_value = "90")]
    pub frames: u32,

    /// Polynomial coefficients for plot mode, highest power first
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, default_values_t = vec![-1.0, 0.0, 1.0, 0.0])]
    pub coefficients: Vec<f32>,

    /// Root refinement for plot mode
    #[arg(long, value_enum, default_value = "bisection")]
    pub method: PlotMethod,

    /// Plot domain start
    #[arg(long, default_value = "-4.0", allow_hyphen_values = true)]
    pub domain_min: f32,

    /// Plot domain end
    #[arg(long, default_value = "4.0", allow_hyphen_values = true)]
    pub domain_max: f32,

    /// Send frames to TEV for real-time visualization
    #[arg(long, help = "Send frames to TEV for real-time visualization")]
    pub tev: bool,

    /// TEV client IP address and port (automatically enables --tev)
    #[arg(long, help = "TEV client IP address and port (automatically enables --tev)")]
    pub tev_address: Option<String>,

    /// Output file path; the format follows the extension unless --format is given
    #[arg(short, long, default_value = "output.tga")]
    pub output: PathBuf,

    /// Output format, overriding the extension
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,
}

impl Args {
    /// Apply the command-line overrides on top of `config`.
    pub fn apply_overrides(&self, mut config: RenderConfig) -> RenderConfig {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(lens_zoom) = self.lens_zoom {
            config.lens_zoom = lens_zoom;
        }
        if let Some(exposure) = self.exposure {
            config.exposure = exposure;
        }
        if let Some(gamma) = self.gamma {
            config.gamma = gamma;
        }
        config
    }

    /// Output format: explicit flag first, then the file extension.
    pub fn output_format(&self) -> Option<ImageFormat> {
        self.format.map(ImageFormat::from).or_else(|| format_from_path(&self.output))
    }
}
