//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Rejected render configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Width or height is zero.
    #[error("image dimensions must be positive, got {width}x{height}")]
    EmptyImage {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },

    /// A scale factor that must be a positive finite number is not.
    #[error("{name} must be positive and finite, got {value}")]
    NonPositive {
        /// Name of the offending setting
        name: &'static str,
        /// Value supplied
        value: f32,
    },

    /// The light direction cannot be normalized.
    #[error("light direction must be a non-zero vector")]
    ZeroLightDirection,

    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// File that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::RenderConfig`].
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Failure while writing an image to disk.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Plain file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PNG encoding failed.
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    /// EXR encoding failed.
    #[error("EXR encoding failed: {0}")]
    Exr(#[from] exr::error::Error),

    /// The image is too large for the TGA header.
    #[error("image of {width}x{height} does not fit a TGA header")]
    TooLargeForTga {
        /// Image width
        width: u32,
        /// Image height
        height: u32,
    },
}

/// Failure while handing a frame to a display.
#[derive(Debug, Error)]
pub enum PresentError {
    /// Could not reach the viewer.
    #[error("failed to connect to TEV at {address}: {source}")]
    Connect {
        /// Viewer address
        address: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The viewer connection broke while sending.
    #[error("failed to send frame to TEV: {0}")]
    Send(#[from] std::io::Error),
}
