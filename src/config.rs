//! Render configuration.
//!
//! Loaded from an optional TOML file, then overridden from the command line.
//! Every field has a default, so a partial file is fine:
//!
//! ```toml
//! width = 640
//! height = 480
//! key_light = [1.0, 1.0, 1.0]
//! fill_light = [0.0, 0.2, 0.7]
//! ```

use std::path::Path;

use log::debug;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::sink::Color;

/// Everything the renderer and the display need to know, fixed at construction.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// On-screen pixel scale. Affects display only, never the camera.
    pub zoom: f32,
    /// Camera lens factor; larger values bend rays less.
    pub lens_zoom: f32,
    /// Linear scale applied before tone mapping
    pub exposure: f32,
    /// Gamma the image values are encoded with
    pub gamma: f32,
    /// Direction toward the key light; normalized on validation
    pub light_direction: [f32; 3],
    /// Color of the key light
    pub key_light: [f32; 3],
    /// Color of the fill light
    pub fill_light: [f32; 3],
    /// Background gradient color near the anchor point
    pub background_center: [f32; 3],
    /// Background gradient color away from the anchor point
    pub background_rim: [f32; 3],
    /// Tint of the blown-out highlight
    pub highlight_tint: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            zoom: 2.0,
            lens_zoom: 3.0,
            exposure: 1.0,
            gamma: 2.1,
            light_direction: [1.0, 1.0, -1.0],
            key_light: [1.0, 1.0, 1.0],
            fill_light: [0.0, 0.2, 0.7],
            background_center: [0.9, 0.9, 0.9],
            background_rim: [0.5, 0.3, 0.1],
            highlight_tint: [1.3, 1.2, 0.0],
        }
    }
}

impl RenderConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!("Loading render configuration from {}", path.display());
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Check the configuration, rejecting values the renderer cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyImage {
                width: self.width,
                height: self.height,
            });
        }
        for (name, value) in [
            ("zoom", self.zoom),
            ("lens_zoom", self.lens_zoom),
            ("exposure", self.exposure),
            ("gamma", self.gamma),
        ] {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        if Color::from_array(self.light_direction).try_normalize().is_none() {
            return Err(ConfigError::ZeroLightDirection);
        }
        Ok(())
    }

    /// Normalized light direction. Zero when the direction is degenerate.
    pub fn light_direction(&self) -> Color {
        Color::from_array(self.light_direction).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        RenderConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = RenderConfig::from_toml("width = 64\nfill_light = [1.0, 0.0, 0.0]\n").unwrap();
        assert_eq!(config.width, 64);
        assert_eq!(config.height, RenderConfig::default().height);
        assert_eq!(config.fill_light, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            RenderConfig::from_toml("samples = 4\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        let config = RenderConfig {
            height: 0,
            ..RenderConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyImage { width: 320, height: 0 })
        ));
    }

    #[test]
    fn non_positive_zoom_is_rejected() {
        for zoom in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            let config = RenderConfig {
                zoom,
                ..RenderConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::NonPositive { name: "zoom", .. })
            ));
        }
    }

    #[test]
    fn zero_light_is_rejected() {
        let config = RenderConfig {
            light_direction: [0.0; 3],
            ..RenderConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroLightDirection)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = RenderConfig::load(Path::new("/nonexistent/bulbtrace.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/bulbtrace.toml"));
    }
}
