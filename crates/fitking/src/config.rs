//! Site configuration.
//!
//! Loaded once at startup from TOML. Every field has a default, so an empty
//! file is a valid configuration:
//!
//! ```toml
//! [viewport]
//! width = 1440.0
//! height = 900.0
//!
//! [effects]
//! particle_count = 40
//! glow_color = "secondary"
//! intensity = "strong"
//! text_color = "gradient"
//! text_animate = true
//! cursor_enabled = true
//! hover_detection = "delegated"
//! ```

use std::path::Path;

use fitking_effects::{GlowColor, HoverDetection, Intensity, TextColor, Viewport};
use serde::Deserialize;
use tracing::warn;

use crate::error::{ConfigError, ConfigResult};

/// Largest particle count a config may request.
pub const MAX_PARTICLES: usize = 500;

/// Initial viewport.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Width in CSS pixels.
    pub width: f32,
    /// Height in CSS pixels.
    pub height: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            width: viewport.width,
            height: viewport.height,
        }
    }
}

impl From<ViewportConfig> for Viewport {
    fn from(value: ViewportConfig) -> Self {
        Self::new(value.width, value.height)
    }
}

/// `[effects]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    /// Particles in the hero field.
    pub particle_count: usize,
    /// Glow colour of the goal cards.
    pub glow_color: GlowColor,
    /// Glow intensity of the goal cards.
    pub intensity: Intensity,
    /// Colour of the hero title.
    pub text_color: TextColor,
    /// Whether the hero title animates.
    pub text_animate: bool,
    /// Whether to mount the cursor overlay at all.
    pub cursor_enabled: bool,
    /// Cursor hover detection strategy.
    pub hover_detection: HoverDetection,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            particle_count: 30,
            glow_color: GlowColor::default(),
            intensity: Intensity::default(),
            text_color: TextColor::default(),
            text_animate: true,
            cursor_enabled: true,
            hover_detection: HoverDetection::default(),
        }
    }
}

/// Whole site configuration.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Initial viewport.
    pub viewport: ViewportConfig,
    /// Effect options.
    pub effects: EffectsConfig,
}

impl SiteConfig {
    /// Parses TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed TOML or mistyped fields.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid config.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Clamps out-of-range values back to something renderable.
    fn sanitized(mut self) -> Self {
        if self.effects.particle_count > MAX_PARTICLES {
            warn!(
                requested = self.effects.particle_count,
                max = MAX_PARTICLES,
                "particle count clamped"
            );
            self.effects.particle_count = MAX_PARTICLES;
        }

        let defaults = ViewportConfig::default();
        if !(self.viewport.width.is_finite() && self.viewport.width > 0.0) {
            warn!(width = self.viewport.width, "invalid viewport width, using default");
            self.viewport.width = defaults.width;
        }
        if !(self.viewport.height.is_finite() && self.viewport.height > 0.0) {
            warn!(height = self.viewport.height, "invalid viewport height, using default");
            self.viewport.height = defaults.height;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = SiteConfig::from_toml_str("").unwrap();
        assert_eq!(config, SiteConfig::default());
        assert_eq!(config.effects.particle_count, 30);
        assert!(config.effects.text_animate);
        assert_eq!(config.effects.hover_detection, HoverDetection::Snapshot);
    }

    #[test]
    fn test_overrides() {
        let config = SiteConfig::from_toml_str(
            r#"
            [viewport]
            width = 700.0

            [effects]
            particle_count = 12
            glow_color = "mixed"
            intensity = "subtle"
            text_color = "secondary"
            text_animate = false
            hover_detection = "delegated"
            "#,
        )
        .unwrap();

        assert!((config.viewport.width - 700.0).abs() < f32::EPSILON);
        assert!((config.viewport.height - 1080.0).abs() < f32::EPSILON);
        assert_eq!(config.effects.particle_count, 12);
        assert_eq!(config.effects.glow_color, GlowColor::Mixed);
        assert_eq!(config.effects.intensity, Intensity::Subtle);
        assert_eq!(config.effects.text_color, TextColor::Secondary);
        assert_eq!(config.effects.hover_detection, HoverDetection::Delegated);
        assert!(!config.effects.text_animate);
        assert!(config.effects.cursor_enabled);
    }

    #[test]
    fn test_particle_count_clamped() {
        let config = SiteConfig::from_toml_str("[effects]\nparticle_count = 100000").unwrap();
        assert_eq!(config.effects.particle_count, MAX_PARTICLES);
    }

    #[test]
    fn test_bad_values_are_parse_errors() {
        assert!(matches!(
            SiteConfig::from_toml_str("[effects]\nintensity = \"blinding\""),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            SiteConfig::from_toml_str("[effects\nparticle_count = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SiteConfig::load("/definitely/not/here/fitking.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
