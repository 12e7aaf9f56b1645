//! Render configuration.
//!
//! Everything the renderer needs that is not part of the scene. Loaded from
//! JSON; missing fields take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the integrator turns a hit into a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingModel {
    /// Direct lighting with shadows, reflection and refraction
    #[default]
    Direct,
    /// Direct model plus sampled indirect light
    Gi,
    /// Texture coordinates as red and green
    Uv,
    /// Hit distance / 100
    Depth,
    /// Shading normal
    Normal,
    /// World-space hit position / 100
    World,
    /// Target-local hit position / 5
    Local,
}

impl LightingModel {
    /// Debug models show a single quantity and skip shading.
    pub fn is_debug(self) -> bool {
        !matches!(self, LightingModel::Direct | LightingModel::Gi)
    }
}

/// Errors raised while loading a configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Hard ceiling on trace recursion. Deeper settings are rejected by
/// [`RenderConfig::validate`] and clamped by the tracer.
pub const MAX_RECURSION_DEPTH: u32 = 16;

/// Image, sampling and camera-lens settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    /// Progressive passes to accumulate
    pub passes: u32,
    /// Jittered samples per pixel; 0 means one centred sample
    pub super_sample: u32,
    pub gi_samples: u32,
    pub max_recursion_depth: u32,
    pub lighting_model: LightingModel,
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Maximum primary-ray jitter angle in radians
    pub defocus_blur: f32,
    /// Render every other pixel and fill 2x2 blocks
    pub lq_mode: bool,
    pub background: [f32; 3],
    pub seed: u64,
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            passes: 1,
            super_sample: 0,
            gi_samples: 32,
            max_recursion_depth: 9,
            lighting_model: LightingModel::Direct,
            fov: 90.0,
            defocus_blur: 0.0,
            lq_mode: false,
            background: [0.1, 0.2, 0.4],
            seed: 0,
            bucket_size: 64,
        }
    }
}

impl RenderConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded render config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate a JSON config.
    pub fn from_json(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size {}x{} is empty",
                self.width, self.height
            )));
        }
        if self.bucket_size == 0 {
            return Err(ConfigError::Invalid("bucket size must be at least 1".into()));
        }
        if self.max_recursion_depth > MAX_RECURSION_DEPTH {
            return Err(ConfigError::Invalid(format!(
                "recursion depth {} is above the limit of {}",
                self.max_recursion_depth, MAX_RECURSION_DEPTH
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(ConfigError::Invalid(format!("field of view {} is out of range", self.fov)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RenderConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_recursion_depth, 9);
        assert_eq!(config.lighting_model, LightingModel::Direct);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = RenderConfig::from_json(r#"{ "width": 320, "lighting_model": "gi" }"#).unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 480);
        assert_eq!(config.lighting_model, LightingModel::Gi);
    }

    #[test]
    fn test_json_round_trip() {
        let config = RenderConfig {
            seed: 99,
            lighting_model: LightingModel::Depth,
            ..RenderConfig::default()
        };
        let parsed = RenderConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            RenderConfig::from_json(r#"{ "width": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            RenderConfig::from_json(r#"{ "bucket_size": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(RenderConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_recursion_depth_is_capped() {
        let deepest = format!(r#"{{ "max_recursion_depth": {MAX_RECURSION_DEPTH} }}"#);
        assert!(RenderConfig::from_json(&deepest).is_ok());
        assert!(matches!(
            RenderConfig::from_json(r#"{ "max_recursion_depth": 1000000 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RenderConfig::load("/nonexistent/lumen.json"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_debug_models() {
        assert!(!LightingModel::Direct.is_debug());
        assert!(!LightingModel::Gi.is_debug());
        assert!(LightingModel::Normal.is_debug());
    }
}
