//! Glide configuration file handling

use anyhow::{Context, Result};
use glide_animation::SchedulerConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "glide.toml";

/// Top-level CLI configuration (glide.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GlideConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub simulate: SimulateConfig,
}

/// Defaults for `glide simulate`
#[derive(Debug, Deserialize, Serialize)]
pub struct SimulateConfig {
    /// Frames per second of the simulated clock
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Safety cap for looping tweens
    #[serde(default = "default_max_frames")]
    pub max_frames: u32,
}

fn default_fps() -> u32 {
    60
}

fn default_max_frames() -> u32 {
    10_000
}

impl Default for SimulateConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            max_frames: default_max_frames(),
        }
    }
}

impl GlideConfig {
    /// Load from `path`, or from `glide.toml` if present, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => path,
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if !default.is_file() {
                    return Ok(Self::default());
                }
                default
            }
        };

        let content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;
        Self::parse(&content).with_context(|| format!("Failed to parse {}", config_path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glide_animation::Easing;

    #[test]
    fn test_parse_sections() {
        let config = GlideConfig::parse(
            r#"
            [scheduler]
            default_ease = "linear"
            babysitter = true

            [simulate]
            fps = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.scheduler.default_ease, Easing::Linear);
        assert!(config.scheduler.babysitter);
        assert_eq!(config.simulate.fps, 30);
        assert_eq!(config.simulate.max_frames, 10_000);
    }

    #[test]
    fn test_empty_is_default() {
        let config = GlideConfig::parse("").unwrap();
        assert_eq!(config.scheduler, SchedulerConfig::default());
        assert_eq!(config.simulate.fps, 60);
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let err = GlideConfig::load(Some(Path::new("/no/such/glide.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
