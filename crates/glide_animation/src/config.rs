//! Scheduler configuration
//!
//! Read from TOML, e.g. `glide.toml`:
//!
//! ```toml
//! default_ease = "quart-in"
//! babysitter = true
//! time_scale = 1.0
//! pool_capacity = 64
//! path_resolution = 50
//! ```

use crate::easing::Easing;
use crate::error::Result;
use crate::playback::DEFAULT_MIN_DURATION;
use crate::pool::DEFAULT_POOL_CAPACITY;
use crate::spline::DEFAULT_PATH_RESOLUTION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings applied by a `TweenScheduler` and its builders
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct SchedulerConfig {
    /// Easing given to tweens built through the scheduler
    #[serde(default = "default_ease")]
    pub default_ease: Easing,
    /// Skip pushes to targets that report themselves invalid
    #[serde(default)]
    pub babysitter: bool,
    /// Initial time scale
    #[serde(default = "default_time_scale")]
    pub time_scale: f32,
    /// Pooled instances kept per animatable type
    #[serde(default = "default_pool_capacity")]
    pub pool_capacity: usize,
    /// Samples per segment for splines built through the scheduler
    #[serde(default = "default_path_resolution")]
    pub path_resolution: usize,
    /// Durations below this are clamped up to it
    #[serde(default = "default_min_duration")]
    pub min_duration: f32,
}

fn default_ease() -> Easing {
    Easing::QuartIn
}

fn default_time_scale() -> f32 {
    1.0
}

fn default_pool_capacity() -> usize {
    DEFAULT_POOL_CAPACITY
}

fn default_path_resolution() -> usize {
    DEFAULT_PATH_RESOLUTION
}

fn default_min_duration() -> f32 {
    DEFAULT_MIN_DURATION
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_ease: default_ease(),
            babysitter: false,
            time_scale: default_time_scale(),
            pool_capacity: default_pool_capacity(),
            path_resolution: default_path_resolution(),
            min_duration: default_min_duration(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Serialize to TOML string
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn with_babysitter(mut self, enabled: bool) -> Self {
        self.babysitter = enabled;
        self
    }

    pub fn with_default_ease(mut self, easing: Easing) -> Self {
        self.default_ease = easing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TweenError;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.default_ease, Easing::QuartIn);
        assert!(!config.babysitter);
        assert_eq!(config.pool_capacity, 64);
        assert_eq!(config.path_resolution, 50);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = SchedulerConfig::from_toml_str(
            r#"
            default_ease = "elastic-out"
            babysitter = true
            "#,
        )
        .unwrap();
        assert_eq!(config.default_ease, Easing::ElasticOut);
        assert!(config.babysitter);
        assert_eq!(config.time_scale, 1.0);
        assert_eq!(config.min_duration, DEFAULT_MIN_DURATION);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = SchedulerConfig::default().with_babysitter(true);
        let text = config.to_toml().unwrap();
        assert_eq!(SchedulerConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = SchedulerConfig::from_toml_str("default_ease = \"wobble\"").unwrap_err();
        assert!(matches!(err, TweenError::ConfigParse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SchedulerConfig::load(Path::new("/definitely/not/here/glide.toml")).unwrap_err();
        assert!(matches!(err, TweenError::Io(_)));
    }
}
