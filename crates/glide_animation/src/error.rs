//! Animation error types

use thiserror::Error;

/// Errors raised while building or scheduling animations
#[derive(Error, Debug)]
pub enum TweenError {
    /// A tween was scheduled without anything to write its values to
    #[error("tween has no target to write values to")]
    MissingTarget,

    /// A tween was scheduled before `initialize` gave it values and a clock
    #[error("tween was never initialized")]
    NotInitialized,

    /// A spline needs at least a start and an end point
    #[error("spline needs at least 2 control points, got {count}")]
    NotEnoughControlPoints { count: usize },

    /// A custom ease curve was built without keys
    #[error("ease curve has no keys")]
    EmptyCurve,

    /// An easing name that does not match any known easing
    #[error("unknown easing: {0}")]
    UnknownEasing(String),

    /// The process-wide scheduler was accessed while already borrowed
    #[error("scheduler is already borrowed (re-entrant access from a callback?)")]
    SchedulerBusy,

    /// Failed to parse a configuration file
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Failed to serialize a configuration
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Failed to read a configuration file
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, TweenError>;
