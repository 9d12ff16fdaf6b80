//! Error types for the joystick core

use thiserror::Error;

/// Errors surfaced by the joystick library
#[derive(Debug, Error, Clone, PartialEq)]
pub enum JoystickError {
    /// Boundary radius must be finite and strictly positive
    #[error("invalid circle radius {0}: must be finite and > 0")]
    InvalidRadius(f64),

    /// Reporting interval must be at least one millisecond
    #[error("invalid reporting interval {0} ms: must be > 0")]
    InvalidInterval(u64),

    /// Color string could not be parsed as #RRGGBB or #AARRGGBB
    #[error("invalid color '{0}': expected #RRGGBB or #AARRGGBB")]
    InvalidColor(String),

    /// Size ratio outside (0, 1]
    #[error("invalid {name} ratio {value}: must be in (0, 1]")]
    InvalidRatio { name: &'static str, value: f64 },

    /// The joystick actor is no longer running
    #[error("joystick actor has shut down")]
    ActorClosed,
}

pub type Result<T> = std::result::Result<T, JoystickError>;
