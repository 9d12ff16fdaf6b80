//! Virtual joystick core
//!
//! Tracks a pointer inside a circular region and reports its direction
//! (angle) and magnitude (strength) to a listener: once on press, once on
//! release, and periodically while held.
//!
//! - [`geometry`]: pure clamping and polar math
//! - [`controller`]: the pointer state machine and reporting sessions
//! - [`actor`]: a tokio task that owns a controller and serializes all access
//! - [`layout`], [`style`], [`render`]: the host-facing contracts

pub mod actor;
pub mod config;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod style;

pub use actor::{JoystickActor, JoystickHandle};
pub use config::JoystickConfig;
pub use controller::{JoystickController, JoystickState, ListenerFn, DEFAULT_LOOP_INTERVAL};
pub use error::JoystickError;
pub use geometry::{Circle, Point, PolarReading};
