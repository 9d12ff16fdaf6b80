//! Style values handed to the renderer
//!
//! The joystick core never interprets these; they are configuration that
//! travels with the frame so the host can paint the three circles.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::JoystickError;

/// Default border stroke width in pixels
pub const DEFAULT_BORDER_WIDTH: u32 = 3;

/// 32-bit ARGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Color = Color(0xFF00_0000);
    pub const TRANSPARENT: Color = Color(0x0000_0000);

    pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Color((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    /// Fully transparent colors paint nothing
    pub const fn is_visible(self) -> bool {
        self.alpha() != 0
    }
}

impl FromStr for Color {
    type Err = JoystickError;

    /// Parse `#RRGGBB` (opaque) or `#AARRGGBB`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || JoystickError::InvalidColor(s.to_string());

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Color(0xFF00_0000 | value)),
            8 => Ok(Color(value)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Colors and stroke width of the joystick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct JoystickStyle {
    #[serde(default = "default_button_color")]
    pub button_color: Color,
    #[serde(default = "default_border_color")]
    pub border_color: Color,
    #[serde(default = "default_background_color")]
    pub background_color: Color,
    #[serde(default = "default_border_width")]
    pub border_width: u32,
}

impl JoystickStyle {
    pub fn set_button_color(&mut self, color: Color) {
        self.button_color = color;
    }

    pub fn set_border_color(&mut self, color: Color) {
        self.border_color = color;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background_color = color;
    }

    pub fn set_border_width(&mut self, width: u32) {
        self.border_width = width;
    }
}

impl Default for JoystickStyle {
    fn default() -> Self {
        Self {
            button_color: default_button_color(),
            border_color: default_border_color(),
            background_color: default_background_color(),
            border_width: default_border_width(),
        }
    }
}

fn default_button_color() -> Color {
    Color::BLACK
}

fn default_border_color() -> Color {
    Color::BLACK
}

fn default_background_color() -> Color {
    Color::TRANSPARENT
}

fn default_border_width() -> u32 {
    DEFAULT_BORDER_WIDTH
}
