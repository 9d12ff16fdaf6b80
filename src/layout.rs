//! View measurement and circle derivation
//!
//! The joystick occupies a square view. When the host gives no size
//! constraint the view falls back to [`DEFAULT_SIZE`]. Once the size is
//! known, the outer (border) circle and the inner (button) radius are
//! derived from the shorter side.

use crate::error::{JoystickError, Result};
use crate::geometry::{Circle, Point};

/// Fallback view side length when the host leaves the size unspecified
pub const DEFAULT_SIZE: u32 = 200;

/// Button radius as a fraction of half the view side
pub const RATIO_SIZE_BUTTON: f64 = 0.25;

/// Border radius as a fraction of half the view side
pub const RATIO_SIZE_BORDER: f64 = 0.75;

/// Size constraint the host imposes on one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasureSpec {
    /// No constraint; the view picks its own size
    Unspecified,
    /// The view must be exactly this size
    Exactly(u32),
    /// The view may be at most this size; the joystick fills it
    AtMost(u32),
}

/// Sizing policy for the joystick view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutPolicy {
    pub default_size: u32,
    pub button_ratio: f64,
    pub border_ratio: f64,
}

impl LayoutPolicy {
    pub fn new(default_size: u32, button_ratio: f64, border_ratio: f64) -> Result<Self> {
        check_ratio("button", button_ratio)?;
        check_ratio("border", border_ratio)?;
        Ok(Self {
            default_size,
            button_ratio,
            border_ratio,
        })
    }

    fn measure_axis(&self, spec: MeasureSpec) -> u32 {
        match spec {
            MeasureSpec::Unspecified => self.default_size,
            MeasureSpec::Exactly(size) | MeasureSpec::AtMost(size) => size,
        }
    }

    /// Measured (square) side length for the given constraints
    pub fn measure(&self, width: MeasureSpec, height: MeasureSpec) -> u32 {
        self.measure_axis(width).min(self.measure_axis(height))
    }

    /// Derive the joystick geometry for a view of `width` x `height`
    ///
    /// Returns `None` while the view has no area, which keeps the
    /// controller inert until a real size arrives.
    pub fn layout(&self, width: u32, height: u32) -> Option<Layout> {
        let side = width.min(height);
        if side == 0 {
            return None;
        }

        let half = f64::from(side) / 2.0;
        let center = Point::new(f64::from(width) / 2.0, f64::from(height) / 2.0);
        let border = Circle::new(center, half * self.border_ratio).ok()?;

        Some(Layout {
            border,
            button_radius: half * self.button_ratio,
        })
    }
}

impl Default for LayoutPolicy {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_SIZE,
            button_ratio: RATIO_SIZE_BUTTON,
            border_ratio: RATIO_SIZE_BORDER,
        }
    }
}

/// Geometry derived from the view size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Outer circle the button is confined to
    pub border: Circle,
    /// Radius of the button; only used for painting
    pub button_radius: f64,
}

pub(crate) fn check_ratio(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(JoystickError::InvalidRatio { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_falls_back_to_default() {
        let policy = LayoutPolicy::default();
        assert_eq!(policy.measure(MeasureSpec::Unspecified, MeasureSpec::Unspecified), 200);
        assert_eq!(policy.measure(MeasureSpec::Unspecified, MeasureSpec::AtMost(150)), 150);
    }

    #[test]
    fn test_measure_is_square_on_shorter_side() {
        let policy = LayoutPolicy::default();
        assert_eq!(policy.measure(MeasureSpec::Exactly(480), MeasureSpec::AtMost(320)), 320);
        assert_eq!(policy.measure(MeasureSpec::Exactly(300), MeasureSpec::Unspecified), 200);
    }

    #[test]
    fn test_layout_derives_radii() {
        let layout = LayoutPolicy::default().layout(200, 200).unwrap();
        assert_eq!(layout.border.center(), Point::new(100.0, 100.0));
        assert_eq!(layout.border.radius(), 75.0);
        assert_eq!(layout.button_radius, 25.0);
    }

    #[test]
    fn test_layout_uses_shorter_side() {
        let layout = LayoutPolicy::default().layout(400, 200).unwrap();
        assert_eq!(layout.border.center(), Point::new(200.0, 100.0));
        assert_eq!(layout.border.radius(), 75.0);
    }

    #[test]
    fn test_zero_size_has_no_layout() {
        let policy = LayoutPolicy::default();
        assert!(policy.layout(0, 200).is_none());
        assert!(policy.layout(200, 0).is_none());
    }

    #[test]
    fn test_policy_rejects_bad_ratios() {
        assert!(LayoutPolicy::new(200, 0.0, 0.75).is_err());
        assert!(LayoutPolicy::new(200, 0.25, 1.5).is_err());
        assert!(LayoutPolicy::new(200, 0.25, f64::NAN).is_err());
        assert!(LayoutPolicy::new(200, 0.25, 1.0).is_ok());
    }
}
