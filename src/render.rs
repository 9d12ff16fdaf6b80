//! Renderer contract
//!
//! The core never paints. After every position change it hands the host a
//! [`Frame`] through [`Renderer::request_redraw`]; the host turns that into
//! pixels, optionally via [`draw_commands`].

use std::sync::Arc;

use crate::geometry::{Circle, Point};
use crate::style::{Color, JoystickStyle};

/// Snapshot of everything needed to paint the joystick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub circle: Circle,
    pub position: Point,
    pub button_radius: f64,
}

/// Host-side redraw hook
///
/// Called from the context that owns the controller, never from the
/// reporting timer.
pub trait Renderer: Send + Sync {
    fn request_redraw(&self, frame: &Frame);
}

impl<F> Renderer for F
where
    F: Fn(&Frame) + Send + Sync,
{
    fn request_redraw(&self, frame: &Frame) {
        self(frame)
    }
}

/// Shared renderer handle
pub type RendererRef = Arc<dyn Renderer>;

/// How a circle is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Fill(Color),
    Stroke { color: Color, width: u32 },
}

/// One circle in the paint list
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCircle {
    pub center: Point,
    pub radius: f64,
    pub paint: Paint,
}

/// Paint list for a frame, back to front
///
/// Background fill and border stroke share the boundary circle; the button
/// is filled at the current position.
pub fn draw_commands(frame: &Frame, style: &JoystickStyle) -> [DrawCircle; 3] {
    let center = frame.circle.center();
    let radius = frame.circle.radius();

    [
        DrawCircle {
            center,
            radius,
            paint: Paint::Fill(style.background_color),
        },
        DrawCircle {
            center,
            radius,
            paint: Paint::Stroke {
                color: style.border_color,
                width: style.border_width,
            },
        },
        DrawCircle {
            center: frame.position,
            radius: frame.button_radius,
            paint: Paint::Fill(style.button_color),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_order_and_paints() {
        let circle = Circle::new(Point::new(100.0, 100.0), 75.0).unwrap();
        let frame = Frame {
            circle,
            position: Point::new(120.0, 90.0),
            button_radius: 25.0,
        };
        let style = JoystickStyle::default();

        let [background, border, button] = draw_commands(&frame, &style);

        assert_eq!(background.paint, Paint::Fill(Color::TRANSPARENT));
        assert_eq!(background.radius, 75.0);
        assert_eq!(
            border.paint,
            Paint::Stroke {
                color: Color::BLACK,
                width: 3
            }
        );
        assert_eq!(border.center, Point::new(100.0, 100.0));
        assert_eq!(button.center, Point::new(120.0, 90.0));
        assert_eq!(button.radius, 25.0);
        assert_eq!(button.paint, Paint::Fill(Color::BLACK));
    }
}
