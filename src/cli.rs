//! Interactive host simulator
//!
//! Plays the part of the UI framework: feeds pointer and resize events to the
//! joystick and prints what the listener and renderer receive.

use anyhow::Result;
use colored::*;
use rustyline::DefaultEditor;
use std::sync::Arc;

use virtual_joystick::geometry::Point;
use virtual_joystick::render::{draw_commands, Frame, Paint};
use virtual_joystick::style::JoystickStyle;
use virtual_joystick::{JoystickHandle, ListenerFn, PolarReading};

const HELP: &str = "\
commands:
  down <x> <y>      press at a point
  move <x> <y>      drag to a point
  up                release
  resize <w> <h>    resize the view
  interval <ms>     change the reporting interval
  show              draw the joystick
  quit              exit";

/// Listener that prints each reading on its own line
pub fn printing_listener() -> ListenerFn {
    Arc::new(|reading: PolarReading| {
        println!(
            "  {} angle {:>3}°  strength {:>3}%",
            "●".cyan(),
            reading.angle.to_string().yellow(),
            reading.strength.to_string().green()
        );
    })
}

pub async fn run_repl(handle: JoystickHandle) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("{}", HELP.dimmed());

    loop {
        let readline = tokio::task::block_in_place(|| rl.readline("joystick> "));
        let line = match readline {
            Ok(line) => line,
            Err(_) => break,
        };
        let _ = rl.add_history_entry(line.as_str());

        let words: Vec<&str> = line.split_whitespace().collect();
        let outcome: Result<()> = match words.as_slice() {
            [] => Ok(()),
            ["quit"] | ["exit"] => break,
            ["help"] => {
                println!("{}", HELP);
                Ok(())
            }
            ["down", x, y] => parse_point(x, y).and_then(|p| Ok(handle.pointer_down(p.x, p.y)?)),
            ["move", x, y] => parse_point(x, y).and_then(|p| Ok(handle.pointer_move(p.x, p.y)?)),
            ["up"] => handle.pointer_up().map_err(Into::into),
            ["resize", w, h] => match (w.parse::<u32>(), h.parse::<u32>()) {
                (Ok(w), Ok(h)) => handle.resize(w, h).map_err(Into::into),
                _ => Err(anyhow::anyhow!("resize expects two whole numbers")),
            },
            ["interval", ms] => match ms.parse::<u64>() {
                Ok(ms) => handle
                    .set_listener_with_interval(printing_listener(), ms)
                    .map_err(Into::into),
                Err(_) => Err(anyhow::anyhow!("interval expects milliseconds")),
            },
            ["show"] => show(&handle).await,
            _ => Err(anyhow::anyhow!("unknown command (try 'help')")),
        };

        if let Err(e) = outcome {
            println!("{} {}", "error:".red().bold(), e);
        }
    }

    Ok(())
}

fn parse_point(x: &str, y: &str) -> Result<Point> {
    let point = Point::new(x.parse()?, y.parse()?);
    anyhow::ensure!(point.is_finite(), "coordinates must be finite numbers");
    Ok(point)
}

async fn show(handle: &JoystickHandle) -> Result<()> {
    let Some(frame) = handle.frame().await? else {
        println!("{}", "joystick has no size yet (try 'resize 200 200')".yellow());
        return Ok(());
    };
    let style = handle.style().await?;

    for row in ascii_art(&frame, &style, 31) {
        println!("{}", row);
    }
    if let Some(reading) = handle.reading().await? {
        println!(
            "position ({:.1}, {:.1})  angle {}°  strength {}%",
            frame.position.x, frame.position.y, reading.angle, reading.strength
        );
    }
    Ok(())
}

/// Rasterize a frame into rows of characters, `columns` wide
///
/// Terminal cells are about twice as tall as wide, so rows are sampled at
/// double the column step.
pub fn ascii_art(frame: &Frame, style: &JoystickStyle, columns: usize) -> Vec<String> {
    let [background, border, button] = draw_commands(frame, style);
    let border_width = match border.paint {
        Paint::Stroke { width, .. } => width.max(1) as f64,
        Paint::Fill(_) => 1.0,
    };
    let shows = |paint: Paint| match paint {
        Paint::Fill(color) | Paint::Stroke { color, .. } => color.is_visible(),
    };
    let (show_background, show_border, show_button) =
        (shows(background.paint), shows(border.paint), shows(button.paint));

    let extent = border.radius + border_width;
    let step = 2.0 * extent / columns as f64;
    let rows = (columns / 2).max(1);
    let origin = Point::new(border.center.x - extent, border.center.y - extent);

    (0..rows)
        .map(|row| {
            (0..columns)
                .map(|col| {
                    let cell = Point::new(
                        origin.x + (col as f64 + 0.5) * step,
                        origin.y + (row as f64 + 0.5) * step * 2.0,
                    );
                    let from_center = cell.distance_to(border.center);
                    if show_button && cell.distance_to(button.center) <= button.radius {
                        '@'
                    } else if show_border
                        && (from_center - border.radius).abs() <= step.max(border_width / 2.0)
                    {
                        'o'
                    } else if show_background && from_center < background.radius {
                        '.'
                    } else {
                        ' '
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use virtual_joystick::geometry::Circle;
    use virtual_joystick::style::Color;

    #[test]
    fn test_ascii_art_dimensions_and_button() {
        let frame = Frame {
            circle: Circle::new(Point::new(100.0, 100.0), 75.0).unwrap(),
            position: Point::new(100.0, 100.0),
            button_radius: 25.0,
        };
        let art = ascii_art(&frame, &JoystickStyle::default(), 31);

        assert_eq!(art.len(), 15);
        assert!(art.iter().all(|row| row.chars().count() == 31));
        // Button sits in the middle of the middle row
        assert_eq!(art[7].chars().nth(15), Some('@'));
        assert!(art.iter().any(|row| row.contains('o')));
        // Default background is transparent
        assert!(art.iter().all(|row| !row.contains('.')));
    }

    #[test]
    fn test_ascii_art_skips_transparent_layers() {
        let frame = Frame {
            circle: Circle::new(Point::new(100.0, 100.0), 75.0).unwrap(),
            position: Point::new(100.0, 100.0),
            button_radius: 25.0,
        };
        let mut style = JoystickStyle::default();
        style.background_color = Color::argb(0xFF, 0xEE, 0xEE, 0xEE);
        style.button_color = Color::TRANSPARENT;

        let art = ascii_art(&frame, &style, 31);

        assert!(art.iter().all(|row| !row.contains('@')));
        assert_eq!(art[7].chars().nth(15), Some('.'));
    }
}
