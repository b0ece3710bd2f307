//! Settings for the demo.
//!
//! Everything tunable lives in [`Config`]. The defaults reproduce the
//! classic setup: a white player rectangle in the top-left corner and a cyan
//! square spinning in the middle of an 850x480 window.

use log::LevelFilter;
use sat_core::P2;
use std::time::Duration;

/// RGBA color with components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Color {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub alpha: f32,
}
impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const CYAN: Color = Color::rgb(0.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);

    /// Opaque color.
    pub const fn rgb(red: f32, green: f32, blue: f32) -> Color {
        Color {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }

    /// Return the color components as an RGBA array.
    pub fn as_array(&self) -> [f32; 4] {
        [self.red, self.green, self.blue, self.alpha]
    }
}

impl From<Color> for wgpu::Color {
    fn from(color: Color) -> wgpu::Color {
        wgpu::Color {
            r: color.red as f64,
            g: color.green as f64,
            b: color.blue as f64,
            a: color.alpha as f64,
        }
    }
}

/// Demo configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Window title.
    pub title: &'static str,
    /// Window width in pixels.
    pub window_width: u32,
    /// Window height in pixels.
    pub window_height: u32,
    /// Override the logging level. `None` leaves it to `RUST_LOG`.
    pub log_level: Option<LevelFilter>,
    /// Length of one simulation tick.
    pub tick_period: Duration,
    /// Distance the player moves per tick while an arrow key is held.
    pub movement_speed: f64,
    /// Degrees the spinner turns per tick.
    pub spin_per_tick: f64,
    /// Width and height of the player rectangle.
    pub player_size: (f64, f64),
    /// Top-left corner of the player rectangle at start.
    pub player_start: P2,
    /// Width and height of the spinning rectangle.
    pub spinner_size: (f64, f64),
    pub player_color: Color,
    /// Spinner color while nothing touches it.
    pub clear_color: Color,
    /// Spinner color while the player or the cursor touches it.
    pub hit_color: Color,
    pub background_color: Color,
}
impl Config {
    /// Center of the window, where the spinner sits.
    pub fn window_center(&self) -> P2 {
        P2::new(
            self.window_width as f64 / 2.0,
            self.window_height as f64 / 2.0,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "SAT TESTING",
            window_width: 850,
            window_height: 480,
            log_level: None,
            tick_period: Duration::from_micros(100),
            movement_speed: 0.02,
            spin_per_tick: 0.005,
            player_size: (100.0, 150.0),
            player_start: P2::new(0.0, 0.0),
            spinner_size: (50.0, 50.0),
            player_color: Color::WHITE,
            clear_color: Color::CYAN,
            hit_color: Color::RED,
            background_color: Color::BLACK,
        }
    }
}
