use raylib::prelude::Color;

pub const WINDOW_WIDTH: i32 = 1366;            // Initial window width (windowed mode)
pub const WINDOW_HEIGHT: i32 = 768;            // Initial window height (windowed mode)
pub const FPS: u32 = 120;                      // Frame rate cap

pub const SLIDE_DURATION: f32 = 0.8;           // slide_in entry stage (seconds)
pub const SCALE_DURATION: f32 = 5.0;           // scale_up stage, all effects (seconds)
pub const FLIP_DURATION: f32 = 1.0;            // both flip halves together (seconds)
pub const CROSSFADE_DURATION: f32 = 1.2;       // crossfade blend stage (seconds)
pub const SCALE_FACTOR: f32 = 0.05;            // scale_up grows to 1 + SCALE_FACTOR
pub const DWELL_MARGIN: f64 = 0.001;           // keeps the trigger check off the completion tick

pub const FONT_SIZE_SM: i32 = 40;              // FPS counter
pub const FONT_SIZE: i32 = 60;                 // Date line
pub const FONT_SIZE_XLARGE: i32 = 100;         // Clock
pub const TEXT_PADDING: i32 = 20;              // Overlay inset from the screen edges
pub const TEXT_COLOR: Color = Color::WHITE;
