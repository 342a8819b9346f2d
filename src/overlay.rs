use chrono::Local;
use raylib::prelude::*;

use crate::constants::*;
use crate::viewport::Viewport;

/// Clock, date and frame-rate overlay. Drawn once per frame after the
/// slides; has no other contract with the animation core.
pub fn draw(d: &mut RaylibDrawHandle, viewport: Viewport) {
    let now = Local::now();
    let time = now.format("%H:%M").to_string();
    let date = now.format("%A, %B %d").to_string();
    d.draw_text(
        &time,
        TEXT_PADDING,
        viewport.height - 180,
        FONT_SIZE_XLARGE,
        TEXT_COLOR,
    );
    d.draw_text(
        &date,
        TEXT_PADDING,
        viewport.height - 100,
        FONT_SIZE,
        TEXT_COLOR,
    );
    let fps = d.get_fps();
    d.draw_text(
        &format!("FPS: {fps}"),
        TEXT_PADDING,
        TEXT_PADDING,
        FONT_SIZE_SM,
        TEXT_COLOR,
    );
}
