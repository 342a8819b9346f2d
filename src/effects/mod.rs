use raylib::prelude::*;

use crate::constants::*;
use crate::viewport::{PixelSize, Viewport};

pub mod crossfade;
pub mod flip;
pub mod slide_in;

pub use crossfade::Crossfade;
pub use flip::Flip;
pub use slide_in::{SlideDirection, SlideIn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectKind {
    SlideIn,
    Flip,
    Crossfade,
}

impl EffectKind {
    /// Nominal time from construction through the end of `scale_up`. The
    /// orchestrator schedules the next transition this far ahead.
    pub fn run_time(self) -> f32 {
        match self {
            EffectKind::SlideIn => SLIDE_DURATION + SCALE_DURATION,
            EffectKind::Flip => FLIP_DURATION + SCALE_DURATION,
            EffectKind::Crossfade => CROSSFADE_DURATION + SCALE_DURATION,
        }
    }
}

/// Which of the slide's textures a sprite samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Current,
    Previous,
}

/// One blit: a texture layer stretched into a destination rectangle at the
/// given opacity.
#[derive(Debug, Clone, Copy)]
pub struct Sprite {
    pub layer: Layer,
    pub dest: Rectangle,
    pub alpha: u8,
}

/// What an effect wants on screen this tick. `back` is drawn before `front`;
/// only the crossfade blend stage needs two layers.
#[derive(Debug, Clone, Copy)]
pub enum Frame {
    Single(Sprite),
    Layered { back: Sprite, front: Sprite },
}

impl Frame {
    /// The sprite showing the slide's own image.
    pub fn front(&self) -> &Sprite {
        match self {
            Frame::Single(sprite) => sprite,
            Frame::Layered { front, .. } => front,
        }
    }
}

/// One transition animation. Stages advance on elapsed time only and are
/// never revisited; once `is_complete` the frame is frozen.
pub trait Effect {
    fn kind(&self) -> EffectKind;
    fn update(&mut self, dt: f32, viewport: Viewport);
    fn frame(&self) -> Frame;
    fn is_complete(&self) -> bool;
    /// True while the previous slide must stay visible beneath this one.
    fn needs_backdrop(&self) -> bool {
        false
    }
}

pub(crate) fn opaque(layer: Layer, dest: Rectangle) -> Sprite {
    Sprite { layer, dest, alpha: 255 }
}

/// X offset that keeps an image narrower than the viewport horizontally
/// centered; full-width images sit at the left edge.
pub(crate) fn center_x_offset(viewport: Viewport, width: f32) -> f32 {
    if width < viewport.width as f32 {
        (viewport.width as f32 - width) / 2.0
    } else {
        0.0
    }
}

/// Rectangle of the given size anchored to the viewport center.
pub(crate) fn centered_rect(viewport: Viewport, width: f32, height: f32) -> Rectangle {
    Rectangle::new(
        (viewport.width as f32 - width) / 2.0,
        (viewport.height as f32 - height) / 2.0,
        width,
        height,
    )
}

/// `scale_up` placement for the center-anchored effects: the image grown by
/// `1 + eased · SCALE_FACTOR`, still centered on both axes.
pub(crate) fn zoomed_rect_centered(viewport: Viewport, size: PixelSize, eased: f32) -> Rectangle {
    let scale = 1.0 + eased * SCALE_FACTOR;
    let width = (size.width as f32 * scale).max(1.0);
    let height = (size.height as f32 * scale).max(1.0);
    centered_rect(viewport, width, height)
}
