use rand::Rng;
use raylib::prelude::*;

use crate::constants::*;
use crate::ease::ease;
use crate::viewport::{PixelSize, Viewport};

use super::{Effect, EffectKind, Frame, Layer, center_x_offset, opaque};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideInStage {
    Slide,
    ScaleUp,
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDirection {
    Left,
    Right,
}

impl SlideDirection {
    pub fn random(rng: &mut impl Rng) -> Self {
        if rng.random_bool(0.5) {
            SlideDirection::Left
        } else {
            SlideDirection::Right
        }
    }
}

/// Horizontal entry from off-screen, then the shared zoom dwell. The only
/// effect that needs the previous slide kept as a backdrop, because it leaves
/// blank space around the image while it is still travelling.
pub struct SlideIn {
    size: PixelSize,
    direction: SlideDirection,
    stage: SlideInStage,
    stage_timer: f32,
    dest: Rectangle,
}

impl SlideIn {
    pub fn new(size: PixelSize, viewport: Viewport, direction: SlideDirection) -> Self {
        let (width, height) = (size.width as f32, size.height as f32);
        let offset = center_x_offset(viewport, width);
        let x = match direction {
            SlideDirection::Left => -(viewport.width as f32) + offset,
            SlideDirection::Right => viewport.width as f32 + offset,
        };
        Self {
            size,
            direction,
            stage: SlideInStage::Slide,
            stage_timer: 0.0,
            dest: Rectangle::new(x, 0.0, width, height),
        }
    }

    pub fn stage(&self) -> SlideInStage {
        self.stage
    }

    /// Grows around the top-anchored resting position: the corner backs off
    /// by half the size delta on each axis.
    fn zoomed_dest(&self, viewport: Viewport, eased: f32) -> Rectangle {
        let scale = 1.0 + eased * SCALE_FACTOR;
        let (width, height) = (self.size.width as f32, self.size.height as f32);
        let grown_w = (width * scale).max(1.0);
        let grown_h = (height * scale).max(1.0);
        let offset = center_x_offset(viewport, width);
        Rectangle::new(
            offset - (grown_w - width) / 2.0,
            -(grown_h - height) / 2.0,
            grown_w,
            grown_h,
        )
    }
}

impl Effect for SlideIn {
    fn kind(&self) -> EffectKind {
        EffectKind::SlideIn
    }

    fn update(&mut self, dt: f32, viewport: Viewport) {
        match self.stage {
            SlideInStage::Slide => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / SLIDE_DURATION).min(1.0);
                let eased = ease(progress);
                let travel = viewport.width as f32;
                let (width, height) = (self.size.width as f32, self.size.height as f32);
                let offset = center_x_offset(viewport, width);
                let x = match self.direction {
                    SlideDirection::Left => -travel + travel * eased + offset,
                    SlideDirection::Right => travel - travel * eased + offset,
                };
                self.dest = Rectangle::new(x, 0.0, width, height);
                if progress >= 1.0 {
                    self.stage = SlideInStage::ScaleUp;
                    self.stage_timer = 0.0;
                    self.dest = Rectangle::new(offset, 0.0, width, height);
                }
            }
            SlideInStage::ScaleUp => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / SCALE_DURATION).min(1.0);
                self.dest = self.zoomed_dest(viewport, ease(progress));
                if progress >= 1.0 {
                    self.stage = SlideInStage::Complete;
                    self.stage_timer = 0.0;
                    self.dest = self.zoomed_dest(viewport, 1.0);
                }
            }
            SlideInStage::Complete => {}
        }
    }

    fn frame(&self) -> Frame {
        Frame::Single(opaque(Layer::Current, self.dest))
    }

    fn is_complete(&self) -> bool {
        self.stage == SlideInStage::Complete
    }

    fn needs_backdrop(&self) -> bool {
        self.stage == SlideInStage::Slide
    }
}
