use raylib::prelude::*;

use crate::constants::*;
use crate::ease::ease;
use crate::viewport::{PixelSize, Viewport};

use super::{Effect, EffectKind, Frame, Layer, Sprite, centered_rect, opaque, zoomed_rect_centered};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrossfadeStage {
    Crossfade,
    ScaleUp,
    Complete,
}

/// Alpha blend from the outgoing image (at its last on-screen rectangle) to
/// the incoming one, centered at full size. Dimension match is guaranteed by
/// the orchestrator.
pub struct Crossfade {
    size: PixelSize,
    previous_dest: Rectangle,
    stage: CrossfadeStage,
    stage_timer: f32,
    alpha: u8,
    dest: Rectangle,
}

impl Crossfade {
    pub fn new(size: PixelSize, previous_dest: Rectangle, viewport: Viewport) -> Self {
        Self {
            size,
            previous_dest,
            stage: CrossfadeStage::Crossfade,
            stage_timer: 0.0,
            alpha: 0,
            dest: centered_rect(viewport, size.width as f32, size.height as f32),
        }
    }

    pub fn stage(&self) -> CrossfadeStage {
        self.stage
    }

    pub fn alpha(&self) -> u8 {
        self.alpha
    }
}

impl Effect for Crossfade {
    fn kind(&self) -> EffectKind {
        EffectKind::Crossfade
    }

    fn update(&mut self, dt: f32, viewport: Viewport) {
        match self.stage {
            CrossfadeStage::Crossfade => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / CROSSFADE_DURATION).min(1.0);
                self.alpha = (255.0 * ease(progress)) as u8;
                self.dest = centered_rect(viewport, self.size.width as f32, self.size.height as f32);
                if progress >= 1.0 {
                    self.stage = CrossfadeStage::ScaleUp;
                    self.stage_timer = 0.0;
                    self.alpha = 255;
                }
            }
            CrossfadeStage::ScaleUp => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / SCALE_DURATION).min(1.0);
                self.dest = zoomed_rect_centered(viewport, self.size, ease(progress));
                if progress >= 1.0 {
                    self.stage = CrossfadeStage::Complete;
                    self.stage_timer = 0.0;
                    self.dest = zoomed_rect_centered(viewport, self.size, 1.0);
                }
            }
            CrossfadeStage::Complete => {}
        }
    }

    fn frame(&self) -> Frame {
        match self.stage {
            CrossfadeStage::Crossfade => Frame::Layered {
                back: Sprite {
                    layer: Layer::Previous,
                    dest: self.previous_dest,
                    alpha: 255 - self.alpha,
                },
                front: Sprite {
                    layer: Layer::Current,
                    dest: self.dest,
                    alpha: self.alpha,
                },
            },
            _ => Frame::Single(opaque(Layer::Current, self.dest)),
        }
    }

    fn is_complete(&self) -> bool {
        self.stage == CrossfadeStage::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport { width: 1366, height: 768 };
    const SIZE: PixelSize = PixelSize { width: 800, height: 600 };

    fn previous_dest() -> Rectangle {
        Rectangle::new(263.0, 69.0, 840.0, 630.0)
    }

    fn run(effect: &mut Crossfade, seconds: f32, step: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            effect.update(step, VIEWPORT);
            elapsed += step;
        }
    }

    #[test]
    fn starts_fully_transparent_over_opaque_previous() {
        let effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        match effect.frame() {
            Frame::Layered { back, front } => {
                assert_eq!(back.layer, Layer::Previous);
                assert_eq!(back.alpha, 255);
                assert_eq!(front.layer, Layer::Current);
                assert_eq!(front.alpha, 0);
            }
            Frame::Single(_) => panic!("crossfade stage must be layered"),
        }
    }

    #[test]
    fn alphas_always_sum_to_opaque() {
        let mut effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        while effect.stage() == CrossfadeStage::Crossfade {
            effect.update(0.01, VIEWPORT);
            if let Frame::Layered { back, front } = effect.frame() {
                assert_eq!(back.alpha as u16 + front.alpha as u16, 255);
            }
        }
    }

    #[test]
    fn previous_sprite_keeps_its_handed_off_rectangle() {
        let mut effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        run(&mut effect, CROSSFADE_DURATION / 2.0, 0.01);
        match effect.frame() {
            Frame::Layered { back, .. } => {
                assert_eq!(back.dest.x, previous_dest().x);
                assert_eq!(back.dest.width, previous_dest().width);
            }
            Frame::Single(_) => panic!("still blending"),
        }
    }

    #[test]
    fn blend_ends_opaque_then_single_layer() {
        let mut effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        run(&mut effect, CROSSFADE_DURATION + 0.05, 0.01);
        assert_eq!(effect.stage(), CrossfadeStage::ScaleUp);
        assert_eq!(effect.alpha(), 255);
        match effect.frame() {
            Frame::Single(sprite) => {
                assert_eq!(sprite.layer, Layer::Current);
                assert_eq!(sprite.alpha, 255);
            }
            Frame::Layered { .. } => panic!("blend stage must be over"),
        }
    }

    #[test]
    fn new_image_is_centered_at_original_size_while_blending() {
        let mut effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        run(&mut effect, CROSSFADE_DURATION / 3.0, 0.01);
        let front = *effect.frame().front();
        assert_eq!(front.dest.width, 800.0);
        assert_eq!(front.dest.height, 600.0);
        assert_eq!(front.dest.x, (1366.0 - 800.0) / 2.0);
        assert_eq!(front.dest.y, (768.0 - 600.0) / 2.0);
    }

    #[test]
    fn scale_up_ends_exactly_grown() {
        let mut effect = Crossfade::new(SIZE, previous_dest(), VIEWPORT);
        run(&mut effect, CROSSFADE_DURATION + SCALE_DURATION + 0.2, 0.01);
        assert!(effect.is_complete());
        let dest = effect.frame().front().dest;
        assert_eq!(dest.width, 800.0 * (1.0 + SCALE_FACTOR));
        assert_eq!(dest.height, 600.0 * (1.0 + SCALE_FACTOR));
    }
}
