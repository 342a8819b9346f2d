use raylib::prelude::*;

use crate::constants::*;
use crate::ease::{ease, ease_sqrt};
use crate::viewport::{PixelSize, Viewport};

use super::{Effect, EffectKind, Frame, Layer, centered_rect, opaque, zoomed_rect_centered};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipStage {
    FlipOutCurrent,
    FlipInNew,
    ScaleUp,
    Complete,
}

/// Vertical collapse of the outgoing image down to a 1 px line, then the
/// incoming image expands from that line. Requires matching dimensions, which
/// the orchestrator guarantees before choosing this effect.
pub struct Flip {
    size: PixelSize,
    previous_size: PixelSize,
    stage: FlipStage,
    stage_timer: f32,
    layer: Layer,
    dest: Rectangle,
}

impl Flip {
    pub fn new(size: PixelSize, previous_size: PixelSize, viewport: Viewport) -> Self {
        Self {
            size,
            previous_size,
            stage: FlipStage::FlipOutCurrent,
            stage_timer: 0.0,
            layer: Layer::Previous,
            dest: centered_rect(
                viewport,
                previous_size.width as f32,
                previous_size.height as f32,
            ),
        }
    }

    pub fn stage(&self) -> FlipStage {
        self.stage
    }
}

impl Effect for Flip {
    fn kind(&self) -> EffectKind {
        EffectKind::Flip
    }

    fn update(&mut self, dt: f32, viewport: Viewport) {
        let half_flip = FLIP_DURATION / 2.0;
        match self.stage {
            FlipStage::FlipOutCurrent => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / half_flip).min(1.0);
                let height = (self.previous_size.height as f32 * (1.0 - ease_sqrt(progress))).max(1.0);
                self.dest = centered_rect(viewport, self.previous_size.width as f32, height);
                if progress >= 1.0 {
                    self.stage = FlipStage::FlipInNew;
                    self.stage_timer = 0.0;
                    self.layer = Layer::Current;
                    self.dest = centered_rect(viewport, self.size.width as f32, 1.0);
                }
            }
            FlipStage::FlipInNew => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / half_flip).min(1.0);
                let height = (self.size.height as f32 * ease_sqrt(progress)).max(1.0);
                self.dest = centered_rect(viewport, self.size.width as f32, height);
                if progress >= 1.0 {
                    self.stage = FlipStage::ScaleUp;
                    self.stage_timer = 0.0;
                    self.dest =
                        centered_rect(viewport, self.size.width as f32, self.size.height as f32);
                }
            }
            FlipStage::ScaleUp => {
                self.stage_timer += dt;
                let progress = (self.stage_timer / SCALE_DURATION).min(1.0);
                self.dest = zoomed_rect_centered(viewport, self.size, ease(progress));
                if progress >= 1.0 {
                    self.stage = FlipStage::Complete;
                    self.stage_timer = 0.0;
                    self.dest = zoomed_rect_centered(viewport, self.size, 1.0);
                }
            }
            FlipStage::Complete => {}
        }
    }

    fn frame(&self) -> Frame {
        Frame::Single(opaque(self.layer, self.dest))
    }

    fn is_complete(&self) -> bool {
        self.stage == FlipStage::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Viewport = Viewport { width: 1366, height: 768 };
    const SIZE: PixelSize = PixelSize { width: 800, height: 600 };

    fn run(effect: &mut Flip, seconds: f32, step: f32) {
        let mut elapsed = 0.0;
        while elapsed < seconds {
            effect.update(step, VIEWPORT);
            elapsed += step;
        }
    }

    #[test]
    fn starts_on_the_previous_layer_at_full_height() {
        let effect = Flip::new(SIZE, SIZE, VIEWPORT);
        let sprite = *effect.frame().front();
        assert_eq!(sprite.layer, Layer::Previous);
        assert_eq!(sprite.dest.height, 600.0);
        assert_eq!(sprite.dest.y, (768.0 - 600.0) / 2.0);
    }

    #[test]
    fn collapse_midpoint_is_strictly_between_one_and_full() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        run(&mut effect, FLIP_DURATION / 4.0, 0.005);
        let height = effect.frame().front().dest.height;
        assert!(height > 1.0 && height < 600.0, "height was {height}");
        assert_eq!(effect.stage(), FlipStage::FlipOutCurrent);
    }

    #[test]
    fn collapse_clamps_to_one_pixel_never_zero() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        // Stop just shy of the stage boundary so the clamp, not the snap, is
        // what keeps the height at 1.
        run(&mut effect, FLIP_DURATION / 2.0 - 0.006, 0.005);
        assert!(effect.frame().front().dest.height >= 1.0);
        assert_eq!(effect.stage(), FlipStage::FlipOutCurrent);
    }

    #[test]
    fn switches_to_current_layer_for_the_expand_half() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        run(&mut effect, FLIP_DURATION / 2.0 + 0.02, 0.005);
        let sprite = *effect.frame().front();
        assert_eq!(effect.stage(), FlipStage::FlipInNew);
        assert_eq!(sprite.layer, Layer::Current);
        assert!(sprite.dest.height >= 1.0 && sprite.dest.height < 600.0);
    }

    #[test]
    fn expand_ends_centered_at_full_size() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        run(&mut effect, FLIP_DURATION + 0.05, 0.005);
        assert_eq!(effect.stage(), FlipStage::ScaleUp);
        let dest = effect.frame().front().dest;
        // First scale_up ticks have barely grown it.
        assert!((dest.height - 600.0).abs() < 5.0);
        assert!((dest.x - (1366.0 - dest.width) / 2.0).abs() < 1e-3);
    }

    #[test]
    fn scale_up_ends_exactly_grown_and_centered() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        run(&mut effect, FLIP_DURATION + SCALE_DURATION + 0.2, 0.01);
        assert!(effect.is_complete());
        let dest = effect.frame().front().dest;
        assert_eq!(dest.width, 800.0 * (1.0 + SCALE_FACTOR));
        assert_eq!(dest.height, 600.0 * (1.0 + SCALE_FACTOR));
        assert_eq!(dest.x, (1366.0 - dest.width) / 2.0);
        assert_eq!(dest.y, (768.0 - dest.height) / 2.0);
        assert!(!effect.needs_backdrop());
    }

    #[test]
    fn stages_never_go_backwards() {
        let mut effect = Flip::new(SIZE, SIZE, VIEWPORT);
        let order = [
            FlipStage::FlipOutCurrent,
            FlipStage::FlipInNew,
            FlipStage::ScaleUp,
            FlipStage::Complete,
        ];
        let mut last = 0;
        for _ in 0..2000 {
            effect.update(0.005, VIEWPORT);
            let index = order.iter().position(|s| *s == effect.stage()).unwrap();
            assert!(index >= last);
            last = index;
        }
        assert!(effect.is_complete());
    }
}
