use std::path::{Path, PathBuf};

use rand::Rng;
use raylib::prelude::*;

use crate::effects::{
    Crossfade, Effect, EffectKind, Flip, Frame, Layer, SlideDirection, SlideIn, Sprite,
};
use crate::texture_loader::LoadedImage;
use crate::viewport::{PixelSize, Viewport};

/// Visual state carried from a finished slide into its successor's effect:
/// the surface that was on screen, its display size, and where it last sat.
pub struct Handoff {
    pub texture: Texture2D,
    pub size: PixelSize,
    pub dest: Rectangle,
}

/// One image's full display lifecycle: its texture, the effect animating it,
/// and (for flip/crossfade) the predecessor's surface it composites with.
pub struct Slide {
    path: PathBuf,
    raw: PixelSize,
    size: PixelSize,
    texture: Texture2D,
    previous: Option<Handoff>,
    effect: Box<dyn Effect>,
}

impl Slide {
    /// Builds the slide with the requested effect. Flip and crossfade need
    /// the predecessor's handoff; without one the construction falls back to
    /// slide_in, which is always safe.
    pub fn new(
        path: PathBuf,
        loaded: LoadedImage,
        kind: EffectKind,
        transition: Option<Handoff>,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> Self {
        let LoadedImage { texture, raw, size } = loaded;
        let (effect, previous): (Box<dyn Effect>, Option<Handoff>) = match (kind, transition) {
            (EffectKind::Flip, Some(handoff)) => (
                Box::new(Flip::new(size, handoff.size, viewport)),
                Some(handoff),
            ),
            (EffectKind::Crossfade, Some(handoff)) => (
                Box::new(Crossfade::new(size, handoff.dest, viewport)),
                Some(handoff),
            ),
            _ => (
                Box::new(SlideIn::new(size, viewport, SlideDirection::random(rng))),
                None,
            ),
        };
        Self {
            path,
            raw,
            size,
            texture,
            previous,
            effect,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header dimensions of the source file, before orientation and
    /// downscaling. This is what transition eligibility compares.
    pub fn raw_size(&self) -> PixelSize {
        self.raw
    }

    pub fn update(&mut self, dt: f32, viewport: Viewport) {
        self.effect.update(dt, viewport);
    }

    pub fn is_complete(&self) -> bool {
        self.effect.is_complete()
    }

    pub fn needs_backdrop(&self) -> bool {
        self.effect.needs_backdrop()
    }

    /// Consumes this finished slide and builds its successor. A slide_in
    /// successor keeps `self` alive as the returned backdrop; flip and
    /// crossfade consume `self` into the new slide's transition context.
    pub fn succeed(
        self,
        path: PathBuf,
        loaded: LoadedImage,
        kind: EffectKind,
        viewport: Viewport,
        rng: &mut impl Rng,
    ) -> (Slide, Option<Slide>) {
        match kind {
            EffectKind::SlideIn => {
                let next = Slide::new(path, loaded, kind, None, viewport, rng);
                (next, Some(self))
            }
            EffectKind::Flip | EffectKind::Crossfade => {
                let handoff = self.into_handoff();
                let next = Slide::new(path, loaded, kind, Some(handoff), viewport, rng);
                (next, None)
            }
        }
    }

    fn into_handoff(self) -> Handoff {
        let dest = self.effect.frame().front().dest;
        Handoff {
            texture: self.texture,
            size: self.size,
            dest,
        }
    }

    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        match self.effect.frame() {
            Frame::Single(sprite) => self.draw_sprite(d, &sprite),
            Frame::Layered { back, front } => {
                self.draw_sprite(d, &back);
                self.draw_sprite(d, &front);
            }
        }
    }

    fn draw_sprite(&self, d: &mut RaylibDrawHandle, sprite: &Sprite) {
        let texture = match sprite.layer {
            Layer::Current => &self.texture,
            Layer::Previous => match &self.previous {
                Some(handoff) => &handoff.texture,
                None => return,
            },
        };
        let source = Rectangle::new(0.0, 0.0, texture.width() as f32, texture.height() as f32);
        d.draw_texture_pro(
            texture,
            source,
            sprite.dest,
            Vector2::new(0.0, 0.0),
            0.0,
            Color::new(255, 255, 255, sprite.alpha),
        );
    }
}
