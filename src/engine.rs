use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::StdRng;
use raylib::prelude::*;
use tracing::{error, info, warn};

use crate::constants::*;
use crate::effects::EffectKind;
use crate::slide::Slide;
use crate::texture_loader::{load_texture_fitted, probe_dimensions};
use crate::viewport::{PixelSize, Viewport};

/// Shuffled image collection with a wrapping cursor.
pub struct Playlist {
    paths: Vec<PathBuf>,
    cursor: usize,
}

impl Playlist {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn current(&self) -> &Path {
        &self.paths[self.cursor]
    }

    /// Moves the cursor forward, wrapping modulo the collection size. A
    /// single-entry collection wraps to itself.
    pub fn advance(&mut self) -> &Path {
        self.cursor = (self.cursor + 1) % self.paths.len();
        self.current()
    }
}

/// Only images sharing identical header dimensions may flip or crossfade;
/// those effects assume consistent framing. An unreadable probe fails closed.
pub fn eligible(finished_raw: PixelSize, probe: Option<PixelSize>) -> bool {
    probe == Some(finished_raw)
}

pub fn choose_effect(eligible: bool, rng: &mut impl Rng) -> EffectKind {
    if eligible {
        if rng.random_range(0..2) == 0 {
            EffectKind::Flip
        } else {
            EffectKind::Crossfade
        }
    } else {
        EffectKind::SlideIn
    }
}

/// Owns the whole playback state: the playlist cursor, the on-screen slide,
/// the retained backdrop, the animation clock and the scheduled transition
/// trigger. Single writer for all of it; the render loop just calls
/// `tick` and `draw`.
pub struct Slideshow {
    playlist: Playlist,
    rng: StdRng,
    viewport: Viewport,
    current: Option<Slide>,
    background: Option<Slide>,
    clock: f64,
    next_trigger: f64,
}

impl Slideshow {
    /// Builds the first slide (always a slide_in). Images that fail to load
    /// are skipped; failing to find any displayable image is fatal.
    pub fn new(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        paths: Vec<PathBuf>,
        mut rng: StdRng,
        viewport: Viewport,
    ) -> Result<Self> {
        let mut playlist = Playlist::new(paths);
        let mut current = None;
        for _ in 0..playlist.len() {
            let path = playlist.current().to_path_buf();
            match load_texture_fitted(rl, thread, &path, viewport) {
                Ok(loaded) => {
                    current = Some(Slide::new(
                        path,
                        loaded,
                        EffectKind::SlideIn,
                        None,
                        viewport,
                        &mut rng,
                    ));
                    break;
                }
                Err(e) => {
                    warn!("skipping {}: {e:#}", path.display());
                    playlist.advance();
                }
            }
        }
        let current = current.context("none of the images could be displayed")?;
        info!(
            "slideshow ready: {} images, starting with {}",
            playlist.len(),
            current.path().display()
        );
        let next_trigger = EffectKind::SlideIn.run_time() as f64 + DWELL_MARGIN;
        Ok(Self {
            playlist,
            rng,
            viewport,
            current: Some(current),
            background: None,
            clock: 0.0,
            next_trigger,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Advances the animation clock, updates the current slide, drops the
    /// backdrop once the entry animation no longer needs it, and runs the
    /// completion check that hands control to the next image.
    pub fn tick(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread) {
        self.clock += dt as f64;
        let Some(current) = self.current.as_mut() else {
            return;
        };
        current.update(dt, self.viewport);
        if !current.needs_backdrop() {
            self.background = None;
        }
        if current.is_complete() && self.clock >= self.next_trigger {
            self.advance(rl, thread);
        }
    }

    /// The transition decision: advance the cursor, probe the candidate's
    /// raw dimensions, pick an effect, and wire the finished slide's visual
    /// state into the successor. Unloadable candidates are skipped, at most
    /// once around the playlist; if everything fails the finished slide
    /// stays up and the attempt is rescheduled.
    fn advance(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let Some(finished) = self.current.take() else {
            return;
        };
        for _ in 0..self.playlist.len() {
            let path = self.playlist.advance().to_path_buf();
            let probe = match probe_dimensions(&path) {
                Ok(size) => Some(size),
                Err(e) => {
                    warn!("probe failed for {}: {e:#}", path.display());
                    None
                }
            };
            let kind = choose_effect(eligible(finished.raw_size(), probe), &mut self.rng);
            match load_texture_fitted(rl, thread, &path, self.viewport) {
                Ok(loaded) => {
                    let (next, background) =
                        finished.succeed(path, loaded, kind, self.viewport, &mut self.rng);
                    self.background = background;
                    self.next_trigger = self.clock + kind.run_time() as f64 + DWELL_MARGIN;
                    self.current = Some(next);
                    return;
                }
                Err(e) => warn!("skipping {}: {e:#}", path.display()),
            }
        }
        error!("no displayable image in the playlist; keeping the current slide");
        self.next_trigger = self.clock + EffectKind::SlideIn.run_time() as f64 + DWELL_MARGIN;
        self.current = Some(finished);
    }

    /// A viewport change invalidates every cached placement: rebuild the
    /// current image as a fresh slide_in, clear the backdrop and reset the
    /// transition timer. If the rebuild fails the old slide stays (with its
    /// old fit) until the next transition refits.
    pub fn handle_resize(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) {
        let viewport = Viewport::new(rl.get_screen_width(), rl.get_screen_height());
        self.viewport = viewport;
        self.background = None;
        if let Some(current) = self.current.take() {
            let path = current.path().to_path_buf();
            match load_texture_fitted(rl, thread, &path, viewport) {
                Ok(loaded) => {
                    self.current = Some(Slide::new(
                        path,
                        loaded,
                        EffectKind::SlideIn,
                        None,
                        viewport,
                        &mut self.rng,
                    ));
                }
                Err(e) => {
                    warn!("resize reload failed for {}: {e:#}", path.display());
                    self.current = Some(current);
                }
            }
        }
        self.next_trigger = self.clock + EffectKind::SlideIn.run_time() as f64 + DWELL_MARGIN;
    }

    /// Backdrop first, current slide above it. The overlay is drawn by the
    /// caller after this.
    pub fn draw(&self, d: &mut RaylibDrawHandle) {
        if let Some(background) = &self.background {
            background.draw(d);
        }
        if let Some(current) = &self.current {
            current.draw(d);
        }
    }
}
