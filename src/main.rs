use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use raylib::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod constants;
mod ease;
mod effects;
mod engine;
mod overlay;
mod slide;
mod staging;
mod texture_loader;
mod viewport;

use crate::constants::*;
use crate::engine::Slideshow;
use crate::texture_loader::load_shuffled_image_paths;
use crate::viewport::Viewport;

#[derive(Debug, Parser)]
#[command(
    name = "photo-slideshow",
    version,
    about = "fullscreen photo slideshow with animated transitions and a clock"
)]
struct Args {
    /// Directory scanned recursively for images
    #[arg(value_name = "IMAGE_DIR")]
    images: PathBuf,
    /// Deterministic RNG seed for shuffling and effect choice
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    /// Stay in a resizable window instead of going fullscreen
    #[arg(long)]
    windowed: bool,
    /// Mirror the image folder here first and play from the copy
    #[arg(long, value_name = "DIR")]
    stage_dir: Option<PathBuf>,
    /// With --stage-dir: write viewport-fitted copies instead of raw bytes
    #[arg(long, requires = "stage_dir")]
    resize: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let play_dir = match &args.stage_dir {
        Some(stage) => {
            let count = if args.resize {
                staging::resize_tree(
                    &args.images,
                    stage,
                    Viewport::new(WINDOW_WIDTH, WINDOW_HEIGHT),
                )?
            } else {
                staging::copy_tree(&args.images, stage)?
            };
            info!("staged {count} files into {}", stage.display());
            stage.clone()
        }
        None => args.images.clone(),
    };

    let (mut rl, thread) = raylib::init()
        .size(WINDOW_WIDTH, WINDOW_HEIGHT)
        .title("Photo Slideshow")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);
    if !args.windowed {
        rl.toggle_fullscreen();
    }

    let viewport = Viewport::new(rl.get_screen_width(), rl.get_screen_height());
    let paths = load_shuffled_image_paths(&play_dir, &mut rng)?;
    let mut slideshow = Slideshow::new(&mut rl, &thread, paths, rng, viewport)?;

    while !rl.window_should_close() {
        if rl.is_window_resized() {
            slideshow.handle_resize(&mut rl, &thread);
        }
        let dt = rl.get_frame_time();
        slideshow.tick(dt, &mut rl, &thread);

        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        slideshow.draw(&mut d);
        overlay::draw(&mut d, slideshow.viewport());
    }

    Ok(())
}
