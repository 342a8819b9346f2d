use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};
use exif::{In, Reader, Tag, Value};
use rand::Rng;
use rand::seq::SliceRandom;
use raylib::prelude::*;
use tracing::debug;
use walkdir::WalkDir;

use crate::viewport::{PixelSize, Viewport};

pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "gif"];

/// Decoded, oriented, viewport-fitted image ready to draw.
pub struct LoadedImage {
    pub texture: Texture2D,
    /// Header dimensions, before orientation and downscaling.
    pub raw: PixelSize,
    /// Display dimensions after orientation and fit.
    pub size: PixelSize,
}

/// Non-hidden file with a known raster extension.
pub fn is_image_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'));
    if hidden {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
}

/// Recursively collects displayable image paths under `dir`.
pub fn scan_image_paths(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("failed to walk {}", dir.display()))?;
        if entry.file_type().is_file() && is_image_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    Ok(paths)
}

/// The playback order: every image under `dir`, shuffled with the injected
/// rng. An empty collection is a fatal precondition.
pub fn load_shuffled_image_paths(dir: &Path, rng: &mut impl Rng) -> Result<Vec<PathBuf>> {
    let mut paths = scan_image_paths(dir)?;
    if paths.is_empty() {
        bail!("no image files found under {}", dir.display());
    }
    paths.shuffle(rng);
    Ok(paths)
}

/// Header-only dimension lookup for the transition eligibility check. Does
/// not decode pixel data.
pub fn probe_dimensions(path: &Path) -> Result<PixelSize> {
    let (width, height) = image::image_dimensions(path)
        .with_context(|| format!("failed to read dimensions of {}", path.display()))?;
    Ok(PixelSize::new(width as i32, height as i32))
}

/// EXIF tag 274. Read from JPEGs only (other raster formats rarely carry
/// it); missing or unreadable metadata means "no rotation".
pub fn read_orientation(path: &Path, bytes: &[u8]) -> u16 {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "jpg" && extension != "jpeg" {
        return 1;
    }
    match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => {
            if let Some(field) = exif.get_field(Tag::Orientation, In::PRIMARY) {
                if let Value::Short(values) = &field.value {
                    if let Some(&orientation) = values.first() {
                        return orientation;
                    }
                }
            }
            1
        }
        Err(e) => {
            debug!("no EXIF orientation for {}: {e}", path.display());
            1
        }
    }
}

/// Loads `path`, applies EXIF rotation, downscales to fit inside the
/// viewport while preserving aspect ratio, and uploads the result as a
/// texture.
pub fn load_texture_fitted(
    rl: &mut RaylibHandle,
    thread: &RaylibThread,
    path: &Path,
    viewport: Viewport,
) -> Result<LoadedImage> {
    let file_bytes =
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_lowercase();

    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| anyhow!("failed to decode {}: {e}", path.display()))?;
    let raw = PixelSize::new(image.width(), image.height());

    // 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW. Mirrored orientations are
    // rare in camera output and are left untouched.
    match read_orientation(path, &file_bytes) {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }

    let (width, height) = (image.width(), image.height());
    if width > viewport.width || height > viewport.height {
        let ratio = (viewport.width as f32 / width as f32)
            .min(viewport.height as f32 / height as f32);
        image.resize(
            ((width as f32 * ratio) as i32).max(1),
            ((height as f32 * ratio) as i32).max(1),
        );
    }
    let size = PixelSize::new(image.width(), image.height());

    let texture = rl
        .load_texture_from_image(thread, &image)
        .map_err(|e| anyhow!("failed to create texture for {}: {e}", path.display()))?;

    Ok(LoadedImage { texture, raw, size })
}
