//! Playback-folder preparation: mirror the source tree into a staging
//! directory, optionally rewriting every image as an orientation-corrected,
//! viewport-fitted copy.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;
use walkdir::WalkDir;

use crate::texture_loader::{is_image_file, read_orientation};
use crate::viewport::Viewport;

fn recreate(dst: &Path) -> Result<()> {
    if dst.exists() {
        fs::remove_dir_all(dst)
            .with_context(|| format!("failed to clear {}", dst.display()))?;
    }
    fs::create_dir_all(dst).with_context(|| format!("failed to create {}", dst.display()))?;
    Ok(())
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.'))
}

/// Recreates `dst` as a mirror of `src`, preserving relative paths and
/// skipping hidden files. Returns the number of files copied.
pub fn copy_tree(src: &Path, dst: &Path) -> Result<usize> {
    recreate(dst)?;
    let mut copied = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        if !entry.file_type().is_file() || is_hidden(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("path outside {}", src.display()))?;
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(entry.path(), &target)
            .with_context(|| format!("failed to copy {}", entry.path().display()))?;
        copied += 1;
    }
    Ok(copied)
}

/// Like `copy_tree`, but every image is decoded, EXIF-rotated, downscaled to
/// fit inside the viewport and re-encoded. Non-image files are left out;
/// images that fail to convert are logged and skipped. Returns the number of
/// images written.
pub fn resize_tree(src: &Path, dst: &Path, viewport: Viewport) -> Result<usize> {
    recreate(dst)?;
    let mut written = 0;
    for entry in WalkDir::new(src) {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        if !entry.file_type().is_file() || !is_image_file(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(src)
            .with_context(|| format!("path outside {}", src.display()))?;
        let target = dst.join(relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        match resize_image(entry.path(), &target, viewport) {
            Ok(()) => written += 1,
            Err(e) => warn!("failed to stage {}: {e:#}", entry.path().display()),
        }
    }
    Ok(written)
}

fn resize_image(src: &Path, dst: &Path, viewport: Viewport) -> Result<()> {
    let bytes = fs::read(src).with_context(|| format!("failed to read {}", src.display()))?;
    let decoded = image::load_from_memory(&bytes)
        .with_context(|| format!("failed to decode {}", src.display()))?;
    let oriented = match read_orientation(src, &bytes) {
        3 => decoded.rotate180(),
        6 => decoded.rotate90(),
        8 => decoded.rotate270(),
        _ => decoded,
    };
    let fitted = if oriented.width() > viewport.width as u32
        || oriented.height() > viewport.height as u32
    {
        oriented.thumbnail(viewport.width as u32, viewport.height as u32)
    } else {
        oriented
    };
    fitted
        .save(dst)
        .with_context(|| format!("failed to write {}", dst.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn copy_mirrors_the_tree_and_skips_hidden_files() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let dst = dst.path().join("out");
        fs::create_dir(src.path().join("nested")).unwrap();
        fs::write(src.path().join("a.jpg"), b"a").unwrap();
        fs::write(src.path().join("nested/b.png"), b"b").unwrap();
        fs::write(src.path().join(".thumbs.db"), b"x").unwrap();

        let copied = copy_tree(src.path(), &dst).unwrap();
        assert_eq!(copied, 2);
        assert!(dst.join("a.jpg").exists());
        assert!(dst.join("nested/b.png").exists());
        assert!(!dst.join(".thumbs.db").exists());
    }

    #[test]
    fn copy_replaces_a_previous_staging_run() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let dst = dst.path().join("out");
        fs::write(src.path().join("a.jpg"), b"a").unwrap();
        copy_tree(src.path(), &dst).unwrap();
        File::create(dst.join("stale.jpg")).unwrap();
        copy_tree(src.path(), &dst).unwrap();
        assert!(!dst.join("stale.jpg").exists());
    }

    #[test]
    fn resize_fits_large_images_and_drops_non_images() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        let dst = dst.path().join("out");
        image::RgbaImage::new(2000, 1000)
            .save(src.path().join("wide.png"))
            .unwrap();
        image::RgbaImage::new(400, 300)
            .save(src.path().join("small.png"))
            .unwrap();
        fs::write(src.path().join("notes.txt"), b"t").unwrap();

        let viewport = Viewport::new(1366, 768);
        let written = resize_tree(src.path(), &dst, viewport).unwrap();
        assert_eq!(written, 2);
        assert!(!dst.join("notes.txt").exists());

        let (w, h) = image::image_dimensions(dst.join("wide.png")).unwrap();
        assert!(w <= 1366 && h <= 768);
        let aspect = w as f32 / h as f32;
        assert!((aspect - 2.0).abs() < 0.02, "aspect drifted to {aspect}");

        let small = image::image_dimensions(dst.join("small.png")).unwrap();
        assert_eq!(small, (400, 300));
    }
}
