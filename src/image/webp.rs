//! `.webp` copies next to existing raster images.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::DynamicImage;
use image::codecs::webp::WebPEncoder;

use super::scan::find_images;
use crate::log;

/// Sources the `webp` tool converts.
pub const WEBP_SOURCE_EXTS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tiff", "gif"];

/// Counters for one `webp` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebpSummary {
    pub scanned: usize,
    pub created: usize,
    pub failed: usize,
}

/// Encode `img` as WebP into `dest`. Alpha is kept when present, anything
/// else is stored as RGB.
pub fn encode_webp(img: &DynamicImage, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(
        File::create(dest).with_context(|| format!("cannot create {}", dest.display()))?,
    );
    let encoder = WebPEncoder::new_lossless(writer);

    if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8()).write_with_encoder(encoder)?;
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8()).write_with_encoder(encoder)?;
    }
    Ok(())
}

/// Convert one image file to `dest`.
pub fn make_webp(src: &Path, dest: &Path) -> Result<()> {
    let img = image::open(src).with_context(|| format!("cannot open {}", src.display()))?;
    encode_webp(&img, dest)
}

/// `<stem>.webp` beside `src`.
pub fn webp_path(src: &Path) -> PathBuf {
    src.with_extension("webp")
}

/// Write a `.webp` next to every image in `dirs`.
///
/// Existing `.webp` files are kept unless `force`. Missing folders are
/// skipped with a warning; per-file failures are logged and counted.
pub fn generate_webp(dirs: &[PathBuf], recursive: bool, force: bool) -> WebpSummary {
    let mut summary = WebpSummary::default();

    for dir in dirs {
        if !dir.is_dir() {
            log!("warning"; "skipping missing folder: {}", dir.display());
            continue;
        }

        let files = find_images(dir, recursive, WEBP_SOURCE_EXTS);
        log!("webp"; "scanning {}, found {} image(s)", dir.display(), files.len());

        for src in files {
            summary.scanned += 1;
            let dest = webp_path(&src);
            if dest.exists() && !force {
                continue;
            }
            match make_webp(&src, &dest) {
                Ok(()) => {
                    summary.created += 1;
                    log!("webp"; "created {}", dest.display());
                }
                Err(e) => {
                    summary.failed += 1;
                    log!("error"; "failed to create {}: {e:#}", dest.display());
                }
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::TempDir;

    fn rgb_png(path: &Path) {
        RgbImage::from_pixel(4, 3, Rgb([10, 20, 30])).save(path).unwrap();
    }

    #[test]
    fn test_creates_webp_and_skips_existing() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        rgb_png(&root.join("a.png"));
        rgb_png(&root.join("b.png"));
        fs::write(root.join("b.webp"), "keep").unwrap();

        let summary = generate_webp(&[root.clone()], false, false);
        assert_eq!(
            summary,
            WebpSummary {
                scanned: 2,
                created: 1,
                failed: 0
            }
        );
        assert_eq!(fs::read_to_string(root.join("b.webp")).unwrap(), "keep");

        let img = image::open(root.join("a.webp")).unwrap();
        assert_eq!((img.width(), img.height()), (4, 3));
        assert_eq!(
            ImageFormat::from_path(root.join("a.webp")).unwrap(),
            ImageFormat::WebP
        );
    }

    #[test]
    fn test_force_overwrites() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        rgb_png(&root.join("a.png"));
        fs::write(root.join("a.webp"), "stale").unwrap();

        let summary = generate_webp(&[root.clone()], false, true);
        assert_eq!(summary.created, 1);
        assert!(image::open(root.join("a.webp")).is_ok());
    }

    #[test]
    fn test_alpha_kept() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("t.png");
        RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])).save(&src).unwrap();

        make_webp(&src, &webp_path(&src)).unwrap();
        let img = image::open(dir.path().join("t.webp")).unwrap();
        assert!(img.color().has_alpha());
    }

    #[test]
    fn test_missing_dir_and_broken_file() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_path_buf();
        fs::write(root.join("broken.jpg"), "not an image").unwrap();

        let summary = generate_webp(&[root.join("nope"), root.clone()], false, false);
        assert_eq!(
            summary,
            WebpSummary {
                scanned: 1,
                created: 0,
                failed: 1
            }
        );
    }
}
