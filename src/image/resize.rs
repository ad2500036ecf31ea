//! Folder-to-folder resize with optional WebP conversion.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};

use super::scan::find_images;
use super::webp::encode_webp;
use crate::log;

/// Sources the `resize` tool accepts.
pub const RESIZE_SOURCE_EXTS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tiff", "webp"];

/// How each image is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeOptions {
    /// Target box; `None` converts or copies without resizing.
    pub size: Option<(u32, u32)>,
    /// Resize to exactly `size` instead of fitting inside it.
    pub force: bool,
    pub to_webp: bool,
    /// JPEG quality, 1-100.
    pub quality: u8,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            size: None,
            force: false,
            to_webp: false,
            quality: 85,
        }
    }
}

/// Counters for one `resize` run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResizeSummary {
    pub found: usize,
    pub written: usize,
    pub failed: usize,
}

/// Destination for `src`: its path relative to `input` under `output`,
/// with a `.webp` extension when converting.
pub fn output_path(src: &Path, input: &Path, output: &Path, to_webp: bool) -> PathBuf {
    let rel = src
        .strip_prefix(input)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| src.file_name().map(PathBuf::from).unwrap_or_default());
    let dest = output.join(rel);
    if to_webp {
        dest.with_extension("webp")
    } else {
        dest
    }
}

/// Apply the size policy: exact with `force`, otherwise fit inside the box
/// keeping the aspect ratio and never upscaling.
pub fn apply_size(img: DynamicImage, size: Option<(u32, u32)>, force: bool) -> DynamicImage {
    let Some((width, height)) = size else {
        return img;
    };
    if force {
        return img.resize_exact(width, height, FilterType::Lanczos3);
    }
    if img.width() <= width && img.height() <= height {
        return img;
    }
    img.resize(width, height, FilterType::Lanczos3)
}

/// Composite any alpha onto a white background.
fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    if !img.color().has_alpha() {
        return img.to_rgb8();
    }
    let rgba = img.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| {
            let (c, a) = (u32::from(c), u32::from(a));
            ((c * a + 255 * (255 - a) + 127) / 255) as u8
        };
        image::Rgb([blend(r), blend(g), blend(b)])
    })
}

/// Resize one file from `src` into `dest`.
pub fn resize_image(src: &Path, dest: &Path, opts: &ResizeOptions) -> Result<()> {
    let img = image::open(src).with_context(|| format!("cannot open {}", src.display()))?;
    let img = apply_size(img, opts.size, opts.force);
    save(&img, dest, opts)
}

fn save(img: &DynamicImage, dest: &Path, opts: &ResizeOptions) -> Result<()> {
    if opts.to_webp {
        return encode_webp(img, dest);
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }

    let format = ImageFormat::from_path(dest)
        .with_context(|| format!("unknown output format for {}", dest.display()))?;
    if format == ImageFormat::Jpeg {
        let writer = BufWriter::new(
            File::create(dest).with_context(|| format!("cannot create {}", dest.display()))?,
        );
        JpegEncoder::new_with_quality(writer, opts.quality).encode_image(&flatten_on_white(img))?;
        return Ok(());
    }
    if format == ImageFormat::WebP {
        return encode_webp(img, dest);
    }

    img.save_with_format(dest, format)?;
    Ok(())
}

/// Resize every image in `input` into `output`, mirroring relative paths.
///
/// Per-file failures are logged and counted; the batch continues.
pub fn resize_folder(
    input: &Path,
    output: &Path,
    recursive: bool,
    opts: &ResizeOptions,
) -> ResizeSummary {
    let files = find_images(input, recursive, RESIZE_SOURCE_EXTS);
    let mut summary = ResizeSummary {
        found: files.len(),
        ..Default::default()
    };
    if files.is_empty() {
        log!("resize"; "no image files found in {}", input.display());
        return summary;
    }

    match opts.size {
        Some((w, h)) => log!("resize"; "found {} image(s), resizing to {w}x{h} (force={})", files.len(), opts.force),
        None => log!("resize"; "found {} image(s), converting without resize", files.len()),
    }

    for src in files {
        let dest = output_path(&src, input, output, opts.to_webp);
        match resize_image(&src, &dest, opts) {
            Ok(()) => {
                summary.written += 1;
                log!("resize"; "{} -> {}", src.display(), dest.display());
            }
            Err(e) => {
                summary.failed += 1;
                log!("error"; "processing {}: {e:#}", src.display());
            }
        }
    }

    summary
}
