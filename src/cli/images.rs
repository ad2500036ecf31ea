//! `resize` and `webp` commands.

use anyhow::Result;
use std::process::ExitCode;

use super::{ResizeArgs, WebpArgs};
use crate::image::{
    resize::{ResizeOptions, resize_folder},
    webp::generate_webp,
};
use crate::log;

/// Exit status for a missing input folder.
const BAD_INPUT: u8 = 2;

/// Resize a folder of images.
pub fn run_resize(args: &ResizeArgs) -> Result<ExitCode> {
    if !args.input.is_dir() {
        log!("error"; "input folder does not exist or is not a directory: {}", args.input.display());
        return Ok(ExitCode::from(BAD_INPUT));
    }

    let opts = ResizeOptions {
        size: args.size(),
        force: args.force,
        to_webp: args.to_webp,
        quality: args.quality,
    };
    if opts.to_webp && args.quality != 85 {
        log!("warning"; "webp output is lossless, --quality only applies to jpeg");
    }

    let summary = resize_folder(&args.input, &args.output, args.recursive, &opts);
    if summary.found > 0 {
        log!("done"; "{} written, {} failed", summary.written, summary.failed);
    }
    Ok(ExitCode::SUCCESS)
}

/// Write `.webp` copies next to the images in each folder.
pub fn run_webp(args: &WebpArgs) -> Result<()> {
    if args.quality != 85 {
        log!("warning"; "webp output is lossless, --quality is ignored");
    }

    let summary = generate_webp(&args.dirs, args.recursive, args.force);
    log!("done"; "scanned {} images, created {} webp(s)", summary.scanned, summary.created);
    if summary.failed > 0 {
        log!("warning"; "{} image(s) could not be converted", summary.failed);
    }
    Ok(())
}
