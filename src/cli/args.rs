//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Static site to WordPress theme toolkit
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert a static site into a minimal WordPress theme
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Render `template.html` files from sibling `data.json` files
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        args: RenderArgs,
    },

    /// Resize all images in a folder to the same dimensions
    Resize {
        #[command(flatten)]
        args: ResizeArgs,
    },

    /// Generate .webp copies next to images
    Webp {
        #[command(flatten)]
        args: WebpArgs,
    },
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the static site folder
    #[arg(short, long, default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub site: PathBuf,

    /// Output theme folder name inside the site folder (default: rmk-theme)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Config file path, relative to the site folder (default: pressify.toml)
    #[arg(short = 'C', long, default_value = "pressify.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Overwrite an existing theme folder without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Run the npm/npx CSS build when package.json is present
    #[arg(short = 'P', long = "css-build", action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub css_build: Option<bool>,
}

/// Render command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Folder whose subfolders hold `data.json` + `template.html`
    #[arg(short, long, default_value = "./generator", value_hint = clap::ValueHint::DirPath)]
    pub dir: PathBuf,

    /// Write `<name>.html` files here instead of printing to stdout
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub out: Option<PathBuf>,
}

/// Resize command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ResizeArgs {
    /// Input folder containing images
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Output folder for resized images
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Target width in pixels
    #[arg(short, long, required_unless_present = "no_resize")]
    pub width: Option<u32>,

    /// Target height in pixels
    #[arg(short = 'H', long, required_unless_present = "no_resize")]
    pub height: Option<u32>,

    /// Do not resize images; only convert/copy to output format
    #[arg(short, long)]
    pub no_resize: bool,

    /// Recurse into subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Force exact width/height (may change aspect ratio)
    #[arg(long)]
    pub force: bool,

    /// Convert output images to WebP format
    #[arg(long)]
    pub to_webp: bool,

    /// Quality for lossy formats
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,
}

/// Webp command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct WebpArgs {
    /// Directories to scan
    #[arg(short, long, num_args = 1.., default_values = ["NPjpgs", "vodstvo"], value_hint = clap::ValueHint::DirPath)]
    pub dirs: Vec<PathBuf>,

    /// WebP quality
    #[arg(short, long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Recurse into subfolders
    #[arg(short, long)]
    pub recursive: bool,

    /// Overwrite existing .webp files
    #[arg(short, long)]
    pub force: bool,
}

impl ResizeArgs {
    /// Target size, or `None` when only converting.
    pub fn size(&self) -> Option<(u32, u32)> {
        if self.no_resize {
            return None;
        }
        self.width.zip(self.height)
    }
}
