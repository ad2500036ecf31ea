//! Static site to WordPress theme conversion.
//!
//! # Module Structure
//!
//! ```text
//! convert/
//! ├── document.rs    # Parsed HTML tree with raw source spans
//! ├── reference.rs   # Remote/asset classification and path normalization
//! ├── locate.rs      # Document references → existing files
//! ├── relocate.rs    # Files → <theme>/assets/ + PathMapping
//! ├── rewrite.rs     # src/href rewriting inside fragments
//! ├── fragment.rs    # head/header/main/footer decomposition
//! ├── emit.rs        # style.css, functions.php, header/footer/index.php
//! └── error.rs       # ConvertError
//! ```
//!
//! Data flows one way: parse → locate → relocate → decompose/rewrite → emit.

mod document;
mod emit;
mod error;
mod fragment;
mod locate;
mod reference;
mod relocate;
mod rewrite;

pub use error::ConvertError;

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::PressConfig;
use crate::hooks::run_css_build;
use crate::log;
use crate::utils::plural::plural_count;
use document::Document;
use fragment::Fragments;
use locate::locate_assets;
use relocate::{ASSETS_DIR, relocate_assets};
use rewrite::clean_head;

/// Entry document every site must have.
pub const INDEX_FILE: &str = "index.html";

/// What to do when the theme directory already exists.
pub enum Overwrite<'a> {
    /// Replace it without asking.
    Always,
    /// Keep it and cancel the run.
    Never,
    /// Let the caller decide, e.g. with an interactive prompt.
    Ask(Box<dyn FnMut(&Path) -> bool + 'a>),
}

impl Overwrite<'_> {
    fn allows(&mut self, theme_dir: &Path) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Ask(confirm) => confirm(theme_dir),
        }
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeReport {
    pub theme_dir: PathBuf,
    pub assets_dir: PathBuf,
    /// Number of asset files copied.
    pub assets: usize,
    /// Number of extra `*.html` pages copied verbatim.
    pub pages: usize,
}

/// Convert `site_dir` into `<site_dir>/<config.convert.out>`.
///
/// Returns `Ok(None)` when the theme directory exists and `overwrite`
/// declined to replace it; nothing is touched in that case.
pub fn convert_site(
    site_dir: &Path,
    config: &PressConfig,
    mut overwrite: Overwrite<'_>,
) -> Result<Option<ThemeReport>, ConvertError> {
    let index = site_dir.join(INDEX_FILE);
    if !index.is_file() {
        return Err(ConvertError::MissingInput(site_dir.to_path_buf()));
    }

    let theme_dir = site_dir.join(&config.convert.out);
    if theme_dir.exists() {
        if !overwrite.allows(&theme_dir) {
            return Ok(None);
        }
        fs::remove_dir_all(&theme_dir).map_err(|e| ConvertError::io(&theme_dir, e))?;
    }

    generate_theme(site_dir, &theme_dir, config).map(Some)
}

/// Generate the theme into `theme_dir`, which is created if missing.
pub fn generate_theme(
    site_dir: &Path,
    theme_dir: &Path,
    config: &PressConfig,
) -> Result<ThemeReport, ConvertError> {
    let index = site_dir.join(INDEX_FILE);
    if !index.is_file() {
        return Err(ConvertError::MissingInput(site_dir.to_path_buf()));
    }
    let source = fs::read_to_string(&index).map_err(|e| ConvertError::io(&index, e))?;

    let assets_dir = theme_dir.join(ASSETS_DIR);
    fs::create_dir_all(&assets_dir).map_err(|e| ConvertError::io(&assets_dir, e))?;

    if config.convert.css_build {
        run_css_build(site_dir, &config.convert.out);
    }

    let doc = Document::parse(source, &index)?;
    let assets = locate_assets(&doc, site_dir);
    crate::debug!("convert"; "located {}", plural_count(assets.len(), "asset"));

    let mapping = relocate_assets(&assets, site_dir, theme_dir)?;

    let theme_name = theme_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut fragments = Fragments::extract(&doc).rewrite(&mapping);
    fragments.head = clean_head(&fragments.head, &theme_name);

    emit::write_theme(theme_dir, &config.theme, &fragments, &mapping)?;
    let pages = emit::copy_extra_pages(site_dir, theme_dir)?;

    log!("convert"; "copied {} and {}", plural_count(mapping.len(), "asset"), plural_count(pages, "extra page"));

    Ok(ThemeReport {
        theme_dir: theme_dir.to_path_buf(),
        assets_dir,
        assets: mapping.len(),
        pages,
    })
}
