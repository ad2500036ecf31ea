//! Asset relocation: copy located assets into the theme (side effects).

use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};

use indexmap::IndexMap;

use super::ConvertError;
use super::locate::AssetRecord;
use super::reference::{base_name, extension};
use crate::debug;

/// Name of the asset folder inside the theme.
pub const ASSETS_DIR: &str = "assets";

/// Mapping from original site-relative path to theme-asset-relative path.
///
/// Iteration follows insertion order, which is the order assets were first
/// referenced in the document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathMapping {
    entries: IndexMap<String, String>,
}

impl PathMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, original: impl Into<String>, mapped: impl Into<String>) {
        self.entries.insert(original.into(), mapped.into());
    }

    /// Exact lookup by normalized original path.
    pub fn get(&self, original: &str) -> Option<&str> {
        self.entries.get(original).map(String::as_str)
    }

    /// First mapped value whose original path has the given base name.
    ///
    /// With duplicate base names in different folders the earliest inserted
    /// entry wins.
    pub fn find_by_base_name(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(original, _)| base_name(original) == name)
            .map(|(_, mapped)| mapped.as_str())
    }

    /// Mapped values with the given extension, in insertion order.
    pub fn mapped_with_ext<'a>(&'a self, ext: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .values()
            .filter(move |mapped| extension(mapped).as_deref() == Some(ext))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a mapping value so it is relative to the theme asset folder.
///
/// Strips a leading `/`, a leading `<theme_name>/` segment and a leading
/// `assets/` segment, in that order.
pub fn normalize_mapped(value: &str, theme_name: &str) -> String {
    let mut value = value.trim_start_matches('/');
    if !theme_name.is_empty()
        && let Some(rest) = value
            .strip_prefix(theme_name)
            .and_then(|rest| rest.strip_prefix('/'))
    {
        value = rest;
    }
    if let Some(rest) = value.strip_prefix("assets/") {
        value = rest;
    }
    value.to_string()
}

/// Copy assets into `<theme>/assets/` and build the path mapping.
///
/// Each file lands at `<theme>/assets/<mapped>`, where `<mapped>` is its
/// root-relative path after [`normalize_mapped`]. Files outside `root`,
/// including `../` references, fall back to their base name. Two sources that normalize to the same
/// destination silently overwrite each other.
pub fn relocate_assets<'a, I>(
    assets: I,
    root: &Path,
    theme_dir: &Path,
) -> Result<PathMapping, ConvertError>
where
    I: IntoIterator<Item = &'a AssetRecord>,
{
    let assets_dir = theme_dir.join(ASSETS_DIR);
    let theme_name = theme_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut mapping = PathMapping::new();
    for asset in assets {
        let rel = relative_key(&asset.path, root);
        let mapped = normalize_mapped(&rel, &theme_name);
        let dest = assets_dir.join(&mapped);

        copy_asset(&asset.path, &dest)?;
        debug!("assets"; "{} -> {}/{}", asset.key, ASSETS_DIR, mapped);

        mapping.insert(rel, mapped);
    }

    Ok(mapping)
}

/// Forward-slash path of `path` relative to `root`, or its base name.
///
/// Paths that leave `root` (not under it, or climbing out with `..`) use the
/// base name, so every copy stays inside the asset folder.
fn relative_key(path: &Path, root: &Path) -> String {
    let rel = path
        .strip_prefix(root)
        .ok()
        .filter(|rel| rel.components().all(|c| matches!(c, Component::Normal(_))))
        .map(Path::to_path_buf)
        .unwrap_or_else(|| {
            path.file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| path.to_path_buf())
        });
    rel.to_string_lossy().replace('\\', "/")
}

/// Copy one file, keeping its bytes and modification time.
///
/// Copying a file onto itself is a no-op (the CSS build may write straight
/// into the theme tree).
fn copy_asset(src: &Path, dest: &Path) -> Result<(), ConvertError> {
    let copy_error = |source| ConvertError::AssetCopy {
        path: src.to_path_buf(),
        source,
    };

    if let (Ok(a), Ok(b)) = (src.canonicalize(), dest.canonicalize())
        && a == b
    {
        return Ok(());
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(copy_error)?;
    }
    fs::copy(src, dest).map_err(copy_error)?;

    let modified = fs::metadata(src).and_then(|m| m.modified()).map_err(copy_error)?;
    File::options()
        .write(true)
        .open(dest)
        .and_then(|file| file.set_modified(modified))
        .map_err(copy_error)?;

    Ok(())
}
