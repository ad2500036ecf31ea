use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

/// Lowercase extension of `path`, if any.
fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
}

/// Whether `path` has one of `exts` (lowercase, no dot), ignoring case.
pub fn has_extension(path: &Path, exts: &[&str]) -> bool {
    extension(path).is_some_and(|ext| exts.contains(&ext.as_str()))
}

/// Image files under `folder` matching `exts`, in sorted path order.
///
/// Only direct children unless `recursive`. Hidden files are included.
pub fn find_images(folder: &Path, recursive: bool, exts: &[&str]) -> Vec<PathBuf> {
    let depth = if recursive { usize::MAX } else { 1 };
    let mut files: Vec<_> = WalkDir::new(folder)
        .skip_hidden(false)
        .max_depth(depth)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|path| has_extension(path, exts))
        .collect();
    files.sort();
    files
}
