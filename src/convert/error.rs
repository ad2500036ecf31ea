//! Conversion error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a theme conversion.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The site directory has no `index.html`.
    #[error("index.html not found in `{}`", .0.display())]
    MissingInput(PathBuf),

    /// Copying a located asset into the theme failed.
    #[error("failed to copy asset `{}`", path.display())]
    AssetCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse `{}`: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    pub(super) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
