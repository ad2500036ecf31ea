//! Template rendering error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while rendering one generator unit.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("IO error at `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in `{}`", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// `data.json` neither requests a full render nor carries an `objs` array.
    #[error("`{unit}`: data.json has no `objs` array and no `\"render\": \"full\"`")]
    MissingObjs { unit: String },

    #[error("`{unit}`: template error")]
    Template {
        unit: String,
        #[source]
        source: minijinja::Error,
    },
}
