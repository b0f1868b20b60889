use std::path::PathBuf;
use thiserror::Error;

/// Errors from the manual configuration and its build hook.
#[derive(Debug, Error)]
pub enum DocsError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to walk '{root}': {source}")]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("'{path}' is outside '{root}'")]
    StripPrefix { path: PathBuf, root: PathBuf },

    #[error("Unknown manual '{0}' (expected release-notes or appnotes)")]
    UnknownManual(String),

    #[error("Failed to render manual configuration: {0}")]
    Render(String),
}

impl DocsError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
