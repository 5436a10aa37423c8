use std::path::PathBuf;

/// Errors that can occur while loading or saving a descriptor tree.
#[derive(Debug, thiserror::Error)]
pub enum SdfError {
    #[error("malformed descriptor '{path}': {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize descriptor for '{path}': {reason}")]
    Write { path: PathBuf, reason: String },
}
