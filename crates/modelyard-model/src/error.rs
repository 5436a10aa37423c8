use std::path::PathBuf;

use modelyard_sdf::SdfError;

/// Errors that can occur while opening or editing a model folder.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid model folder '{path}': missing {missing}")]
    InvalidModelFolder { path: PathBuf, missing: &'static str },

    #[error(transparent)]
    Descriptor(#[from] SdfError),

    #[error("mesh file does not exist: {path}")]
    MissingMeshFile { path: PathBuf },

    #[error("'{path}' has no <{tag}> to rewrite")]
    MissingElement { path: PathBuf, tag: String },

    #[error("invalid scale value '{value}'")]
    InvalidScale { value: String },

    #[error("invalid mesh info in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
