use std::path::{Path, PathBuf};

use modelyard_model::ModelError;

/// Errors that can occur during batch operations on model folders.
#[derive(Debug, thiserror::Error)]
pub enum OpsError {
    #[error("cannot clone '{name}' onto itself; pick a new name or a destination folder")]
    InvalidClone { name: String },

    #[error("no backup available for '{path}'")]
    NoBackupAvailable { path: PathBuf },

    #[error("not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    #[error("model folder '{path}' has no parent to clone into")]
    NoParentFolder { path: PathBuf },

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> OpsError {
    OpsError::Io {
        path: path.to_path_buf(),
        source,
    }
}
