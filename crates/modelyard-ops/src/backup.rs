//! One-generation backup and restore of a model's mutable files.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use modelyard_model::Model;
use tracing::info;

use crate::error::{io_error, OpsError};

/// Prefix that marks a file as the backup sibling of its live counterpart.
pub const BACKUP_PREFIX: &str = "__bkp__";

/// The fixed backup sibling of `path`, in the same directory.
pub fn backup_path(path: &Path) -> PathBuf {
    let file_name = path.file_name().and_then(OsStr::to_str).unwrap_or_default();
    path.with_file_name(format!("{BACKUP_PREFIX}{file_name}"))
}

/// Snapshot the descriptor and every mesh file of `model`, overwriting any
/// previous backup. One generation only; there is no backup chaining.
pub fn backup_model(model: &Model) -> Result<(), OpsError> {
    snapshot(&model.descriptor_path())?;
    for mesh in model.meshes() {
        if let Some(path) = mesh.path() {
            snapshot(path)?;
        }
    }
    info!("backed up '{}'", model.name());
    Ok(())
}

/// Copy each backup over its live counterpart.
///
/// A file with no backup fails with [`OpsError::NoBackupAvailable`] and
/// leaves its live counterpart unchanged. Restoration is all-or-nothing
/// per file, not atomic across the whole model; batch callers are expected
/// to catch and log per-model failures.
pub fn restore_model(model: &Model) -> Result<(), OpsError> {
    restore_file(&model.descriptor_path())?;
    for mesh in model.meshes() {
        if let Some(path) = mesh.path() {
            restore_file(path)?;
        }
    }
    info!("restored '{}' from backup", model.name());
    Ok(())
}

fn snapshot(live: &Path) -> Result<(), OpsError> {
    fs::copy(live, backup_path(live)).map_err(|e| io_error(live, e))?;
    Ok(())
}

fn restore_file(live: &Path) -> Result<(), OpsError> {
    // The existence check runs against the fully resolved backup path, in
    // the same directory as the live file.
    let backup = backup_path(live);
    if !backup.exists() {
        return Err(OpsError::NoBackupAvailable {
            path: live.to_path_buf(),
        });
    }
    fs::copy(&backup, live).map_err(|e| io_error(live, e))?;
    Ok(())
}
