//! Clone a model folder under a new name, rewriting its identity.

use std::fs;
use std::path::Path;

use modelyard_model::Model;
use tracing::info;

use crate::error::{io_error, OpsError};

/// Copy `model`'s folder to a new location and name, then rewrite every
/// name- and URI-bearing field so the copy is a self-consistent,
/// independently named model. The source model is untouched.
///
/// With no `destination` the clone lands next to the source, and cloning
/// onto the source's own name is rejected before anything is written. An
/// existing folder at the target path is removed first: the last clone
/// wins, no merging.
pub fn clone_model(
    model: &Model,
    new_name: &str,
    destination: Option<&Path>,
) -> Result<Model, OpsError> {
    if destination.is_none() && new_name == model.name() {
        return Err(OpsError::InvalidClone {
            name: new_name.to_owned(),
        });
    }

    let target = match destination {
        Some(destination) => {
            fs::create_dir_all(destination).map_err(|e| io_error(destination, e))?;
            destination.join(new_name)
        }
        None => {
            let parent = model.base_folder().parent().ok_or_else(|| {
                OpsError::NoParentFolder {
                    path: model.base_folder().to_path_buf(),
                }
            })?;
            parent.join(new_name)
        }
    };

    if target.is_dir() {
        fs::remove_dir_all(&target).map_err(|e| io_error(&target, e))?;
    } else if target.exists() {
        fs::remove_file(&target).map_err(|e| io_error(&target, e))?;
    }

    copy_dir_all(model.base_folder(), &target).map_err(|e| io_error(&target, e))?;

    // The copy is re-opened fresh so the source's in-memory trees are never
    // shared with the clone.
    let mut clone = Model::open(&target)?;
    clone.set_recorded_name(new_name)?;

    for index in 0..clone.meshes().len() {
        let Some(uri) = clone.meshes()[index].uri().map(str::to_owned) else {
            continue;
        };
        let rewritten = rewrite_uri_model_name(&uri, new_name);
        clone.update_mesh_uri(index, &rewritten);
    }
    clone.write_descriptor()?;

    info!("cloned '{}' to {}", model.name(), target.display());
    Ok(clone)
}

/// Replace the model-name segment of a `model://` URI, leaving the
/// relative tail untouched.
fn rewrite_uri_model_name(uri: &str, new_name: &str) -> String {
    let rest = uri.strip_prefix("model://").unwrap_or(uri);
    match rest.split_once('/') {
        Some((_, tail)) => format!("model://{new_name}/{tail}"),
        None => format!("model://{new_name}"),
    }
}

fn copy_dir_all(source: &Path, target: &Path) -> std::io::Result<()> {
    fs::create_dir_all(target)?;
    for entry in fs::read_dir(source)? {
        let entry = entry?;
        let to = target.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &to)?;
        } else {
            fs::copy(entry.path(), &to)?;
        }
    }
    Ok(())
}
