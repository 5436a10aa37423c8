//! Enumeration of a folder of model folders.

use std::fs;
use std::path::Path;

use modelyard_model::Model;
use tracing::{info, warn};

use crate::error::{io_error, OpsError};

/// Open every model folder directly under `folder`, in name order.
///
/// Entries that do not form a valid model are skipped and logged rather
/// than aborting the batch; the skip count is reported once at the end.
/// Enumeration is read-only and safe to repeat.
pub fn list_models(folder: &Path) -> Result<Vec<Model>, OpsError> {
    if !folder.is_dir() {
        return Err(OpsError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }

    let mut entries: Vec<_> = fs::read_dir(folder)
        .map_err(|e| io_error(folder, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| io_error(folder, e))?;
    entries.sort_by_key(|entry| entry.file_name());

    let total = entries.len();
    let mut models = Vec::new();
    for entry in entries {
        let path = entry.path();
        match Model::open(&path) {
            Ok(model) => models.push(model),
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }

    if models.len() < total {
        info!(
            "loaded {} models from {} ({} entries skipped)",
            models.len(),
            folder.display(),
            total - models.len()
        );
    }
    Ok(models)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_model(root: &Path, name: &str) -> PathBuf {
        let folder = root.join(name);
        fs::create_dir_all(folder.join("meshes")).unwrap();
        fs::write(folder.join("meshes/body.dae"), "<COLLADA/>").unwrap();
        fs::write(
            folder.join("model.config"),
            format!("<?xml version=\"1.0\"?>\n<model>\n  <name>{name}</name>\n</model>\n"),
        )
        .unwrap();
        fs::write(
            folder.join("model.sdf"),
            format!(
                "<?xml version=\"1.0\" ?>\n<sdf version=\"1.6\">\n  <model name=\"{name}\">\n    <link name=\"link\">\n      <visual><geometry><mesh><uri>model://{name}/meshes/body.dae</uri></mesh></geometry></visual>\n    </link>\n  </model>\n</sdf>\n"
            ),
        )
        .unwrap();
        folder
    }

    #[test]
    fn lists_models_in_name_order_and_skips_broken_entries() {
        let dir = TempDir::new().unwrap();
        write_model(dir.path(), "beta_tile");
        write_model(dir.path(), "alpha_tile");
        fs::create_dir_all(dir.path().join("not_a_model")).unwrap();
        fs::write(dir.path().join("stray.txt"), "junk").unwrap();

        let models = list_models(dir.path()).expect("list");
        let names: Vec<_> = models.iter().map(|m| m.name().to_owned()).collect();
        assert_eq!(names, ["alpha_tile", "beta_tile"]);
    }

    #[test]
    fn a_plain_file_is_not_a_models_folder() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "junk").unwrap();

        assert!(matches!(
            list_models(&file),
            Err(OpsError::NotADirectory { .. })
        ));
    }

    #[test]
    fn an_empty_folder_lists_no_models() {
        let dir = TempDir::new().unwrap();
        assert!(list_models(dir.path()).expect("list").is_empty());
    }
}
