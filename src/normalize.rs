//! Mesh normalization: bake imported scale into the geometry and migrate
//! `.obj` meshes to `.dae`.

use std::f32::consts::FRAC_PI_2;
use std::path::Path;

use anyhow::{Context, Result};
use glam::Vec3;
use modelyard_model::Model;
use tracing::info;

use crate::host::EditingHost;

/// Normalize the first mesh of a model through the editing environment.
///
/// Two changes, each applied only when needed:
/// - a non-unit import scale is applied to the geometry itself and the
///   descriptor scale reset to `1 1 1`, so the mesh no longer has to be
///   imported with a scale;
/// - an `.obj` mesh is rotated +90 degrees about X, exported as a `.dae`
///   alongside the original, and the descriptor URI pointed at the `.dae`.
///
/// A model with no meshes, or whose first mesh has no file, is left alone.
pub fn normalize_model(model: &mut Model, host: &mut dyn EditingHost) -> Result<()> {
    let Some(mesh) = model.meshes().first() else {
        return Ok(());
    };
    let Some(path) = mesh.path().map(Path::to_path_buf) else {
        return Ok(());
    };
    let scale = mesh.scale();
    let extension = mesh.extension();
    let uri = mesh.uri().map(str::to_owned);

    host.clear_workspace()?;
    host.load_geometry(&path)
        .with_context(|| format!("loading geometry for {}", path.display()))?;

    if scale != Vec3::ONE {
        host.apply_scale(scale)?;
        model.update_mesh_scale(0, Vec3::ONE);
        model.write_descriptor()?;
        host.export_geometry(&path)?;
        info!("baked scale {} into {}", scale, path.display());
    }

    if extension.as_deref() == Some("obj") {
        let dae_path = path.with_extension("dae");
        host.rotate_x(FRAC_PI_2)?;
        host.export_geometry(&dae_path)?;
        if let Some(uri) = uri {
            model.update_mesh_uri(0, &swap_extension(&uri, "dae"));
            model.write_descriptor()?;
        }
        info!("converted {} to {}", path.display(), dae_path.display());
    }

    Ok(())
}

/// `model://m/meshes/body.obj` → `model://m/meshes/body.dae`.
fn swap_extension(uri: &str, extension: &str) -> String {
    match uri.rsplit_once('.') {
        Some((stem, _)) => format!("{stem}.{extension}"),
        None => format!("{uri}.{extension}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelyard_model::PointSet;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingHost {
        loaded: Vec<PathBuf>,
        exported: Vec<PathBuf>,
        scales: Vec<Vec3>,
        rotations: Vec<f32>,
    }

    impl EditingHost for RecordingHost {
        fn clear_workspace(&mut self) -> Result<()> {
            Ok(())
        }

        fn load_geometry(&mut self, path: &Path) -> Result<()> {
            self.loaded.push(path.to_path_buf());
            Ok(())
        }

        fn export_geometry(&mut self, path: &Path) -> Result<()> {
            self.exported.push(path.to_path_buf());
            Ok(())
        }

        fn apply_scale(&mut self, scale: Vec3) -> Result<()> {
            self.scales.push(scale);
            Ok(())
        }

        fn rotate_x(&mut self, radians: f32) -> Result<()> {
            self.rotations.push(radians);
            Ok(())
        }

        fn selected_points(&self) -> PointSet {
            PointSet::new()
        }
    }

    fn write_model(root: &Path, name: &str, mesh_file: &str, scale: Option<&str>) -> PathBuf {
        let folder = root.join(name);
        fs::create_dir_all(folder.join("meshes")).unwrap();
        fs::write(folder.join("meshes").join(mesh_file), "geometry").unwrap();
        fs::write(
            folder.join("model.config"),
            format!("<?xml version=\"1.0\"?>\n<model>\n  <name>{name}</name>\n</model>\n"),
        )
        .unwrap();
        let scale = match scale {
            Some(s) => format!("<scale>{s}</scale>"),
            None => String::new(),
        };
        fs::write(
            folder.join("model.sdf"),
            format!(
                "<?xml version=\"1.0\" ?>\n<sdf version=\"1.6\">\n  <model name=\"{name}\">\n    <link name=\"link\">\n      <visual><geometry><mesh><uri>model://{name}/meshes/{mesh_file}</uri>{scale}</mesh></geometry></visual>\n    </link>\n  </model>\n</sdf>\n"
            ),
        )
        .unwrap();
        folder
    }

    #[test]
    fn non_unit_scale_is_baked_into_the_geometry() {
        let dir = TempDir::new().unwrap();
        let folder = write_model(dir.path(), "tile", "body.dae", Some("2 2 2"));
        let mut model = Model::open(&folder).unwrap();
        let mut host = RecordingHost::default();

        normalize_model(&mut model, &mut host).expect("normalize");

        assert_eq!(host.scales, [Vec3::new(2.0, 2.0, 2.0)]);
        assert_eq!(host.exported.len(), 1);
        let sdf = fs::read_to_string(folder.join("model.sdf")).unwrap();
        assert!(sdf.contains("<scale>1 1 1</scale>"));
        assert!(host.rotations.is_empty());
    }

    #[test]
    fn unit_scale_dae_is_left_alone() {
        let dir = TempDir::new().unwrap();
        let folder = write_model(dir.path(), "tile", "body.dae", None);
        let before = fs::read_to_string(folder.join("model.sdf")).unwrap();
        let mut model = Model::open(&folder).unwrap();
        let mut host = RecordingHost::default();

        normalize_model(&mut model, &mut host).expect("normalize");

        assert!(host.scales.is_empty());
        assert!(host.exported.is_empty());
        assert_eq!(fs::read_to_string(folder.join("model.sdf")).unwrap(), before);
    }

    #[test]
    fn obj_mesh_is_rotated_and_repointed_at_a_dae() {
        let dir = TempDir::new().unwrap();
        let folder = write_model(dir.path(), "tile", "body.obj", None);
        let mut model = Model::open(&folder).unwrap();
        let mut host = RecordingHost::default();

        normalize_model(&mut model, &mut host).expect("normalize");

        assert_eq!(host.rotations, [FRAC_PI_2]);
        assert_eq!(host.exported.len(), 1);
        assert!(host.exported[0].ends_with("meshes/body.dae"));

        let sdf = fs::read_to_string(folder.join("model.sdf")).unwrap();
        assert!(sdf.contains("<uri>model://tile/meshes/body.dae</uri>"));
        assert!(!sdf.contains("body.obj"));
    }

    #[test]
    fn uri_extension_is_swapped() {
        assert_eq!(
            swap_extension("model://tile/meshes/body.obj", "dae"),
            "model://tile/meshes/body.dae"
        );
        assert_eq!(swap_extension("plain", "dae"), "plain.dae");
    }
}
