//! Side-car point records stored next to each mesh file.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ModelError;

/// Map of object name to selected vertex indices.
pub type PointSet = BTreeMap<String, Vec<u32>>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MeshInfoData {
    #[serde(rename = "UPPER_POINTS", default)]
    upper_points: PointSet,
    #[serde(rename = "GROUND_POINTS", default)]
    ground_points: PointSet,
}

/// Editing-environment record for one mesh: the named point-index
/// collections the environment selects, stored as `<stem>_info.json` next
/// to the mesh file itself.
#[derive(Debug, Clone)]
pub struct MeshInfo {
    path: PathBuf,
    data: MeshInfoData,
}

impl MeshInfo {
    /// Load the side-car record for a mesh file, materializing an empty one
    /// on disk when it is absent or unreadable.
    pub fn load_or_create(mesh_path: &Path) -> Result<Self, ModelError> {
        let path = info_path(mesh_path);
        match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(data) => Ok(Self { path, data }),
                Err(e) => {
                    warn!("resetting unreadable mesh info {}: {}", path.display(), e);
                    Self::create_empty(path)
                }
            },
            Err(_) => Self::create_empty(path),
        }
    }

    fn create_empty(path: PathBuf) -> Result<Self, ModelError> {
        let info = Self {
            path,
            data: MeshInfoData::default(),
        };
        info.write()?;
        Ok(info)
    }

    /// Path of the side-car file itself.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn upper_points(&self) -> &PointSet {
        &self.data.upper_points
    }

    pub fn ground_points(&self) -> &PointSet {
        &self.data.ground_points
    }

    pub fn set_upper_points(&mut self, points: PointSet) {
        self.data.upper_points = points;
    }

    pub fn set_ground_points(&mut self, points: PointSet) {
        self.data.ground_points = points;
    }

    /// Persist the record.
    pub fn write(&self) -> Result<(), ModelError> {
        let content = serde_json::to_string_pretty(&self.data).map_err(|e| ModelError::Json {
            path: self.path.clone(),
            source: e,
        })?;
        fs::write(&self.path, content).map_err(|e| ModelError::Io {
            path: self.path.clone(),
            source: e,
        })
    }
}

/// `body.dae` → `body_info.json`, next to the mesh.
fn info_path(mesh_path: &Path) -> PathBuf {
    let stem = mesh_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    mesh_path.with_file_name(format!("{stem}_info.json"))
}
