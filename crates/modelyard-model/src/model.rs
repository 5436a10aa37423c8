use std::collections::HashMap;
use std::path::{Path, PathBuf};

use glam::Vec3;
use modelyard_sdf::{load_tree, XmlTree};
use tracing::debug;

use crate::error::ModelError;
use crate::mesh::MeshReference;

/// Name of the metadata file every model folder must contain.
pub const METADATA_FILE: &str = "model.config";
/// Name of the descriptor file every model folder must contain.
pub const DESCRIPTOR_FILE: &str = "model.sdf";
/// Name of the subfolder holding the mesh files.
pub const MESHES_DIR: &str = "meshes";

/// One simulation model folder.
///
/// Owns the parsed descriptor and metadata trees exclusively; the mesh
/// references index into the descriptor tree, so edits made through a
/// reference reach every mention before either file is written back.
pub struct Model {
    base_folder: PathBuf,
    name: String,
    metadata: XmlTree,
    descriptor: XmlTree,
    meshes: Vec<MeshReference>,
}

impl Model {
    /// Open a model folder.
    ///
    /// The folder must contain `model.config`, `model.sdf`, and a `meshes/`
    /// subfolder; both markup files must parse (each gets the one repair
    /// attempt of [`modelyard_sdf::load_tree`]); and every mesh the
    /// descriptor references must exist on disk. Opening never writes,
    /// apart from that repair pass.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ModelError> {
        let base_folder = path.into();
        let name = base_folder
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_owned();

        validate_contents(&base_folder)?;

        let metadata = load_tree(&base_folder.join(METADATA_FILE))?;
        let descriptor = load_tree(&base_folder.join(DESCRIPTOR_FILE))?;
        let meshes = discover_meshes(&descriptor, &base_folder)?;

        debug!("opened model '{}' with {} meshes", name, meshes.len());

        Ok(Self {
            base_folder,
            name,
            metadata,
            descriptor,
            meshes,
        })
    }

    /// Absolute path of the model folder, the model's identity.
    pub fn base_folder(&self) -> &Path {
        &self.base_folder
    }

    /// Model name, derived from the folder's final path component.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the metadata file.
    pub fn metadata_path(&self) -> PathBuf {
        self.base_folder.join(METADATA_FILE)
    }

    /// Path of the descriptor file.
    pub fn descriptor_path(&self) -> PathBuf {
        self.base_folder.join(DESCRIPTOR_FILE)
    }

    /// Path of the mesh subfolder.
    pub fn meshes_folder(&self) -> PathBuf {
        self.base_folder.join(MESHES_DIR)
    }

    /// The deduplicated mesh references, in first-seen descriptor order.
    pub fn meshes(&self) -> &[MeshReference] {
        &self.meshes
    }

    /// The parsed descriptor tree.
    pub fn descriptor(&self) -> &XmlTree {
        &self.descriptor
    }

    /// The parsed metadata tree.
    pub fn metadata(&self) -> &XmlTree {
        &self.metadata
    }

    /// Serialize the descriptor tree back to `model.sdf`.
    pub fn write_descriptor(&self) -> Result<(), ModelError> {
        Ok(self.descriptor.save(&self.descriptor_path())?)
    }

    /// Serialize the metadata tree back to `model.config`.
    pub fn write_metadata(&self) -> Result<(), ModelError> {
        Ok(self.metadata.save(&self.metadata_path())?)
    }

    /// Persist both markup files, each written exactly once.
    pub fn persist(&self) -> Result<(), ModelError> {
        self.write_descriptor()?;
        self.write_metadata()
    }

    /// Rewrite the model name recorded inside the metadata and descriptor
    /// files and persist both.
    ///
    /// The in-memory name is derived from the folder and is left alone; the
    /// folder is expected to already carry the new name (clones are copied
    /// under their new name before being renamed inside).
    pub fn set_recorded_name(&mut self, new_name: &str) -> Result<(), ModelError> {
        let name_node = self
            .metadata
            .find_child(self.metadata.root(), "name")
            .ok_or_else(|| ModelError::MissingElement {
                path: self.metadata_path(),
                tag: "name".to_owned(),
            })?;
        self.metadata.set_text(name_node, new_name);
        self.write_metadata()?;

        let model_node = self
            .descriptor
            .find_child(self.descriptor.root(), "model")
            .ok_or_else(|| ModelError::MissingElement {
                path: self.descriptor_path(),
                tag: "model".to_owned(),
            })?;
        self.descriptor.set_attribute(model_node, "name", new_name);
        self.write_descriptor()
    }

    /// Update the scale of one mesh reference, writing through to every
    /// descriptor mention. The change is in memory until the descriptor is
    /// written. Panics if `index` is out of bounds.
    pub fn update_mesh_scale(&mut self, index: usize, scale: Vec3) {
        self.meshes[index].set_scale(&mut self.descriptor, scale);
    }

    /// Update the URI of one mesh reference, writing through to every
    /// descriptor mention that has one. The change is in memory until the
    /// descriptor is written. Panics if `index` is out of bounds.
    pub fn update_mesh_uri(&mut self, index: usize, uri: &str) {
        self.meshes[index].set_uri(&mut self.descriptor, uri);
    }
}

fn validate_contents(base_folder: &Path) -> Result<(), ModelError> {
    let missing = if !base_folder.join(METADATA_FILE).is_file() {
        Some(METADATA_FILE)
    } else if !base_folder.join(DESCRIPTOR_FILE).is_file() {
        Some(DESCRIPTOR_FILE)
    } else if !base_folder.join(MESHES_DIR).is_dir() {
        Some("meshes subfolder")
    } else {
        None
    };

    match missing {
        Some(missing) => Err(ModelError::InvalidModelFolder {
            path: base_folder.to_path_buf(),
            missing,
        }),
        None => Ok(()),
    }
}

/// Walk the descriptor depth-first and collect one reference per distinct
/// resolved path. A repeated path registers as a further occurrence on the
/// existing reference, so order is first-seen order.
fn discover_meshes(
    descriptor: &XmlTree,
    base_folder: &Path,
) -> Result<Vec<MeshReference>, ModelError> {
    let mut meshes: Vec<MeshReference> = Vec::new();
    let mut by_path: HashMap<Option<PathBuf>, usize> = HashMap::new();

    for node in descriptor.descendants() {
        if descriptor.tag(node) != "mesh" {
            continue;
        }
        let candidate = MeshReference::from_node(descriptor, node, base_folder)?;
        let key = candidate.path().map(Path::to_path_buf);
        match by_path.get(&key) {
            Some(&index) => meshes[index].register_occurrence(node, candidate.scale()),
            None => {
                by_path.insert(key, meshes.len());
                meshes.push(candidate);
            }
        }
    }

    Ok(meshes)
}
