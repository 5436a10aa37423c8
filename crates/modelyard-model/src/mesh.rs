use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use glam::Vec3;
use modelyard_sdf::{NodeId, XmlTree};

use crate::error::ModelError;

/// One physical mesh file referenced by a model descriptor.
///
/// A single file can be mentioned at several places in the descriptor
/// (visual and collision geometry, typically); all of those mentions share
/// one `MeshReference`, so an edit reaches every mention. Two candidates
/// are the same mesh exactly when they resolve to the same path.
#[derive(Debug, Clone)]
pub struct MeshReference {
    uri: Option<String>,
    scale: Vec3,
    path: Option<PathBuf>,
    occurrences: Vec<NodeId>,
}

impl MeshReference {
    /// Build a reference from one `<mesh>` node of the descriptor.
    ///
    /// A node without a `<uri>` yields a reference with no resolvable path.
    /// A URI pointing at a file that is not present under `meshes/` is an
    /// error; a dangling reference invalidates the whole model.
    pub(crate) fn from_node(
        tree: &XmlTree,
        node: NodeId,
        base_folder: &Path,
    ) -> Result<Self, ModelError> {
        let uri = tree
            .find_child(node, "uri")
            .and_then(|n| tree.text(n))
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());

        let scale = match tree.find_child(node, "scale").and_then(|n| tree.text(n)) {
            Some(raw) => parse_scale(raw)?,
            None => Vec3::ONE,
        };

        let path = match &uri {
            Some(uri) => {
                let file_name = uri.rsplit('/').next().unwrap_or(uri.as_str());
                let path = base_folder.join(crate::model::MESHES_DIR).join(file_name);
                if !path.exists() {
                    return Err(ModelError::MissingMeshFile { path });
                }
                Some(path)
            }
            None => None,
        };

        Ok(Self {
            uri,
            scale,
            path,
            occurrences: vec![node],
        })
    }

    /// Logical reference string, `model://<model_name>/<relative_path>`.
    pub fn uri(&self) -> Option<&str> {
        self.uri.as_deref()
    }

    /// Import scale of the mesh, `Vec3::ONE` when the descriptor does not
    /// specify one. When occurrences disagree, the first non-default scale
    /// wins.
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Resolved on-disk path of the mesh file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// File name of the resolved mesh file.
    pub fn file_name(&self) -> Option<&str> {
        self.path.as_deref().and_then(Path::file_name).and_then(OsStr::to_str)
    }

    /// Lower-cased extension of the resolved mesh file.
    pub fn extension(&self) -> Option<String> {
        self.path
            .as_deref()
            .and_then(Path::extension)
            .and_then(OsStr::to_str)
            .map(str::to_lowercase)
    }

    /// How many descriptor nodes mention this mesh.
    pub fn occurrence_count(&self) -> usize {
        self.occurrences.len()
    }

    /// Record a further descriptor mention of the same file.
    pub(crate) fn register_occurrence(&mut self, node: NodeId, scale: Vec3) {
        // First non-default scale wins across occurrences.
        if self.scale == Vec3::ONE {
            self.scale = scale;
        }
        self.occurrences.push(node);
    }

    /// Write a new scale through every descriptor mention of this mesh.
    /// Mentions without a `<scale>` element get one.
    pub fn set_scale(&mut self, tree: &mut XmlTree, scale: Vec3) {
        for &node in &self.occurrences {
            let scale_node = tree
                .find_child(node, "scale")
                .unwrap_or_else(|| tree.add_child(node, "scale"));
            tree.set_text(scale_node, format_scale(scale));
        }
        self.scale = scale;
    }

    /// Write a new URI through every descriptor mention of this mesh.
    /// Mentions without a `<uri>` element are left alone; there is nothing
    /// to rewrite.
    pub fn set_uri(&mut self, tree: &mut XmlTree, uri: &str) {
        for &node in &self.occurrences {
            if let Some(uri_node) = tree.find_child(node, "uri") {
                tree.set_text(uri_node, uri);
            }
        }
        self.uri = Some(uri.to_owned());
    }
}

fn parse_scale(raw: &str) -> Result<Vec3, ModelError> {
    let components: Vec<f32> = raw
        .split_whitespace()
        .map(str::parse)
        .collect::<Result<_, _>>()
        .map_err(|_| ModelError::InvalidScale {
            value: raw.to_owned(),
        })?;
    match components.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(ModelError::InvalidScale {
            value: raw.to_owned(),
        }),
    }
}

fn format_scale(scale: Vec3) -> String {
    format!("{} {} {}", scale.x, scale.y, scale.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_component_scales() {
        assert_eq!(parse_scale("1 1 1").unwrap(), Vec3::ONE);
        assert_eq!(parse_scale("0.5 2 3").unwrap(), Vec3::new(0.5, 2.0, 3.0));
    }

    #[test]
    fn rejects_malformed_scales() {
        assert!(matches!(parse_scale("1 2"), Err(ModelError::InvalidScale { .. })));
        assert!(matches!(parse_scale("a b c"), Err(ModelError::InvalidScale { .. })));
        assert!(matches!(parse_scale("1 2 3 4"), Err(ModelError::InvalidScale { .. })));
    }

    #[test]
    fn formats_scales_the_way_descriptors_expect() {
        assert_eq!(format_scale(Vec3::ONE), "1 1 1");
        assert_eq!(format_scale(Vec3::new(0.5, 2.0, 3.0)), "0.5 2 3");
    }
}
