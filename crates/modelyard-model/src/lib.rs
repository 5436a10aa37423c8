//! Modelyard Model - simulation model folders and their mesh references
//!
//! A model is a folder holding a descriptor (`model.sdf`), a metadata file
//! (`model.config`), and a `meshes/` subfolder. This crate validates that
//! layout, owns the parsed descriptor and metadata trees, discovers the
//! mesh references inside the descriptor (collapsing repeated mentions of
//! the same file into one reference), and keeps every textual mention in
//! sync when a reference is edited.

mod error;
mod info;
mod mesh;
mod model;

pub use error::ModelError;
pub use info::{MeshInfo, PointSet};
pub use mesh::MeshReference;
pub use model::{Model, DESCRIPTOR_FILE, MESHES_DIR, METADATA_FILE};
