//! Modelyard - folder-based simulation model asset management
//!
//! A model is a folder: a `model.sdf` descriptor referencing mesh files, a
//! `model.config` metadata file, and a `meshes/` subfolder. Modelyard keeps
//! those three artifacts consistent through cloning, renaming, scale and
//! URI edits, and one-generation backup/restore, and hands mesh geometry to
//! an interactive editing environment through the narrow [`EditingHost`]
//! capability trait.

pub mod config;
pub mod host;
pub mod normalize;
pub mod session;

pub use config::YardConfig;
pub use host::EditingHost;
pub use normalize::normalize_model;
pub use session::EditSession;

pub use modelyard_model::{MeshInfo, MeshReference, Model, ModelError, PointSet};
pub use modelyard_ops::{
    backup_model, backup_path, clone_model, list_models, restore_model, OpsError, BACKUP_PREFIX,
};
pub use modelyard_sdf::{load_tree, NodeId, SdfError, XmlTree};
