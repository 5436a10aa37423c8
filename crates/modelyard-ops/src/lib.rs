//! Modelyard Ops - batch operations over model folders
//!
//! The operations a batch driver sequences: enumerate a folder of models,
//! clone a model under a new name, and snapshot or roll back a model's
//! mutable files. Enumeration tolerates broken folders; clone and restore
//! propagate their failures, since a half-written model is not something to
//! ignore silently.

mod backup;
mod clone;
mod enumerate;
mod error;

pub use backup::{backup_model, backup_path, restore_model, BACKUP_PREFIX};
pub use clone::clone_model;
pub use enumerate::list_models;
pub use error::OpsError;
