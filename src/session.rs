//! Explicit editing-session context.
//!
//! The editing workflows hand a "current model" from one step to the next:
//! load a model into the editor, select points, record them, export the
//! edited geometry. An [`EditSession`] carries that state as a plain value
//! with an explicit lifecycle, rather than anything ambient.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use modelyard_model::{MeshInfo, Model, PointSet};
use modelyard_ops::list_models;
use tracing::info;

use crate::host::EditingHost;

/// Cursor over a folder of models, tracking which model is currently loaded
/// in the editing environment.
pub struct EditSession {
    models_folder: PathBuf,
    cursor: usize,
    current: Option<Model>,
}

impl EditSession {
    /// Start a session over a folder of models. Nothing is read until the
    /// first model is loaded.
    pub fn new(models_folder: impl Into<PathBuf>) -> Self {
        Self {
            models_folder: models_folder.into(),
            cursor: 0,
            current: None,
        }
    }

    /// The folder this session cycles over.
    pub fn models_folder(&self) -> &Path {
        &self.models_folder
    }

    /// The model currently loaded in the editor, if any.
    pub fn current(&self) -> Option<&Model> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Model> {
        self.current.as_mut()
    }

    /// Load the next model in the folder into the editing environment,
    /// wrapping around at the end of the folder.
    pub fn load_next_model(&mut self, host: &mut dyn EditingHost) -> Result<()> {
        let mut models = list_models(&self.models_folder)?;
        anyhow::ensure!(
            !models.is_empty(),
            "no models in {}",
            self.models_folder.display()
        );

        if self.cursor >= models.len() {
            self.cursor = 0;
        }
        let model = models.swap_remove(self.cursor);
        info!("loading model {} ({})", self.cursor, model.name());

        host.clear_workspace()?;
        for mesh in model.meshes() {
            if let Some(path) = mesh.path() {
                host.load_geometry(path)
                    .with_context(|| format!("loading geometry for {}", path.display()))?;
            }
        }

        self.cursor += 1;
        self.current = Some(model);
        Ok(())
    }

    /// Record the editor's selected points as every mesh's "upper" set.
    pub fn record_upper_points(&self, host: &dyn EditingHost) -> Result<()> {
        self.record_points(host, MeshInfo::set_upper_points)
    }

    /// Record the editor's selected points as every mesh's "ground" set.
    pub fn record_ground_points(&self, host: &dyn EditingHost) -> Result<()> {
        self.record_points(host, MeshInfo::set_ground_points)
    }

    fn record_points(
        &self,
        host: &dyn EditingHost,
        store: impl Fn(&mut MeshInfo, PointSet),
    ) -> Result<()> {
        let model = self
            .current
            .as_ref()
            .context("no model loaded in this session")?;
        let points = host.selected_points();
        for mesh in model.meshes() {
            let Some(path) = mesh.path() else { continue };
            let mut info = MeshInfo::load_or_create(path)?;
            store(&mut info, points.clone());
            info.write()?;
        }
        Ok(())
    }

    /// Export the editor's current geometry back over the first mesh file
    /// of the loaded model.
    pub fn save_current_changes(&self, host: &mut dyn EditingHost) -> Result<()> {
        let model = self
            .current
            .as_ref()
            .context("no model loaded in this session")?;
        let mesh = model.meshes().first().context("loaded model has no meshes")?;
        let path = mesh.path().context("loaded model's first mesh has no file")?;
        host.export_geometry(path)
    }
}
