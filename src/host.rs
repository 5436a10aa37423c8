//! Capability interface to the interactive editing environment.

use std::path::Path;

use anyhow::Result;
use glam::Vec3;
use modelyard_model::PointSet;

/// The narrow surface the core needs from the interactive 3D-editing
/// environment. The environment owns geometry; modelyard owns the files and
/// the descriptor bookkeeping around them.
///
/// Implementations wrap whatever editor is actually driving the session;
/// tests use an in-memory recorder.
pub trait EditingHost {
    /// Remove everything currently loaded in the editor.
    fn clear_workspace(&mut self) -> Result<()>;

    /// Load a mesh file's geometry into the editor.
    fn load_geometry(&mut self, path: &Path) -> Result<()>;

    /// Export the geometry currently in the editor to `path`, inferring the
    /// format from the extension.
    fn export_geometry(&mut self, path: &Path) -> Result<()>;

    /// Scale the loaded geometry in place.
    fn apply_scale(&mut self, scale: Vec3) -> Result<()>;

    /// Rotate the loaded geometry about the X axis.
    fn rotate_x(&mut self, radians: f32) -> Result<()>;

    /// The editor's current selection, as object name to vertex indices.
    fn selected_points(&self) -> PointSet;
}
