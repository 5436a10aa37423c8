//! Modelyard SDF - editable descriptor markup trees
//!
//! Parses a model descriptor (`model.sdf`-style XML) into an arena-backed
//! tree that can be searched, edited in place, and written back out. Loading
//! includes a single bounded repair pass for the one corruption pattern that
//! shows up in practice: a stray blank line before the XML declaration.

mod error;
mod loader;
mod tree;

pub use error::SdfError;
pub use loader::load_tree;
pub use tree::{NodeId, XmlTree};
