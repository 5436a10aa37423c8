//! Descriptor loading with a single bounded repair pass.

use std::fs;
use std::path::Path;

use tracing::warn;

use crate::error::SdfError;
use crate::tree::XmlTree;

/// Load a descriptor file into an editable tree.
///
/// If the first parse fails, one textual repair is attempted: a blank
/// leading line (a corruption pattern left behind by manual editing) is
/// stripped and the file rewritten in place, then the parse is retried
/// exactly once. Anything else surfaces as [`SdfError::Malformed`] rather
/// than being silently mutated.
pub fn load_tree(path: &Path) -> Result<XmlTree, SdfError> {
    let content = read(path)?;
    match XmlTree::parse(&content) {
        Ok(tree) => Ok(tree),
        Err(first) => {
            if !strip_leading_blank_line(path, &content)? {
                return Err(malformed(path, first));
            }
            warn!("repaired leading blank line in {}", path.display());
            let repaired = read(path)?;
            XmlTree::parse(&repaired).map_err(|e| malformed(path, e))
        }
    }
}

/// Delete the file's first line if it is blank, rewriting the file in
/// place. Returns whether a rewrite happened.
fn strip_leading_blank_line(path: &Path, content: &str) -> Result<bool, SdfError> {
    let Some((first, rest)) = content.split_once('\n') else {
        return Ok(false);
    };
    if !first.trim().is_empty() {
        return Ok(false);
    }
    fs::write(path, rest).map_err(|e| SdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(true)
}

fn read(path: &Path) -> Result<String, SdfError> {
    fs::read_to_string(path).map_err(|e| SdfError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn malformed(path: &Path, error: quick_xml::Error) -> SdfError {
    SdfError::Malformed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DOC: &str = "<?xml version=\"1.0\" ?>\n<sdf version=\"1.6\">\n  <model name=\"tile\"/>\n</sdf>\n";

    #[test]
    fn loads_a_well_formed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.sdf");
        fs::write(&path, DOC).unwrap();

        let tree = load_tree(&path).expect("load");
        assert_eq!(tree.tag(tree.root()), "sdf");
    }

    #[test]
    fn repairs_a_leading_blank_line_and_rewrites_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.sdf");
        fs::write(&path, format!("\n{DOC}")).unwrap();

        let tree = load_tree(&path).expect("load after repair");
        assert_eq!(tree.tag(tree.root()), "sdf");

        let repaired = fs::read_to_string(&path).unwrap();
        assert!(repaired.starts_with("<?xml"));
    }

    #[test]
    fn failure_after_repair_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.sdf");
        fs::write(&path, "\n<sdf><model></sdf>").unwrap();

        match load_tree(&path) {
            Err(SdfError::Malformed { .. }) => {}
            other => panic!("expected Malformed, got: {other:?}"),
        }
    }

    #[test]
    fn garbage_without_repairable_line_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.sdf");
        fs::write(&path, "not markup at all").unwrap();

        match load_tree(&path) {
            Err(SdfError::Malformed { .. }) => {}
            other => panic!("expected Malformed, got: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        match load_tree(&dir.path().join("absent.sdf")) {
            Err(SdfError::Io { .. }) => {}
            other => panic!("expected Io, got: {other:?}"),
        }
    }
}
