//! Saved browser session file.
//!
//! The contents belong to the browser layer; this module only moves the
//! bytes between disk and memory.

use std::path::Path;

use crate::error::Result;

/// Read a saved session, or `None` if there isn't one.
pub fn load_session(path: &Path) -> Result<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(blob) => Ok(Some(blob)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Overwrite the session file with `blob`.
pub fn save_session(path: &Path, blob: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, blob)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_session() {
        let dir = TempDir::new().unwrap();
        assert!(load_session(&dir.path().join("session.json")).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_is_opaque() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/session.json");
        let blob = b"\x00not-json\xff";

        save_session(&path, blob).unwrap();

        assert_eq!(load_session(&path).unwrap().as_deref(), Some(&blob[..]));
    }
}
