//! Atomic document saves via tempfile + rename.
//!
//! The new content goes into a [`tempfile::NamedTempFile`] next to the
//! target and is then persisted over it, so a crash mid-save never leaves a
//! half-written document behind.

use std::io::Write;
use std::path::Path;

use crate::error::{DocError, DocResult};

/// Atomically replace the file at `path` with `content`.
pub fn atomic_write(path: &Path, content: &str) -> DocResult<()> {
    let io_error = |source| DocError::Io {
        path: path.to_path_buf(),
        source,
    };

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(io_error)?;
    tmp.write_all(content.as_bytes()).map_err(io_error)?;
    tmp.flush().map_err(io_error)?;
    tmp.persist(path).map_err(|e| io_error(e.error))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replaces_existing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, "old").expect("write");

        atomic_write(&path, "new content").expect("atomic_write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "new content");
    }

    #[test]
    fn test_missing_parent_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("no/such/dir/doc.txt");
        assert!(matches!(atomic_write(&path, "x"), Err(DocError::Io { .. })));
    }
}
