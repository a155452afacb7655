//! The document a server instance is working on.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::document::store::{DocumentFormat, TextLayout};
use crate::document::{MemoryDocument, Revision, store};
use crate::error::{DocError, DocResult};

/// Holds the open document, if any, and where it was loaded from.
///
/// The session remembers the revision last written to disk so that saves
/// only happen when the file would actually change.
#[derive(Debug, Default)]
pub struct Session {
    document: Option<MemoryDocument>,
    source: Option<PathBuf>,
    layout: TextLayout,
    saved: Revision,
    autosave: bool,
}

impl Session {
    /// A session with no open document.
    pub fn new(autosave: bool) -> Self {
        Self {
            autosave,
            ..Self::default()
        }
    }

    /// A session over an in-memory document with no backing file.
    pub fn with_document(document: MemoryDocument) -> Self {
        Self {
            saved: document.revision(),
            document: Some(document),
            ..Self::default()
        }
    }

    /// Load `path`, replacing any open document.
    pub fn open(&mut self, path: &Path) -> DocResult<()> {
        let (document, layout) = store::load(path)?;
        info!(
            path = %path.display(),
            paragraphs = document.paragraphs().len(),
            crlf = layout.crlf,
            "document opened"
        );
        self.saved = document.revision();
        self.document = Some(document);
        self.source = Some(path.to_path_buf());
        self.layout = layout;
        Ok(())
    }

    pub fn document(&self) -> DocResult<&MemoryDocument> {
        self.document.as_ref().ok_or(DocError::NoActiveDocument)
    }

    pub fn document_mut(&mut self) -> DocResult<&mut MemoryDocument> {
        self.document.as_mut().ok_or(DocError::NoActiveDocument)
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// The backing file when it is plain text, where styling cannot be stored.
    pub fn plain_text_source(&self) -> Option<&Path> {
        self.source()
            .filter(|path| DocumentFormat::for_path(path) == DocumentFormat::PlainText)
    }

    /// Write the document back to its file when autosave is on and the
    /// stored form has changed since it was loaded or last saved.
    ///
    /// Styling changes alone never rewrite a plain-text file.
    ///
    /// Returns whether anything was written.
    pub fn persist(&mut self) -> DocResult<bool> {
        let (Some(document), Some(path)) = (&self.document, &self.source) else {
            return Ok(false);
        };
        if !self.autosave {
            return Ok(false);
        }

        let current = document.revision();
        let dirty = match DocumentFormat::for_path(path) {
            DocumentFormat::PlainText => current.text != self.saved.text,
            DocumentFormat::Json => current != self.saved,
        };
        if !dirty {
            debug!(path = %path.display(), "document unchanged, not saving");
            return Ok(false);
        }

        store::save(document, path, self.layout)?;
        self.saved = current;
        debug!(path = %path.display(), "document saved");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{DocumentHost, ElementRef, HIGHLIGHT_COLOR, MatchSpan, StyleAttribute};

    #[test]
    fn test_no_document() {
        let mut session = Session::new(true);
        assert!(matches!(session.document(), Err(DocError::NoActiveDocument)));
        assert!(matches!(session.document_mut(), Err(DocError::NoActiveDocument)));
        assert!(!session.persist().expect("persist"));
    }

    #[test]
    fn test_open_and_persist() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha\nbeta\n").expect("write");

        let mut session = Session::new(true);
        session.open(&path).expect("open");
        assert_eq!(session.source(), Some(path.as_path()));
        assert_eq!(session.document().expect("doc").body_text().expect("body"), "alpha\nbeta");

        session
            .document_mut()
            .expect("doc")
            .replace_text("beta", "gamma")
            .expect("replace");
        assert!(session.persist().expect("persist"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "alpha\ngamma\n");
        assert!(!session.persist().expect("persist"));
    }

    #[test]
    fn test_persist_skips_unchanged_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha\r\nbeta").expect("write");

        let mut session = Session::new(true);
        session.open(&path).expect("open");
        session
            .document_mut()
            .expect("doc")
            .replace_text("missing", "x")
            .expect("replace");
        assert!(!session.persist().expect("persist"));
        assert_eq!(std::fs::read(&path).expect("read"), b"alpha\r\nbeta".to_vec());
    }

    #[test]
    fn test_styling_alone_does_not_rewrite_plain_text() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha").expect("write");

        let mut session = Session::new(true);
        session.open(&path).expect("open");
        assert_eq!(session.plain_text_source(), Some(path.as_path()));
        let span = MatchSpan::new(ElementRef::new(0), 0, 1);
        session
            .document_mut()
            .expect("doc")
            .set_attribute(&span, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR))
            .expect("style");
        assert!(!session.persist().expect("persist"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "alpha");
    }

    #[test]
    fn test_styling_rewrites_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.json");
        std::fs::write(&path, r#"{"paragraphs":[{"text":"alpha"}]}"#).expect("write");

        let mut session = Session::new(true);
        session.open(&path).expect("open");
        assert_eq!(session.plain_text_source(), None);
        let span = MatchSpan::new(ElementRef::new(0), 0, 1);
        session
            .document_mut()
            .expect("doc")
            .set_attribute(&span, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR))
            .expect("style");
        assert!(session.persist().expect("persist"));
        assert!(std::fs::read_to_string(&path).expect("read").contains(HIGHLIGHT_COLOR));
    }

    #[test]
    fn test_persist_respects_autosave_off() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "alpha\n").expect("write");

        let mut session = Session::new(false);
        session.open(&path).expect("open");
        session
            .document_mut()
            .expect("doc")
            .replace_text("alpha", "omega")
            .expect("replace");
        assert!(!session.persist().expect("persist"));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "alpha\n");
    }

    #[test]
    fn test_open_missing_keeps_previous() {
        let mut session = Session::with_document(MemoryDocument::from_text("kept"));
        assert!(session.open(Path::new("/nonexistent/doc-replace/file.txt")).is_err());
        assert_eq!(session.document().expect("doc").body_text().expect("body"), "kept");
    }
}
