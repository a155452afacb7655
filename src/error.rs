//! Error types for the doc-replace crate.

use std::path::PathBuf;

use crate::document::ElementRef;

/// Failures raised by a document host or by the session around it.
#[derive(Debug, thiserror::Error)]
pub enum DocError {
    /// No document is open in the current session.
    #[error("no active document")]
    NoActiveDocument,

    /// The element reference does not point into the document.
    #[error("element {element} not found (document has {count} elements)")]
    ElementNotFound { element: ElementRef, count: usize },

    /// A character range falls outside its element's text.
    #[error("invalid range {start}..={end} in element {element} (length {len})")]
    InvalidRange {
        element: ElementRef,
        start: usize,
        end: usize,
        len: usize,
    },

    /// The pattern handed to the bulk replace primitive did not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// A stored document that parses but does not describe a valid body.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error with context.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience result type for document operations.
pub type DocResult<T> = Result<T, DocError>;
