//! Loading and saving [`MemoryDocument`]s.
//!
//! Two formats, chosen by file extension:
//!
//! - `.json`: paragraphs with their style runs, so highlights survive a save.
//! - anything else: plain text, one paragraph per line, styling dropped.
//!
//! Plain-text files are written back with the line endings and final
//! newline they were read with, see [`TextLayout`].

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::memory::{MemoryDocument, Paragraph};
use super::style::{StyleMap, StyleRun};
use crate::error::{DocError, DocResult};

/// On-disk representation of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Json,
}

impl DocumentFormat {
    pub fn for_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::PlainText,
        }
    }
}

/// Line-ending conventions of a plain-text file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    pub crlf: bool,
    pub trailing_newline: bool,
}

impl Default for TextLayout {
    fn default() -> Self {
        Self {
            crlf: false,
            trailing_newline: true,
        }
    }
}

impl TextLayout {
    /// Read the conventions off raw file content.
    pub fn detect(raw: &str) -> Self {
        Self {
            crlf: raw.contains("\r\n"),
            trailing_newline: raw.ends_with('\n'),
        }
    }

    pub const fn separator(self) -> &'static str {
        if self.crlf { "\r\n" } else { "\n" }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredDocument {
    paragraphs: Vec<StoredParagraph>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredParagraph {
    text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    styles: Vec<StyleRun>,
}

/// Read a document from `path`, along with the layout to write it back in.
///
/// JSON documents always get the default layout.
pub fn load(path: &Path) -> DocResult<(MemoryDocument, TextLayout)> {
    let raw = std::fs::read_to_string(path).map_err(|source| DocError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let format = DocumentFormat::for_path(path);
    debug!(path = %path.display(), ?format, bytes = raw.len(), "loading document");
    match format {
        DocumentFormat::PlainText => Ok((MemoryDocument::from_text(&raw), TextLayout::detect(&raw))),
        DocumentFormat::Json => Ok((from_json(&raw)?, TextLayout::default())),
    }
}

/// Write `document` to `path`, atomically replacing any existing file.
pub fn save(document: &MemoryDocument, path: &Path, layout: TextLayout) -> DocResult<()> {
    let content = match DocumentFormat::for_path(path) {
        DocumentFormat::PlainText => to_plain_text(document, layout),
        DocumentFormat::Json => to_json(document)?,
    };
    crate::util::atomic::atomic_write(path, &content)
}

/// Parse the JSON document format.
pub fn from_json(raw: &str) -> DocResult<MemoryDocument> {
    let stored: StoredDocument = serde_json::from_str(raw)?;
    let paragraphs = stored
        .paragraphs
        .into_iter()
        .map(|p| {
            let styles = StyleMap::from_runs(p.text.chars().count(), &p.styles)?;
            Paragraph::with_styles(p.text, styles)
        })
        .collect::<DocResult<Vec<_>>>()?;
    Ok(MemoryDocument::from_paragraphs(paragraphs))
}

/// Render the JSON document format.
pub fn to_json(document: &MemoryDocument) -> DocResult<String> {
    let stored = StoredDocument {
        paragraphs: document
            .paragraphs()
            .iter()
            .map(|p| StoredParagraph {
                text: p.text().to_owned(),
                styles: p.styles().runs(),
            })
            .collect(),
    };
    let mut json = serde_json::to_string_pretty(&stored)?;
    json.push('\n');
    Ok(json)
}

/// Render paragraphs as lines joined per `layout`.
pub fn to_plain_text(document: &MemoryDocument, layout: TextLayout) -> String {
    let separator = layout.separator();
    let mut out = document
        .paragraphs()
        .iter()
        .map(Paragraph::text)
        .collect::<Vec<_>>()
        .join(separator);
    if layout.trailing_newline {
        out.push_str(separator);
    }
    out
}
