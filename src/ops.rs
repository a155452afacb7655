//! Public operations.
//!
//! Each function here is a failure boundary: host errors are logged and
//! returned as a failed [`OperationResult`], never as `Err`. The arguments
//! are plain strings and the results serialise to plain JSON, so any
//! presentation layer (the MCP tools, a CLI, a sidebar) can call these
//! directly.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::context::extract_context;
use crate::document::{DocumentHost, ElementRef};
use crate::error::DocResult;
use crate::matcher::find_all;
use crate::mutator;
use crate::result::OperationResult;

/// One match as reported by [`find_occurrences`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// The matched text.
    pub text: String,
    /// Surrounding text, see [`extract_context`].
    pub context: String,
    pub element: ElementRef,
    pub start_offset: usize,
    pub end_offset_inclusive: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrences {
    pub occurrences: Vec<Occurrence>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentContent {
    pub content: String,
    pub word_count: usize,
}

pub fn search_and_replace<D>(document: &mut D, search_text: &str, replace_text: &str) -> OperationResult
where
    D: DocumentHost + ?Sized,
{
    boundary(
        "searchAndReplace",
        mutator::replace_all(document, search_text, replace_text),
    )
}

pub fn highlight_text<D>(document: &mut D, search_text: &str) -> OperationResult
where
    D: DocumentHost + ?Sized,
{
    boundary("highlightText", mutator::highlight_all(document, search_text))
}

pub fn remove_all_highlights<D>(document: &mut D) -> OperationResult
where
    D: DocumentHost + ?Sized,
{
    boundary("removeAllHighlights", mutator::clear_all_highlights(document))
}

pub fn remove_highlight_for_text<D>(document: &mut D, search_text: &str) -> OperationResult
where
    D: DocumentHost + ?Sized,
{
    boundary(
        "removeHighlightForText",
        mutator::unhighlight_text(document, search_text),
    )
}

/// List every occurrence with its text, position, and context.
pub fn find_occurrences<D>(document: &D, search_text: &str) -> OperationResult<Occurrences>
where
    D: DocumentHost + ?Sized,
{
    let found = collect_occurrences(document, search_text).map(|occurrences| {
        let count = occurrences.len();
        OperationResult::ok(count, format!("Found {count} occurrence(s)"))
            .with_data(Occurrences { occurrences })
    });
    boundary("findOccurrences", found)
}

/// The body text and its word count (runs of non-whitespace).
pub fn get_document_content<D>(document: &D) -> OperationResult<DocumentContent>
where
    D: DocumentHost + ?Sized,
{
    let content = document.body_text().map(|content| {
        let word_count = content.split_whitespace().count();
        OperationResult::ok(word_count, "Document content retrieved")
            .with_data(DocumentContent { content, word_count })
    });
    boundary("getDocumentContent", content)
}

fn collect_occurrences<D>(document: &D, search_text: &str) -> DocResult<Vec<Occurrence>>
where
    D: DocumentHost + ?Sized,
{
    let mut occurrences = Vec::new();
    for span in find_all(document, search_text) {
        let span = span?;
        let element_text = document.element_text(span.element)?;
        let text = element_text
            .chars()
            .skip(span.start_offset)
            .take(span.len())
            .collect();
        occurrences.push(Occurrence {
            text,
            context: extract_context(&element_text, span.start_offset, span.end_offset_inclusive),
            element: span.element,
            start_offset: span.start_offset,
            end_offset_inclusive: span.end_offset_inclusive,
        });
    }
    Ok(occurrences)
}

fn boundary<T>(operation: &str, result: DocResult<OperationResult<T>>) -> OperationResult<T> {
    result.unwrap_or_else(|e| {
        error!(operation, error = %e, "operation failed");
        OperationResult::failure(&e)
    })
}
