//! Host document model.
//!
//! The engine never reaches for an ambient "current document". Every
//! operation receives a [`DocumentHost`] handle, and the host supplies the
//! four primitives the engine is built on:
//!
//! 1. an ordered stream of text elements (paragraphs),
//! 2. a literal substring search that resumes after a previous match,
//! 3. a bulk pattern-based replace,
//! 4. a per-range style-attribute setter.
//!
//! [`MemoryDocument`] is the in-process host used by the MCP server and the
//! tests. Any other host exposing the same primitives is substitutable.

pub mod memory;
pub mod store;
pub mod style;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DocResult;

pub use memory::{MemoryDocument, Paragraph, Revision};
pub use style::{HIGHLIGHT_COLOR, StyleAttribute, StyleMap, StyleRun};

/// Index of a text element within a document's element sequence.
///
/// A reference, not ownership: it is only meaningful for the document and
/// the operation call it was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementRef(usize);

impl ElementRef {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One occurrence of a query: a character range inside a single element.
///
/// Offsets count characters (Unicode scalar values), and the end is
/// inclusive, so `start_offset <= end_offset_inclusive` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSpan {
    pub element: ElementRef,
    pub start_offset: usize,
    pub end_offset_inclusive: usize,
}

impl MatchSpan {
    pub const fn new(element: ElementRef, start_offset: usize, end_offset_inclusive: usize) -> Self {
        Self {
            element,
            start_offset,
            end_offset_inclusive,
        }
    }

    /// Number of characters covered by the span.
    pub const fn len(&self) -> usize {
        self.end_offset_inclusive.saturating_sub(self.start_offset) + 1
    }

    /// Whether the offsets are ordered.
    pub const fn is_ordered(&self) -> bool {
        self.start_offset <= self.end_offset_inclusive
    }

    /// Always false: a span covers at least one character.
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// The capabilities a document host must provide.
///
/// All methods are fallible. A host failure (no document, a stale span, a
/// bad pattern) surfaces as a [`DocError`](crate::DocError) and is turned
/// into a failed operation result at the public boundary.
pub trait DocumentHost {
    /// Number of text elements in the body.
    fn element_count(&self) -> DocResult<usize>;

    /// Text of one element.
    fn element_text(&self, element: ElementRef) -> DocResult<String>;

    /// The whole body as one string, elements joined by `\n`.
    fn body_text(&self) -> DocResult<String> {
        let count = self.element_count()?;
        let mut texts = Vec::with_capacity(count);
        for index in 0..count {
            texts.push(self.element_text(ElementRef::new(index))?);
        }
        Ok(texts.join("\n"))
    }

    /// Find the next literal, case-sensitive occurrence of `query`.
    ///
    /// With `after = None` the search starts at the beginning of the body.
    /// Otherwise it resumes strictly after `after.end_offset_inclusive` in
    /// `after.element` and continues into later elements. Matches never
    /// cross element boundaries, and an empty query never matches.
    fn find_text(&self, query: &str, after: Option<&MatchSpan>) -> DocResult<Option<MatchSpan>>;

    /// Replace every match of the regular expression `pattern` with
    /// `replacement`, element by element.
    ///
    /// The replacement is inserted verbatim (no group expansion). Callers
    /// that hold a literal string must escape it first.
    fn replace_text(&mut self, pattern: &str, replacement: &str) -> DocResult<()>;

    /// Set (`Some`) or clear (`None`) one style attribute over a span.
    fn set_attribute(
        &mut self,
        span: &MatchSpan,
        attribute: StyleAttribute,
        value: Option<&str>,
    ) -> DocResult<()>;

    /// Set or clear one style attribute over the whole body.
    fn set_attribute_everywhere(&mut self, attribute: StyleAttribute, value: Option<&str>) -> DocResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_len() {
        let span = MatchSpan::new(ElementRef::new(0), 2, 4);
        assert_eq!(span.len(), 3);
        assert!(span.is_ordered());

        let inverted = MatchSpan::new(ElementRef::new(0), 5, 1);
        assert_eq!(inverted.len(), 1);
        assert!(!inverted.is_ordered());
    }
}
