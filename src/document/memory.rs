//! In-process document host.
//!
//! A [`MemoryDocument`] is a list of paragraphs, each holding its text and a
//! [`StyleMap`]. Offsets exposed through [`DocumentHost`] are character
//! offsets; byte offsets never leave this module.

use std::ops::Range;

use regex::{NoExpand, Regex};
use tracing::debug;

use super::style::{StyleAttribute, StyleMap};
use super::{DocumentHost, ElementRef, MatchSpan};
use crate::error::{DocError, DocResult};

/// One text element: text plus per-character styling.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paragraph {
    text: String,
    styles: StyleMap,
}

impl Paragraph {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let styles = StyleMap::new(text.chars().count());
        Self { text, styles }
    }

    /// Build a paragraph with existing styling. `styles` must cover every character.
    pub fn with_styles(text: impl Into<String>, styles: StyleMap) -> DocResult<Self> {
        let text = text.into();
        let len = text.chars().count();
        if styles.len() != len {
            return Err(DocError::MalformedDocument(format!(
                "styles cover {} characters, text has {len}",
                styles.len()
            )));
        }
        Ok(Self { text, styles })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn styles(&self) -> &StyleMap {
        &self.styles
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.styles.len()
    }

    /// Replace every match of `re`, keeping styles aligned. Returns the match count.
    fn replace_matches(&mut self, re: &Regex, replacement: &str) -> usize {
        let spans: Vec<Range<usize>> = re
            .find_iter(&self.text)
            .map(|m| char_range(&self.text, m.range()))
            .collect();
        if spans.is_empty() {
            return 0;
        }

        let inserted = replacement.chars().count();
        let text = re.replace_all(&self.text, NoExpand(replacement)).into_owned();
        // Back to front so earlier ranges stay valid.
        for span in spans.iter().rev() {
            self.styles.splice(span.clone(), inserted);
        }
        self.text = text;
        spans.len()
    }
}

/// Change counters for a document's text and styling.
///
/// Each counter moves only when a mutation actually changes something, so
/// comparing two revisions tells whether there is anything new to save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revision {
    pub text: u64,
    pub styles: u64,
}

/// A document held entirely in memory.
///
/// Equality compares content only, not revisions.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    paragraphs: Vec<Paragraph>,
    revision: Revision,
}

impl PartialEq for MemoryDocument {
    fn eq(&self, other: &Self) -> bool {
        self.paragraphs == other.paragraphs
    }
}

impl Eq for MemoryDocument {}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::from_paragraphs(Vec::new())
    }
}

impl MemoryDocument {
    /// An empty document (one empty paragraph).
    pub fn new() -> Self {
        Self::default()
    }

    /// Split `text` into one paragraph per line.
    pub fn from_text(text: &str) -> Self {
        Self::from_paragraphs(text.lines().map(Paragraph::new).collect())
    }

    /// Build a document from paragraphs. An empty list yields one empty paragraph.
    pub fn from_paragraphs(paragraphs: Vec<Paragraph>) -> Self {
        let paragraphs = if paragraphs.is_empty() {
            vec![Paragraph::default()]
        } else {
            paragraphs
        };
        Self {
            paragraphs,
            revision: Revision::default(),
        }
    }

    pub const fn revision(&self) -> Revision {
        self.revision
    }

    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.paragraphs
    }

    /// True when the character at `offset` of `element` carries a highlight.
    pub fn is_highlighted(&self, element: ElementRef, offset: usize) -> bool {
        self.paragraphs
            .get(element.index())
            .is_some_and(|p| p.styles.is_highlighted(offset))
    }

    /// True when any character in the document carries a highlight.
    pub fn has_highlights(&self) -> bool {
        self.paragraphs
            .iter()
            .any(|p| (0..p.char_len()).any(|i| p.styles.is_highlighted(i)))
    }

    /// Value of `attribute` at one character, if set.
    pub fn attribute(&self, element: ElementRef, offset: usize, attribute: StyleAttribute) -> Option<&str> {
        self.paragraphs
            .get(element.index())
            .and_then(|p| p.styles.get(offset, attribute))
    }

    fn paragraph(&self, element: ElementRef) -> DocResult<&Paragraph> {
        self.paragraphs
            .get(element.index())
            .ok_or(DocError::ElementNotFound {
                element,
                count: self.paragraphs.len(),
            })
    }

    fn paragraph_mut(&mut self, element: ElementRef) -> DocResult<&mut Paragraph> {
        let count = self.paragraphs.len();
        self.paragraphs
            .get_mut(element.index())
            .ok_or(DocError::ElementNotFound { element, count })
    }
}

impl DocumentHost for MemoryDocument {
    fn element_count(&self) -> DocResult<usize> {
        Ok(self.paragraphs.len())
    }

    fn element_text(&self, element: ElementRef) -> DocResult<String> {
        Ok(self.paragraph(element)?.text.clone())
    }

    fn find_text(&self, query: &str, after: Option<&MatchSpan>) -> DocResult<Option<MatchSpan>> {
        if query.is_empty() {
            return Ok(None);
        }

        let (first, mut from_char) = match after {
            Some(span) => {
                self.paragraph(span.element)?;
                (span.element.index(), span.end_offset_inclusive + 1)
            }
            None => (0, 0),
        };
        let query_len = query.chars().count();

        for (index, paragraph) in self.paragraphs.iter().enumerate().skip(first) {
            let text = paragraph.text();
            let from_byte = byte_offset(text, from_char);
            if let Some(found) = text[from_byte..].find(query) {
                let start = text[..from_byte + found].chars().count();
                return Ok(Some(MatchSpan::new(
                    ElementRef::new(index),
                    start,
                    start + query_len - 1,
                )));
            }
            from_char = 0;
        }

        Ok(None)
    }

    fn replace_text(&mut self, pattern: &str, replacement: &str) -> DocResult<()> {
        if pattern.is_empty() {
            return Ok(());
        }
        let re = Regex::new(pattern)?;
        let replaced: usize = self
            .paragraphs
            .iter_mut()
            .map(|p| p.replace_matches(&re, replacement))
            .sum();
        if replaced > 0 {
            self.revision.text += 1;
        }
        debug!(pattern, replaced, "bulk replace applied");
        Ok(())
    }

    fn set_attribute(
        &mut self,
        span: &MatchSpan,
        attribute: StyleAttribute,
        value: Option<&str>,
    ) -> DocResult<()> {
        let paragraph = self.paragraph_mut(span.element)?;
        let len = paragraph.char_len();
        if span.start_offset > span.end_offset_inclusive || span.end_offset_inclusive >= len {
            return Err(DocError::InvalidRange {
                element: span.element,
                start: span.start_offset,
                end: span.end_offset_inclusive,
                len,
            });
        }
        if paragraph
            .styles
            .set(span.start_offset..span.end_offset_inclusive + 1, attribute, value)
        {
            self.revision.styles += 1;
        }
        Ok(())
    }

    fn set_attribute_everywhere(&mut self, attribute: StyleAttribute, value: Option<&str>) -> DocResult<()> {
        let mut changed = false;
        for paragraph in &mut self.paragraphs {
            let len = paragraph.char_len();
            changed |= paragraph.styles.set(0..len, attribute, value);
        }
        if changed {
            self.revision.styles += 1;
        }
        Ok(())
    }
}

/// Byte offset of character `char_offset`, or the text length past the end.
fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Convert a byte range on char boundaries into a character range.
fn char_range(text: &str, bytes: Range<usize>) -> Range<usize> {
    let start = text[..bytes.start].chars().count();
    let len = text[bytes].chars().count();
    start..start + len
}
