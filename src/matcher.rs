//! Match enumeration.

use std::iter::FusedIterator;

use crate::document::{DocumentHost, MatchSpan};
use crate::error::{DocError, DocResult};

/// Enumerate every non-overlapping occurrence of `query` in document order.
///
/// The sequence is lazy and forward-only. Each step asks the host for the
/// next match strictly after the previous one, so `"aa"` in `"aaaa"` yields
/// two spans. An empty query yields nothing. A host error, or a span whose
/// start lies after its end, is yielded once as an error and ends the
/// sequence.
pub fn find_all<'a, D>(document: &'a D, query: &'a str) -> Matches<'a, D>
where
    D: DocumentHost + ?Sized,
{
    Matches {
        document,
        query,
        last: None,
        done: query.is_empty(),
    }
}

/// Iterator returned by [`find_all`].
pub struct Matches<'a, D: ?Sized> {
    document: &'a D,
    query: &'a str,
    last: Option<MatchSpan>,
    done: bool,
}

impl<D: DocumentHost + ?Sized> Iterator for Matches<'_, D> {
    type Item = DocResult<MatchSpan>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.document.find_text(self.query, self.last.as_ref()) {
            Ok(Some(span)) if !span.is_ordered() => {
                self.done = true;
                let len = self
                    .document
                    .element_text(span.element)
                    .map_or(0, |text| text.chars().count());
                Some(Err(DocError::InvalidRange {
                    element: span.element,
                    start: span.start_offset,
                    end: span.end_offset_inclusive,
                    len,
                }))
            }
            Ok(Some(span)) => {
                self.last = Some(span);
                Some(Ok(span))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<D: DocumentHost + ?Sized> FusedIterator for Matches<'_, D> {}

/// Count the occurrences of `query` without touching the document.
pub fn count_matches<D: DocumentHost + ?Sized>(document: &D, query: &str) -> DocResult<usize> {
    find_all(document, query).try_fold(0, |n, span| span.map(|_| n + 1))
}
