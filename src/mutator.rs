//! Text mutation built on [`find_all`].
//!
//! These functions return `Err` on host failure; [`crate::ops`] turns that
//! into a failed [`OperationResult`]. Nothing is rolled back: spans styled
//! before a failure stay styled.

use tracing::debug;

use crate::document::{DocumentHost, HIGHLIGHT_COLOR, MatchSpan, StyleAttribute};
use crate::error::DocResult;
use crate::escape::escape_literal;
use crate::matcher::{count_matches, find_all};
use crate::result::OperationResult;

/// Replace every occurrence of `query` with `replacement`.
///
/// The count comes from a read-only pre-scan; the document is not scanned
/// again after the bulk replace.
pub fn replace_all<D>(document: &mut D, query: &str, replacement: &str) -> DocResult<OperationResult>
where
    D: DocumentHost + ?Sized,
{
    let count = count_matches(&*document, query)?;
    if count == 0 {
        return Ok(OperationResult::ok(0, "No occurrences found"));
    }

    // The host primitive takes a pattern; the enumeration above is literal.
    document.replace_text(&escape_literal(query), replacement)?;
    debug!(query, count, "replaced occurrences");

    Ok(OperationResult::ok(
        count,
        format!("Successfully replaced {count} occurrence(s)"),
    ))
}

/// Apply the highlight colour to every occurrence of `query`.
pub fn highlight_all<D>(document: &mut D, query: &str) -> DocResult<OperationResult>
where
    D: DocumentHost + ?Sized,
{
    let count = style_each(document, query, Some(HIGHLIGHT_COLOR))?;
    if count == 0 {
        return Ok(OperationResult::ok(0, "No occurrences found to highlight"));
    }
    Ok(OperationResult::ok(count, format!("Highlighted {count} occurrence(s)")))
}

/// Clear the highlight on every occurrence of `query`.
///
/// Zero matches is reported with the same message shape as any other count.
pub fn unhighlight_text<D>(document: &mut D, query: &str) -> DocResult<OperationResult>
where
    D: DocumentHost + ?Sized,
{
    let count = style_each(document, query, None)?;
    Ok(OperationResult::ok(
        count,
        format!("Removed highlights from {count} occurrence(s)"),
    ))
}

/// Clear the highlight over the whole document, regardless of any query.
pub fn clear_all_highlights<D>(document: &mut D) -> DocResult<OperationResult>
where
    D: DocumentHost + ?Sized,
{
    document.set_attribute_everywhere(StyleAttribute::BackgroundColor, None)?;
    Ok(OperationResult::ok(0, "All highlights removed"))
}

/// Set or clear the background colour span by span. Returns the number styled.
fn style_each<D>(document: &mut D, query: &str, color: Option<&str>) -> DocResult<usize>
where
    D: DocumentHost + ?Sized,
{
    // Styling never moves text, so the spans stay valid while we apply them.
    let spans: Vec<MatchSpan> = find_all(&*document, query).collect::<DocResult<_>>()?;

    let mut count = 0;
    for span in &spans {
        document.set_attribute(span, StyleAttribute::BackgroundColor, color)?;
        count += 1;
    }
    debug!(query, count, highlight = color.is_some(), "styled occurrences");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ElementRef, MemoryDocument};

    #[test]
    fn test_replace_all_end_to_end() {
        let mut doc = MemoryDocument::from_text("cat sat cat");
        let result = replace_all(&mut doc, "cat", "dog").expect("replace");
        assert_eq!(result, OperationResult::ok(2, "Successfully replaced 2 occurrence(s)"));
        assert_eq!(doc.body_text().expect("body"), "dog sat dog");
    }

    #[test]
    fn test_replace_all_no_match_leaves_document() {
        let mut doc = MemoryDocument::from_text("hello");
        let before = doc.clone();
        let result = replace_all(&mut doc, "xyz", "abc").expect("replace");
        assert_eq!(result, OperationResult::ok(0, "No occurrences found"));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_replace_all_special_characters() {
        let mut doc = MemoryDocument::from_text("cost: $5.00 or 5x00");
        let result = replace_all(&mut doc, "5.00", "$1").expect("replace");
        assert_eq!(result.count, 1);
        assert_eq!(doc.body_text().expect("body"), "cost: $$1 or 5x00");
    }

    #[test]
    fn test_replace_count_is_prescan() {
        // "aa" in "aaa" is one non-overlapping match.
        let mut doc = MemoryDocument::from_text("aaa");
        let result = replace_all(&mut doc, "aa", "a").expect("replace");
        assert_eq!(result.count, 1);
        assert_eq!(doc.body_text().expect("body"), "aa");
    }

    #[test]
    fn test_highlight_and_unhighlight() {
        let mut doc = MemoryDocument::from_text("one two one");
        let result = highlight_all(&mut doc, "one").expect("highlight");
        assert_eq!(result, OperationResult::ok(2, "Highlighted 2 occurrence(s)"));

        let e = ElementRef::new(0);
        assert!(doc.is_highlighted(e, 0));
        assert!(doc.is_highlighted(e, 2));
        assert!(!doc.is_highlighted(e, 3));
        assert!(doc.is_highlighted(e, 8));
        assert_eq!(
            doc.attribute(e, 9, StyleAttribute::BackgroundColor),
            Some(HIGHLIGHT_COLOR)
        );

        let result = unhighlight_text(&mut doc, "one").expect("unhighlight");
        assert_eq!(result, OperationResult::ok(2, "Removed highlights from 2 occurrence(s)"));
        assert!(!doc.has_highlights());
    }

    #[test]
    fn test_highlight_no_match() {
        let mut doc = MemoryDocument::from_text("hello");
        let result = highlight_all(&mut doc, "xyz").expect("highlight");
        assert_eq!(result, OperationResult::ok(0, "No occurrences found to highlight"));
        assert!(!doc.has_highlights());
    }

    #[test]
    fn test_unhighlight_zero_keeps_count_message() {
        let mut doc = MemoryDocument::from_text("hello");
        let result = unhighlight_text(&mut doc, "xyz").expect("unhighlight");
        assert_eq!(result, OperationResult::ok(0, "Removed highlights from 0 occurrence(s)"));
    }

    #[test]
    fn test_unhighlight_only_touches_matches() {
        let mut doc = MemoryDocument::from_text("red blue");
        highlight_all(&mut doc, "red").expect("highlight");
        highlight_all(&mut doc, "blue").expect("highlight");
        unhighlight_text(&mut doc, "red").expect("unhighlight");
        let e = ElementRef::new(0);
        assert!(!doc.is_highlighted(e, 0));
        assert!(doc.is_highlighted(e, 4));
    }

    #[test]
    fn test_clear_all_highlights() {
        let mut doc = MemoryDocument::from_text("a b\nc");
        highlight_all(&mut doc, "a").expect("highlight");
        highlight_all(&mut doc, "c").expect("highlight");
        let result = clear_all_highlights(&mut doc).expect("clear");
        assert!(result.success);
        assert_eq!(result.message, "All highlights removed");
        assert!(!doc.has_highlights());
    }

    #[test]
    fn test_highlight_is_idempotent() {
        let mut doc = MemoryDocument::from_text("x y x");
        highlight_all(&mut doc, "x").expect("highlight");
        let once = doc.clone();
        highlight_all(&mut doc, "x").expect("highlight");
        assert_eq!(doc, once);
    }
}
