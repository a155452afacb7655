//! Preview text around a match.

/// Characters of lookbehind and lookahead around a match.
pub const CONTEXT_RADIUS: usize = 20;

/// Return the text around a match, wrapped in `...` markers.
///
/// The window is `[start - 20, end_inclusive + 21)` in characters, clamped
/// to `element_text`. The markers are added even when the window reaches
/// the start or end of the text.
pub fn extract_context(element_text: &str, start_offset: usize, end_offset_inclusive: usize) -> String {
    let len = element_text.chars().count();
    let from = start_offset.saturating_sub(CONTEXT_RADIUS);
    let to = end_offset_inclusive
        .saturating_add(CONTEXT_RADIUS + 1)
        .min(len);
    let window: String = element_text
        .chars()
        .skip(from)
        .take(to.saturating_sub(from))
        .collect();
    format!("...{window}...")
}
