//! Per-character style attributes.
//!
//! Styling is a generic attribute map attached to every character, so new
//! attributes slot in without touching the engine. Highlighting is not a
//! field of its own: a character is highlighted exactly when it carries a
//! [`StyleAttribute::BackgroundColor`] value.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::{DocError, DocResult};

/// Background colour applied by the highlight operation.
pub const HIGHLIGHT_COLOR: &str = "#ffff00";

/// A style attribute that can be attached to a character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleAttribute {
    BackgroundColor,
    ForegroundColor,
    Bold,
    Italic,
}

/// Attribute values carried by one character.
pub type Attributes = BTreeMap<StyleAttribute, String>;

/// A maximal run of characters sharing the same non-empty attributes.
///
/// `end` is exclusive. This is the stored form of styling in JSON documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleRun {
    pub start: usize,
    pub end: usize,
    pub attributes: Attributes,
}

/// Attribute maps for every character of one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleMap {
    chars: Vec<Attributes>,
}

impl StyleMap {
    /// An unstyled map covering `len` characters.
    pub fn new(len: usize) -> Self {
        Self {
            chars: vec![Attributes::new(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Value of `attribute` at character `offset`, if set.
    pub fn get(&self, offset: usize, attribute: StyleAttribute) -> Option<&str> {
        self.chars
            .get(offset)
            .and_then(|attrs| attrs.get(&attribute))
            .map(String::as_str)
    }

    /// True when the character at `offset` has a background colour.
    pub fn is_highlighted(&self, offset: usize) -> bool {
        self.get(offset, StyleAttribute::BackgroundColor).is_some()
    }

    /// Set or clear `attribute` over `range`. Offsets past the end are ignored.
    ///
    /// Returns whether any character actually changed.
    pub fn set(&mut self, range: Range<usize>, attribute: StyleAttribute, value: Option<&str>) -> bool {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        let mut changed = false;
        for attrs in &mut self.chars[start..end] {
            changed |= match value {
                Some(v) => attrs.insert(attribute, v.to_owned()).as_deref() != Some(v),
                None => attrs.remove(&attribute).is_some(),
            };
        }
        changed
    }

    /// Replace the characters in `range` with `inserted` new characters.
    ///
    /// New characters take the attributes of the first replaced character,
    /// or of the preceding character when the range is empty.
    pub fn splice(&mut self, range: Range<usize>, inserted: usize) {
        let end = range.end.min(self.chars.len());
        let start = range.start.min(end);
        let template = if start < end {
            self.chars[start].clone()
        } else if start > 0 {
            self.chars[start - 1].clone()
        } else {
            self.chars.first().cloned().unwrap_or_default()
        };
        self.chars
            .splice(start..end, std::iter::repeat_n(template, inserted));
    }

    /// Collapse the map into runs of identical, non-empty attributes.
    pub fn runs(&self) -> Vec<StyleRun> {
        let mut runs: Vec<StyleRun> = Vec::new();
        for (offset, attrs) in self.chars.iter().enumerate() {
            if attrs.is_empty() {
                continue;
            }
            match runs.last_mut() {
                Some(run) if run.end == offset && run.attributes == *attrs => run.end += 1,
                _ => runs.push(StyleRun {
                    start: offset,
                    end: offset + 1,
                    attributes: attrs.clone(),
                }),
            }
        }
        runs
    }

    /// Rebuild a map of `len` characters from stored runs.
    pub fn from_runs(len: usize, runs: &[StyleRun]) -> DocResult<Self> {
        let mut map = Self::new(len);
        for run in runs {
            if run.start > run.end || run.end > len {
                return Err(DocError::MalformedDocument(format!(
                    "style run {}..{} outside text of length {len}",
                    run.start, run.end
                )));
            }
            for attrs in &mut map.chars[run.start..run.end] {
                attrs.extend(run.attributes.iter().map(|(k, v)| (*k, v.clone())));
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear_highlight() {
        let mut map = StyleMap::new(5);
        map.set(1..3, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR));
        assert!(!map.is_highlighted(0));
        assert!(map.is_highlighted(1));
        assert!(map.is_highlighted(2));
        assert!(!map.is_highlighted(3));

        map.set(0..5, StyleAttribute::BackgroundColor, None);
        assert!((0..5).all(|i| !map.is_highlighted(i)));
    }

    #[test]
    fn test_set_reports_change() {
        let mut map = StyleMap::new(3);
        assert!(map.set(0..2, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR)));
        assert!(!map.set(0..2, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR)));
        assert!(map.set(0..3, StyleAttribute::BackgroundColor, Some("#00ff00")));
        assert!(map.set(0..3, StyleAttribute::BackgroundColor, None));
        assert!(!map.set(0..3, StyleAttribute::BackgroundColor, None));
    }

    #[test]
    fn test_clearing_background_keeps_other_attributes() {
        let mut map = StyleMap::new(3);
        map.set(0..3, StyleAttribute::Bold, Some("true"));
        map.set(0..3, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR));
        map.set(0..3, StyleAttribute::BackgroundColor, None);
        assert_eq!(map.get(1, StyleAttribute::Bold), Some("true"));
        assert!(!map.is_highlighted(1));
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let mut map = StyleMap::new(2);
        map.set(1..10, StyleAttribute::Italic, Some("true"));
        assert_eq!(map.get(1, StyleAttribute::Italic), Some("true"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_splice_inherits_first_replaced_char() {
        let mut map = StyleMap::new(4);
        map.set(1..3, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR));
        // Replace two highlighted chars with five new ones.
        map.splice(1..3, 5);
        assert_eq!(map.len(), 7);
        assert!(!map.is_highlighted(0));
        assert!((1..6).all(|i| map.is_highlighted(i)));
        assert!(!map.is_highlighted(6));
    }

    #[test]
    fn test_splice_shrinks() {
        let mut map = StyleMap::new(6);
        map.splice(0..6, 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_runs_merge_adjacent() {
        let mut map = StyleMap::new(8);
        map.set(0..2, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR));
        map.set(2..4, StyleAttribute::BackgroundColor, Some(HIGHLIGHT_COLOR));
        map.set(6..7, StyleAttribute::Bold, Some("true"));
        let runs = map.runs();
        assert_eq!(runs.len(), 2);
        assert_eq!((runs[0].start, runs[0].end), (0, 4));
        assert_eq!((runs[1].start, runs[1].end), (6, 7));

        let rebuilt = StyleMap::from_runs(8, &runs).expect("valid runs");
        assert_eq!(rebuilt, map);
    }

    #[test]
    fn test_from_runs_rejects_overflow() {
        let run = StyleRun {
            start: 2,
            end: 9,
            attributes: Attributes::new(),
        };
        assert!(StyleMap::from_runs(4, &[run]).is_err());
    }
}
