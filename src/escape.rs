//! Literal escaping for the pattern-based replace primitive.

/// Characters with special meaning in a replace pattern.
const SPECIAL: &[char] = &[
    '.', '*', '+', '?', '^', '$', '{', '}', '(', ')', '|', '[', ']', '\\',
];

/// Prefix every pattern-special character in `s` with a backslash.
///
/// Not idempotent: escaping twice escapes the backslashes added the first
/// time. Escape exactly once, right before calling
/// [`DocumentHost::replace_text`](crate::document::DocumentHost::replace_text).
pub fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + s.len() / 4);
    for c in s.chars() {
        if SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_literal("hello world"), "hello world");
        assert_eq!(escape_literal("a-b#c&d~e"), "a-b#c&d~e");
        assert_eq!(escape_literal(""), "");
    }

    #[test]
    fn test_every_special_char_escaped_once() {
        let input = r".*+?^${}()|[]\";
        let escaped = escape_literal(input);
        assert_eq!(escaped, r"\.\*\+\?\^\$\{\}\(\)\|\[\]\\");
        assert_eq!(escaped.chars().count(), input.chars().count() * 2);
    }

    #[test]
    fn test_length_grows_by_special_count() {
        let input = "price: $5.00 (approx)";
        let specials = input.chars().filter(|c| SPECIAL.contains(c)).count();
        assert_eq!(specials, 4);
        assert_eq!(escape_literal(input).len(), input.len() + specials);
    }

    #[test]
    fn test_not_idempotent() {
        let once = escape_literal("a.b");
        assert_eq!(once, r"a\.b");
        let twice = escape_literal(&once);
        assert_eq!(twice, r"a\\\.b");
        assert_ne!(once, twice);
    }

    #[test]
    fn test_escaped_output_matches_literally() {
        for literal in ["a.b", "(x)", "1+1=2", r"C:\dir", "[a-z]*", "{3}", "^$|"] {
            let re = regex::Regex::new(&escape_literal(literal)).expect("escaped pattern compiles");
            assert!(re.is_match(literal), "{literal} should match itself");
            assert_eq!(re.find(literal).map(|m| m.as_str()), Some(literal));
        }
        let re = regex::Regex::new(&escape_literal("a.b")).expect("compiles");
        assert!(!re.is_match("axb"));
    }

    #[test]
    fn test_unicode_passthrough() {
        assert_eq!(escape_literal("naïve (café)"), r"naïve \(café\)");
    }
}
