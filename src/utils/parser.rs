//! Core parsing primitives for text extraction and substitution.
//!
//! Everything the renamer changes inside a file goes through these two
//! primitives: a literal global replace and a regex capture extractor.

use regex::Regex;

/// Replace every occurrence of `find` with `replace`.
///
/// Matches are non-overlapping and leftmost-first; scanning resumes right
/// after the inserted text, so a replacement that contains `find` is not
/// rewritten again. An empty `find` is a no-op.
///
/// Returns (new_content, replacement_count).
pub fn replace_literal(content: &str, find: &str, replace: &str) -> (String, usize) {
    if find.is_empty() {
        return (content.to_string(), 0);
    }

    let mut out = String::with_capacity(content.len());
    let mut count = 0usize;
    let mut rest = content;

    while let Some(pos) = rest.find(find) {
        out.push_str(&rest[..pos]);
        out.push_str(replace);
        rest = &rest[pos + find.len()..];
        count += 1;
    }
    out.push_str(rest);

    (out, count)
}

/// Extract the first capture group of the first match.
pub fn extract_first(content: &str, re: &Regex) -> Option<String> {
    re.captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
