//! Input validation primitives.
//!
//! Provides ergonomic helpers for common validation patterns:
//! - Unwrapping Option values with resolution hints
//! - Validating non-empty strings
//! - Checking new project names against the filesystem-safe rules

use crate::error::{Error, Result};

/// Characters a project name may not contain.
pub const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest accepted project name, in characters.
pub const MAX_NAME_LEN: usize = 255;

/// Require an Option to contain a value, with hints for resolution.
pub fn require_with_hints<T>(
    opt: Option<T>,
    field: &str,
    message: &str,
    hints: Vec<String>,
) -> Result<T> {
    opt.ok_or_else(|| {
        hints.into_iter().fold(
            Error::validation_invalid_argument(field, message, None, None),
            |err, hint| err.with_hint(hint),
        )
    })
}

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

/// Validate a new project name.
///
/// The name is used verbatim as a file stem, folder name and identifier, so it
/// must be non-empty, at most 255 characters and free of path/shell
/// metacharacters. The error's `rule` detail names the violated rule
/// (`empty`, `too_long`, `forbidden_char`).
pub fn project_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::validation_invalid_name(
            name,
            "empty",
            "Project name cannot be empty",
        ));
    }

    let len = name.chars().count();
    if len > MAX_NAME_LEN {
        return Err(Error::validation_invalid_name(
            name,
            "too_long",
            format!(
                "Project name is too long ({} characters). Use {} characters or fewer",
                len, MAX_NAME_LEN
            ),
        ));
    }

    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(Error::validation_invalid_name(
            name,
            "forbidden_char",
            format!(
                "Project name contains invalid character '{}'. Avoid using: \\ / : * ? \" < > |",
                c
            ),
        ));
    }

    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_of(name: &str) -> String {
        let err = project_name(name).unwrap_err();
        assert_eq!(err.code.as_str(), "validation.invalid_name");
        err.details["rule"].as_str().unwrap().to_string()
    }

    #[test]
    fn require_with_hints_carries_hints() {
        let err = require_with_hints::<&str>(None, "module", "Missing module", vec!["Pass --module".to_string()])
            .unwrap_err();
        assert_eq!(err.hints[0].message, "Pass --module");
    }

    #[test]
    fn require_non_empty_trims_whitespace() {
        let result = require_non_empty("  hello  ", "field", "msg");
        assert_eq!(result.unwrap(), "hello");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace_only() {
        assert!(require_non_empty("   ", "field", "Cannot be empty").is_err());
    }

    #[test]
    fn project_name_accepts_valid_names() {
        assert_eq!(project_name("Awesome").unwrap(), "Awesome");
        assert!(project_name("My Game 2").is_ok());
        assert!(project_name(&"a".repeat(255)).is_ok());
    }

    #[test]
    fn project_name_rejects_empty() {
        assert_eq!(rule_of(""), "empty");
    }

    #[test]
    fn project_name_rejects_too_long() {
        assert_eq!(rule_of(&"a".repeat(256)), "too_long");
    }

    #[test]
    fn project_name_counts_characters_not_bytes() {
        assert!(project_name(&"é".repeat(200)).is_ok());
    }

    #[test]
    fn project_name_rejects_each_forbidden_char() {
        for c in FORBIDDEN_NAME_CHARS {
            assert_eq!(rule_of(&format!("Bad{}Name", c)), "forbidden_char");
        }
    }
}
