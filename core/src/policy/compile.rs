//! Wildcard pattern compilation
//!
//! Compiles IAM `StringLike` and action patterns into anchored regexes.

use regex::{Regex, RegexBuilder};

use crate::error::{Result, SynthError};

/// Maximum allowed length for wildcard patterns (to prevent abuse)
const MAX_PATTERN_LENGTH: usize = 256;

/// A compiled IAM wildcard pattern.
///
/// `*` matches any run of characters (including none), `?` matches exactly
/// one. `${*}`, `${?}` and `${$}` stand for the literal characters.
#[derive(Debug, Clone)]
pub struct WildcardPattern {
    regex: Regex,
}

impl WildcardPattern {
    /// Case-sensitive pattern, as used by `StringLike`
    pub fn new(pattern: &str) -> Result<Self> {
        Self::build(pattern, false)
    }

    /// Case-insensitive pattern, as used for action names
    pub fn case_insensitive(pattern: &str) -> Result<Self> {
        Self::build(pattern, true)
    }

    fn build(pattern: &str, case_insensitive: bool) -> Result<Self> {
        validate_pattern_length(pattern)?;

        let translated = format!("^{}$", translate_wildcards(pattern));
        let regex = RegexBuilder::new(&translated)
            .case_insensitive(case_insensitive)
            .dot_matches_new_line(true)
            .build()
            .map_err(|e| {
                SynthError::invalid_pattern(format!("cannot compile '{}': {}", pattern, e))
            })?;

        Ok(Self { regex })
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// Validate pattern length to prevent ReDoS and abuse
fn validate_pattern_length(pattern: &str) -> Result<()> {
    if pattern.len() > MAX_PATTERN_LENGTH {
        return Err(SynthError::invalid_pattern(format!(
            "pattern is too long (max {} characters)",
            MAX_PATTERN_LENGTH
        )));
    }
    Ok(())
}

/// Translate IAM wildcards into an unanchored regex body
fn translate_wildcards(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if let Some(literal) = escaped_literal(rest) {
            out.push_str(&regex::escape(literal));
            rest = &rest[4..];
            continue;
        }

        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => {
                let mut buf = [0u8; 4];
                out.push_str(&regex::escape(c.encode_utf8(&mut buf)));
            }
        }
        rest = &rest[c.len_utf8()..];
    }

    out
}

fn escaped_literal(rest: &str) -> Option<&'static str> {
    if rest.starts_with("${*}") {
        Some("*")
    } else if rest.starts_with("${?}") {
        Some("?")
    } else if rest.starts_with("${$}") {
        Some("$")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_wildcards() {
        assert_eq!(translate_wildcards("repo:*"), "repo:.*");
        assert_eq!(translate_wildcards("a?c"), "a.c");
        assert_eq!(translate_wildcards("a.b"), "a\\.b");
        assert_eq!(translate_wildcards("${*}"), "\\*");
    }

    #[test]
    fn test_star_matches_any_suffix() {
        let p = WildcardPattern::new("repo:my-org/my-repo:*").unwrap();
        assert!(p.is_match("repo:my-org/my-repo:ref:refs/heads/main"));
        assert!(p.is_match("repo:my-org/my-repo:environment:prod"));
        assert!(p.is_match("repo:my-org/my-repo:"));
        assert!(!p.is_match("repo:my-org/other:ref:refs/heads/main"));
    }

    #[test]
    fn test_pattern_is_anchored() {
        let p = WildcardPattern::new("repo:org/name:ref:refs/heads/main").unwrap();
        assert!(p.is_match("repo:org/name:ref:refs/heads/main"));
        assert!(!p.is_match("xrepo:org/name:ref:refs/heads/main"));
        assert!(!p.is_match("repo:org/name:ref:refs/heads/main-evil"));
    }

    #[test]
    fn test_question_mark_matches_one_char() {
        let p = WildcardPattern::new("v?").unwrap();
        assert!(p.is_match("v1"));
        assert!(!p.is_match("v"));
        assert!(!p.is_match("v10"));
    }

    #[test]
    fn test_regex_metacharacters_are_literal() {
        let p = WildcardPattern::new("repo:org/name.rs:(x)|y+").unwrap();
        assert!(p.is_match("repo:org/name.rs:(x)|y+"));
        assert!(!p.is_match("repo:org/nameXrs:(x)|y+"));
    }

    #[test]
    fn test_escaped_wildcards_are_literal() {
        let p = WildcardPattern::new("a${*}b").unwrap();
        assert!(p.is_match("a*b"));
        assert!(!p.is_match("axb"));
    }

    #[test]
    fn test_string_like_is_case_sensitive() {
        let p = WildcardPattern::new("repo:Org/*").unwrap();
        assert!(!p.is_match("repo:org/name"));
    }

    #[test]
    fn test_case_insensitive_for_actions() {
        let p = WildcardPattern::case_insensitive("s3:List*").unwrap();
        assert!(p.is_match("s3:ListBucket"));
        assert!(p.is_match("S3:listobjectsv2"));
        assert!(!p.is_match("s3:GetObject"));
    }

    #[test]
    fn test_rejects_overly_long_pattern() {
        let long_pattern = "a".repeat(300);
        let result = WildcardPattern::new(&long_pattern);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("too long"));
    }
}
