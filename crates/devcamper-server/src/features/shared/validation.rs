//! Shared validation utilities
//!
//! Field-level checks used by the resource schemas.
//!
//! # Examples
//!
//! ```rust,ignore
//! use devcamper_server::features::shared::validation::{is_valid_email, is_valid_url, slugify};
//!
//! assert!(is_valid_email("john@gmail.com"));
//! assert!(is_valid_url("https://devworks.com"));
//! assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
//! ```

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[\w.+-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$").ok()
});

/// Check an email address against the accepted format
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}

/// Check that a URL parses and uses HTTP or HTTPS
pub fn is_valid_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|parsed| matches!(parsed.scheme(), "http" | "https") && parsed.host().is_some())
        .unwrap_or(false)
}

/// Derive a URL-safe slug from a display name
///
/// Lowercases ASCII letters, keeps digits, and collapses every other run of
/// characters into a single hyphen. Leading and trailing hyphens are dropped.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("john@gmail.com"));
        assert!(is_valid_email("first.last+tag@mail.example.io"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("missing@tld"));
        assert!(!is_valid_email("@example.com"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://devworks.com"));
        assert!(is_valid_url("http://example.com/path?query=1"));
        assert!(!is_valid_url("ftp://example.com"));
        assert!(!is_valid_url("example.com"));
        assert!(!is_valid_url("not a url"));
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Devworks Bootcamp"), "devworks-bootcamp");
        assert_eq!(slugify("  ModernTech -- Bootcamp! "), "moderntech-bootcamp");
        assert_eq!(slugify("Codemasters 2.0"), "codemasters-2-0");
        assert_eq!(slugify("!!!"), "");
    }
}
