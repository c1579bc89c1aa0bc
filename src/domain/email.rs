//! Email value object.
//!
//! Validates and normalizes an address at construction; immutable afterwards.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MAX_EMAIL_LENGTH, MIN_EMAIL_LENGTH};

// Compiled once at first use; the pattern is a hardcoded constant.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Characters never allowed in an address, regardless of position.
const FORBIDDEN_CHARS: &[char] = &['<', '>', '"', '\'', '\\', '/', ';', ':', '&', '|', '`'];

/// Email validation failures, one kind per violated rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("Email must be at least {MIN_EMAIL_LENGTH} characters")]
    TooShort,

    #[error("Email must not exceed {MAX_EMAIL_LENGTH} characters")]
    TooLong,

    #[error("Email contains forbidden characters")]
    ForbiddenCharacters,

    #[error("Invalid email format")]
    InvalidFormat,
}

/// Validated email address.
///
/// Construction trims the input and checks length bounds, the forbidden
/// character set, the `local@domain.tld` shape and segment edges. A parsed
/// value re-parses to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Validate and normalize a raw address.
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let value = raw.trim();

        if value.len() < MIN_EMAIL_LENGTH {
            return Err(EmailError::TooShort);
        }
        if value.len() > MAX_EMAIL_LENGTH {
            return Err(EmailError::TooLong);
        }
        if value.contains(FORBIDDEN_CHARS) {
            return Err(EmailError::ForbiddenCharacters);
        }
        if !EMAIL_REGEX.is_match(value) {
            return Err(EmailError::InvalidFormat);
        }

        // Neither side of the @ may start or end with a dot or hyphen,
        // and the same holds for every dot-separated domain segment.
        let (local, domain) = value.split_once('@').ok_or(EmailError::InvalidFormat)?;
        if has_bad_edge(local) || domain.split('.').any(has_bad_edge) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(value.to_string()))
    }

    /// The normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the normalized address.
    pub fn into_string(self) -> String {
        self.0
    }
}

fn has_bad_edge(segment: &str) -> bool {
    segment.starts_with(['.', '-']) || segment.ends_with(['.', '-'])
}

impl std::fmt::Display for Email {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        for raw in ["a@b.co", "user@example.com", "first.last@sub.example.org"] {
            assert!(Email::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let email = Email::parse("  user@example.com  ").unwrap();
        assert_eq!(email.as_str(), "user@example.com");
    }

    #[test]
    fn parsing_is_idempotent() {
        let once = Email::parse(" alice@example.com ").unwrap();
        let twice = Email::parse(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn rejects_too_short() {
        assert_eq!(Email::parse("a@b"), Err(EmailError::TooShort));
    }

    #[test]
    fn rejects_too_long() {
        let raw = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::parse(&raw), Err(EmailError::TooLong));
    }

    #[test]
    fn rejects_forbidden_characters() {
        for raw in [
            "user<x@example.com",
            "user;x@example.com",
            "user|x@example.com",
            "user`x@example.com",
        ] {
            assert_eq!(Email::parse(raw), Err(EmailError::ForbiddenCharacters), "{raw}");
        }
    }

    #[test]
    fn rejects_bad_shape() {
        for raw in ["no-at-sign.com", "user@domain", "user@domain.c", "user@@x.com"] {
            assert_eq!(Email::parse(raw), Err(EmailError::InvalidFormat), "{raw}");
        }
    }

    #[test]
    fn rejects_bad_segment_edges() {
        for raw in [
            ".user@example.com",
            "user.@example.com",
            "-user@example.com",
            "user@-example.com",
            "user@example-.com",
        ] {
            assert_eq!(Email::parse(raw), Err(EmailError::InvalidFormat), "{raw}");
        }
    }
}
