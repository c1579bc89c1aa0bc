//! Username value object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::config::{MAX_USERNAME_LENGTH, MIN_USERNAME_LENGTH};

// Whitelist: letters, digits, underscore and hyphen only.
static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$")
        .expect("hardcoded username regex is invalid - fix source code")
});

/// Username validation failures, one kind per violated rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username must be at least {MIN_USERNAME_LENGTH} characters")]
    TooShort,

    #[error("Username must not exceed {MAX_USERNAME_LENGTH} characters")]
    TooLong,

    #[error("Username must not contain spaces")]
    ContainsSpaces,

    #[error("Username may only contain letters, digits, underscores and hyphens")]
    InvalidCharacters,

    #[error("Username must not start or end with a hyphen or underscore")]
    BadEdge,

    #[error("Username must not consist solely of digits")]
    AllDigits,
}

/// Validated username.
///
/// Invariants: trimmed, 3-30 characters, `[A-Za-z0-9_-]` only, no leading or
/// trailing `-`/`_`, not all-numeric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Validate and normalize a raw username.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let value = raw.trim();

        if value.len() < MIN_USERNAME_LENGTH {
            return Err(UsernameError::TooShort);
        }
        if value.len() > MAX_USERNAME_LENGTH {
            return Err(UsernameError::TooLong);
        }
        if value.contains(' ') {
            return Err(UsernameError::ContainsSpaces);
        }
        if !USERNAME_REGEX.is_match(value) {
            return Err(UsernameError::InvalidCharacters);
        }
        if value.starts_with(['-', '_']) || value.ends_with(['-', '_']) {
            return Err(UsernameError::BadEdge);
        }
        if value.chars().all(|c| c.is_ascii_digit()) {
            return Err(UsernameError::AllDigits);
        }

        Ok(Self(value.to_string()))
    }

    /// The normalized username.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the normalized username.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_usernames() {
        for raw in ["abc", "alice1", "user_name", "user-name", "A1b2C3"] {
            assert!(Username::parse(raw).is_ok(), "{raw} should parse");
        }
    }

    #[test]
    fn trims_and_reparses_to_itself() {
        let once = Username::parse("  alice1  ").unwrap();
        assert_eq!(once.as_str(), "alice1");
        assert_eq!(Username::parse(once.as_str()).unwrap(), once);
    }

    #[test]
    fn rejects_length_violations() {
        assert_eq!(Username::parse("ab"), Err(UsernameError::TooShort));
        assert_eq!(
            Username::parse(&"a".repeat(31)),
            Err(UsernameError::TooLong)
        );
    }

    #[test]
    fn rejects_embedded_spaces() {
        assert_eq!(Username::parse("ali ce"), Err(UsernameError::ContainsSpaces));
    }

    #[test]
    fn rejects_charset_violations() {
        for raw in ["ali.ce", "ali@ce", "alicé1"] {
            assert_eq!(
                Username::parse(raw),
                Err(UsernameError::InvalidCharacters),
                "{raw}"
            );
        }
    }

    #[test]
    fn rejects_bad_edges() {
        for raw in ["-alice", "alice-", "_alice", "alice_"] {
            assert_eq!(Username::parse(raw), Err(UsernameError::BadEdge), "{raw}");
        }
    }

    #[test]
    fn rejects_all_digits() {
        assert_eq!(Username::parse("123456"), Err(UsernameError::AllDigits));
    }
}
