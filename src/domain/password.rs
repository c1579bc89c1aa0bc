//! Password value object and strength engine.
//!
//! Two construction paths: from plaintext (policy check, strength metrics,
//! bcrypt hash) or from a stored hash (rehydration, no metrics). The
//! plaintext is discarded after hashing and can only be checked again
//! through the one-way `verify`.

use std::collections::HashSet;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::config::{BCRYPT_MAX_PASSWORD_BYTES, CRACK_ATTEMPTS_PER_SECOND};

/// Password construction failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password is too common")]
    TooCommon,

    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// Strength category derived from estimated entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, ToSchema)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    /// Categorize an entropy estimate in bits.
    pub fn from_entropy(entropy_bits: f64) -> Self {
        if entropy_bits < 40.0 {
            PasswordStrength::VeryWeak
        } else if entropy_bits < 60.0 {
            PasswordStrength::Weak
        } else if entropy_bits < 80.0 {
            PasswordStrength::Moderate
        } else if entropy_bits < 100.0 {
            PasswordStrength::Strong
        } else {
            PasswordStrength::VeryStrong
        }
    }
}

impl std::fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            PasswordStrength::VeryWeak => "Very Weak",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Moderate => "Moderate",
            PasswordStrength::Strong => "Strong",
            PasswordStrength::VeryStrong => "Very Strong",
        };
        f.write_str(label)
    }
}

/// Entropy, category and crack-time estimate for a plaintext.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthReport {
    pub entropy_bits: f64,
    pub category: PasswordStrength,
    pub estimated_crack_seconds: f64,
}

impl StrengthReport {
    /// Evaluate a plaintext.
    ///
    /// Pool size is the sum of the character classes present (26 lowercase,
    /// 26 uppercase, 10 digits, 32 symbols); entropy is `log2(pool^length)`,
    /// zero when the pool is empty. The crack-time estimate assumes an
    /// attacker at 100 billion guesses per second.
    pub fn evaluate(plaintext: &str) -> Self {
        let pool = character_pool_size(plaintext);
        let entropy_bits = if pool == 0 {
            0.0
        } else {
            plaintext.chars().count() as f64 * (pool as f64).log2()
        };

        Self {
            entropy_bits,
            category: PasswordStrength::from_entropy(entropy_bits),
            estimated_crack_seconds: entropy_bits.exp2() / CRACK_ATTEMPTS_PER_SECOND,
        }
    }
}

fn character_pool_size(plaintext: &str) -> u32 {
    let mut pool = 0;
    if plaintext.chars().any(|c| c.is_ascii_lowercase()) {
        pool += 26;
    }
    if plaintext.chars().any(|c| c.is_ascii_uppercase()) {
        pool += 26;
    }
    if plaintext.chars().any(|c| c.is_ascii_digit()) {
        pool += 10;
    }
    if plaintext.chars().any(|c| !c.is_ascii_alphanumeric()) {
        pool += 32;
    }
    pool
}

/// Known-breached password set, loaded once at process start and injected
/// into the password engine. Read-only after construction.
#[derive(Debug, Default)]
pub struct CommonPasswords {
    entries: HashSet<String>,
}

impl CommonPasswords {
    /// Load the dataset from a CSV file (password in the second column,
    /// falling back to the whole line for single-column files).
    ///
    /// A missing or unreadable file degrades to an empty set: the
    /// dictionary check becomes a no-op rather than a startup failure.
    /// The tradeoff is logged, not hidden.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let entries: HashSet<String> = contents
                    .lines()
                    .filter_map(|line| {
                        let field = line.split(',').nth(1).unwrap_or(line).trim();
                        (!field.is_empty()).then(|| field.to_string())
                    })
                    .collect();
                tracing::info!(count = entries.len(), path = %path.display(), "Loaded common-password dataset");
                Self { entries }
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Common-password dataset unavailable; dictionary check disabled"
                );
                Self::default()
            }
        }
    }

    /// Build a set from explicit entries (tests, embedded datasets).
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: entries.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the plaintext appears in the dataset.
    pub fn contains(&self, plaintext: &str) -> bool {
        self.entries.contains(plaintext)
    }

    /// Number of loaded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no dataset was loaded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Password value object.
///
/// Holds the bcrypt hash and, when constructed from plaintext, the strength
/// metrics computed before hashing. Rehydrated passwords carry no metrics.
#[derive(Clone)]
pub struct Password {
    hash: String,
    metrics: Option<StrengthReport>,
}

// Never expose the hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl Password {
    /// Create a password from plaintext.
    ///
    /// Rejects members of the common-password set, computes the strength
    /// report, then hashes with bcrypt at the given cost. Input longer than
    /// 72 bytes is truncated on a UTF-8 boundary before hashing; passwords
    /// differing only beyond that limit are indistinguishable.
    pub fn from_plaintext(
        plaintext: &str,
        deny_list: &CommonPasswords,
        cost: u32,
    ) -> Result<Self, PasswordError> {
        if deny_list.contains(plaintext) {
            return Err(PasswordError::TooCommon);
        }

        let metrics = StrengthReport::evaluate(plaintext);
        let hash = bcrypt::hash(truncate_utf8(plaintext, BCRYPT_MAX_PASSWORD_BYTES), cost)
            .map_err(|e| PasswordError::Hash(e.to_string()))?;

        Ok(Self {
            hash,
            metrics: Some(metrics),
        })
    }

    /// Rehydrate a password from a stored hash. No plaintext-derived fields
    /// are available on this path.
    pub fn from_hash(hash: String) -> Self {
        Self {
            hash,
            metrics: None,
        }
    }

    /// Verify a plaintext against the stored hash.
    ///
    /// Applies the same 72-byte truncation as hashing; the underlying
    /// comparison is constant-time.
    pub fn verify(&self, plaintext: &str) -> bool {
        bcrypt::verify(truncate_utf8(plaintext, BCRYPT_MAX_PASSWORD_BYTES), &self.hash)
            .unwrap_or(false)
    }

    /// The stored hash, for persistence.
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_hash(self) -> String {
        self.hash
    }

    /// Strength metrics; `None` for rehydrated passwords.
    pub fn metrics(&self) -> Option<&StrengthReport> {
        self.metrics.as_ref()
    }
}

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Password {}

/// Truncate to at most `max_bytes`, never splitting a multi-byte sequence.
fn truncate_utf8(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the hashing tests fast
    const TEST_COST: u32 = 4;

    fn no_deny() -> CommonPasswords {
        CommonPasswords::default()
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let password =
            Password::from_plaintext("Abcdef12", &no_deny(), TEST_COST).unwrap();

        assert!(password.verify("Abcdef12"));
        assert!(!password.verify("Abcdef12x"));
    }

    #[test]
    fn rehydrated_password_verifies() {
        let password = Password::from_plaintext("Abcdef12", &no_deny(), TEST_COST).unwrap();
        let hash = password.hash().to_string();

        let restored = Password::from_hash(hash);
        assert!(restored.verify("Abcdef12"));
        assert!(restored.metrics().is_none());
    }

    #[test]
    fn same_password_different_salts() {
        let p1 = Password::from_plaintext("Abcdef12", &no_deny(), TEST_COST).unwrap();
        let p2 = Password::from_plaintext("Abcdef12", &no_deny(), TEST_COST).unwrap();

        assert_ne!(p1.hash(), p2.hash());
        assert!(p1.verify("Abcdef12"));
        assert!(p2.verify("Abcdef12"));
    }

    #[test]
    fn rejects_common_passwords() {
        let deny = CommonPasswords::from_entries(["123456", "password"]);
        let result = Password::from_plaintext("123456", &deny, TEST_COST);
        assert_eq!(result.unwrap_err(), PasswordError::TooCommon);
    }

    #[test]
    fn long_passwords_match_beyond_limit() {
        // 80 bytes of input; everything past byte 72 is ignored
        let base = "a".repeat(80);
        let mut other = base[..72].to_string();
        other.push_str("DIFFERENT");

        let password = Password::from_plaintext(&base, &no_deny(), TEST_COST).unwrap();
        assert!(password.verify(&other));
    }

    #[test]
    fn truncation_respects_utf8_boundaries() {
        // 24 three-byte characters = 72 bytes, then one more lands on the cut
        let s = "\u{20AC}".repeat(25);
        let cut = truncate_utf8(&s, 72);
        assert_eq!(cut.len(), 72);
        assert!(cut.chars().all(|c| c == '\u{20AC}'));
    }

    #[test]
    fn debug_redacts_hash() {
        let password = Password::from_plaintext("Abcdef12", &no_deny(), TEST_COST).unwrap();
        let rendered = format!("{:?}", password);
        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(password.hash()));
    }

    #[test]
    fn entropy_empty_string_is_zero() {
        let report = StrengthReport::evaluate("");
        assert_eq!(report.entropy_bits, 0.0);
        assert_eq!(report.category, PasswordStrength::VeryWeak);
    }

    #[test]
    fn entropy_grows_with_length_for_fixed_classes() {
        let short = StrengthReport::evaluate("aA1!");
        let long = StrengthReport::evaluate("aA1!aA1!");
        assert!(short.entropy_bits < long.entropy_bits);
        // Doubling length doubles entropy for the same pool
        assert!((long.entropy_bits - 2.0 * short.entropy_bits).abs() < 1e-9);
    }

    #[test]
    fn pool_size_accumulates_classes() {
        assert_eq!(character_pool_size("abc"), 26);
        assert_eq!(character_pool_size("abcABC"), 52);
        assert_eq!(character_pool_size("abcABC123"), 62);
        assert_eq!(character_pool_size("abcABC123!"), 94);
    }

    #[test]
    fn strength_category_thresholds() {
        assert_eq!(PasswordStrength::from_entropy(39.9), PasswordStrength::VeryWeak);
        assert_eq!(PasswordStrength::from_entropy(40.0), PasswordStrength::Weak);
        assert_eq!(PasswordStrength::from_entropy(60.0), PasswordStrength::Moderate);
        assert_eq!(PasswordStrength::from_entropy(80.0), PasswordStrength::Strong);
        assert_eq!(PasswordStrength::from_entropy(100.0), PasswordStrength::VeryStrong);
    }

    #[test]
    fn crack_time_scales_with_entropy() {
        // 8 chars over the full 94-char pool: ~52.4 bits
        let report = StrengthReport::evaluate("aA1!aA1!");
        let expected = report.entropy_bits.exp2() / 1e11;
        assert!((report.estimated_crack_seconds - expected).abs() < 1e-6);
    }

    #[test]
    fn missing_dataset_degrades_to_noop() {
        let deny = CommonPasswords::load("/nonexistent/path/passwords.csv");
        assert!(deny.is_empty());
        assert!(!deny.contains("123456"));
    }

    #[test]
    fn dataset_parses_csv_second_column() {
        let deny = CommonPasswords::from_entries(["123456"]);
        assert_eq!(deny.len(), 1);
        assert!(deny.contains("123456"));
        assert!(!deny.contains("1234567"));
    }
}
