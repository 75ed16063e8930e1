//! One-way digests of user secrets.
//!
//! [`digest`] is the legacy MD5 hex transform that existing rows were written
//! with. New secrets are stored with the configured [`DigestScheme`], Argon2id
//! unless overridden. [`matches`] recognises both formats, so switching the
//! scheme never locks out users stored under the old one.

use std::str::FromStr;
use std::sync::LazyLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use md5::{Digest, Md5};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

use crate::error::AppError;

/// PHC prefix shared by every Argon2 variant.
const ARGON2_PREFIX: &str = "$argon2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DigestScheme {
    /// Unsalted MD5, lowercase hex. Fast and weak; kept for compatibility.
    LegacyMd5,
    /// Salted, memory-hard; PHC string output.
    #[default]
    Argon2id,
}

impl FromStr for DigestScheme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "md5" | "legacy-md5" => Ok(Self::LegacyMd5),
            "argon2" | "argon2id" => Ok(Self::Argon2id),
            other => Err(AppError::config(format!(
                "unknown password scheme '{other}' (expected 'argon2id' or 'md5')"
            ))),
        }
    }
}

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("failed to hash secret: {0}")]
    Hashing(String),
}

impl From<DigestError> for AppError {
    fn from(err: DigestError) -> Self {
        AppError::internal(err.to_string())
    }
}

/// Legacy digest: MD5 of the UTF-8 bytes, lowercase hex. Deterministic.
pub fn digest(secret: &str) -> String {
    hex::encode(Md5::digest(secret.as_bytes()))
}

impl DigestScheme {
    /// Produce the stored form of `secret` under this scheme.
    pub fn hash(self, secret: &str) -> Result<String, DigestError> {
        match self {
            Self::LegacyMd5 => Ok(digest(secret)),
            Self::Argon2id => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(secret.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
                    .map_err(|e| DigestError::Hashing(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
thread_local! {
    static ARGON2_VERIFICATIONS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Argon2 verifications run on this thread so far.
#[cfg(test)]
pub(crate) fn argon2_verifications() -> usize {
    ARGON2_VERIFICATIONS.with(std::cell::Cell::get)
}

fn argon2_verify(secret: &str, parsed: &PasswordHash<'_>) -> bool {
    #[cfg(test)]
    ARGON2_VERIFICATIONS.with(|n| n.set(n.get() + 1));
    Argon2::default()
        .verify_password(secret.as_bytes(), parsed)
        .is_ok()
}

/// Does `secret` correspond to `stored_digest`?
///
/// Argon2 PHC strings are verified by Argon2 itself. Anything else is treated
/// as a legacy MD5 hex digest and compared in constant time. Every call runs
/// exactly one Argon2 verification, whatever the stored format, so a wrong
/// secret costs the same as an unknown identifier.
pub fn matches(secret: &str, stored_digest: &str) -> bool {
    if stored_digest.starts_with(ARGON2_PREFIX) {
        return match PasswordHash::new(stored_digest) {
            Ok(parsed) => argon2_verify(secret, &parsed),
            Err(e) => {
                warn!(error = %e, "stored Argon2 digest is not a valid PHC string");
                burn_verification(secret);
                false
            }
        };
    }

    let computed = digest(secret);
    let stored = stored_digest.trim().to_ascii_lowercase();
    let legacy_match: bool = computed.as_bytes().ct_eq(stored.as_bytes()).into();
    burn_verification(secret);
    legacy_match
}

static DUMMY_DIGEST: LazyLock<Option<String>> =
    LazyLock::new(|| DigestScheme::Argon2id.hash("dummy-secret-for-timing").ok());

/// Run one Argon2 verification against a fixed dummy digest.
///
/// Used wherever no real Argon2 digest is checked (unknown identifier, legacy
/// rows) so every credential check pays the same cost.
pub fn burn_verification(secret: &str) {
    if let Some(parsed) = DUMMY_DIGEST
        .as_deref()
        .and_then(|dummy| PasswordHash::new(dummy).ok())
    {
        let _ = argon2_verify(secret, &parsed);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn legacy_digest_of_pwd_is_known_md5() {
        assert_eq!(digest("pwd"), "3bb102e7f33d7274cc17cbdba1c43b29");
        assert_eq!(digest(""), "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn legacy_match_accepts_uppercase_hex() {
        assert!(matches("pwd", "3BB102E7F33D7274CC17CBDBA1C43B29"));
        assert!(!matches("pwd", "3bb102e7"));
        assert!(!matches("wrong", "3bb102e7f33d7274cc17cbdba1c43b29"));
    }

    #[test]
    fn argon2_digest_is_salted_and_verifies() {
        let first = DigestScheme::Argon2id.hash("pwd").unwrap();
        let second = DigestScheme::Argon2id.hash("pwd").unwrap();

        assert!(first.starts_with("$argon2id$"));
        assert_ne!(first, second);
        assert!(matches("pwd", &first));
        assert!(matches("pwd", &second));
        assert!(!matches("Pwd", &first));
    }

    #[test]
    fn corrupt_phc_string_never_matches() {
        assert!(!matches("pwd", "$argon2id$garbage"));
    }

    #[test]
    fn scheme_parses_from_config_values() {
        assert_eq!("md5".parse::<DigestScheme>().unwrap(), DigestScheme::LegacyMd5);
        assert_eq!(" Argon2id ".parse::<DigestScheme>().unwrap(), DigestScheme::Argon2id);
        assert!("bcrypt".parse::<DigestScheme>().is_err());
    }

    #[test]
    fn burn_verification_does_not_panic_on_any_input() {
        burn_verification("");
        burn_verification("anything");
    }

    fn argon2_work(check: impl FnOnce()) -> usize {
        let before = argon2_verifications();
        check();
        argon2_verifications() - before
    }

    #[test]
    fn every_stored_format_costs_one_argon2_verification() {
        let legacy = digest("pwd");
        let modern = DigestScheme::Argon2id.hash("pwd").unwrap();

        assert_eq!(argon2_work(|| assert!(matches("pwd", &legacy))), 1);
        assert_eq!(argon2_work(|| assert!(!matches("wrong", &legacy))), 1);
        assert_eq!(argon2_work(|| assert!(!matches("wrong", &modern))), 1);
        assert_eq!(argon2_work(|| assert!(!matches("wrong", "$argon2id$garbage"))), 1);
        assert_eq!(argon2_work(|| burn_verification("wrong")), 1);
    }

    proptest! {
        #[test]
        fn legacy_digest_is_deterministic(secret in ".*") {
            prop_assert_eq!(digest(&secret), digest(&secret));
            prop_assert_eq!(digest(&secret).len(), 32);
            prop_assert!(matches(&secret, &digest(&secret)));
        }
    }
}
