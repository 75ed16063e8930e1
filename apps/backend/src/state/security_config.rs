use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::auth::digest::DigestScheme;
use crate::error::AppError;

/// Default validity window for issued tokens.
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(60 * 60);

/// Longest validity window accepted from configuration.
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Process-wide signing and credential settings.
///
/// Built once at startup and shared read-only through `web::Data<AppState>`;
/// nothing mutates it afterwards, so concurrent requests read it without locks.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    /// Symmetric key for signing and verifying tokens
    pub jwt_secret: Vec<u8>,
    /// Pinned signing algorithm (HS256)
    pub algorithm: Algorithm,
    /// Validity window stamped into tokens at login
    pub token_ttl: Duration,
    /// Digest applied to newly stored secrets
    pub digest_scheme: DigestScheme,
}

impl SecurityConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            algorithm: Algorithm::HS256,
            token_ttl: DEFAULT_TOKEN_TTL,
            digest_scheme: DigestScheme::default(),
        }
    }

    pub fn with_token_ttl(mut self, token_ttl: Duration) -> Self {
        self.token_ttl = token_ttl;
        self
    }

    pub fn with_digest_scheme(mut self, digest_scheme: DigestScheme) -> Self {
        self.digest_scheme = digest_scheme;
        self
    }

    /// Load from `BACKEND_JWT_SECRET`, `BACKEND_TOKEN_TTL_SECS` and
    /// `BACKEND_PASSWORD_SCHEME`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = env::var("BACKEND_JWT_SECRET")
            .map_err(|_| AppError::config("BACKEND_JWT_SECRET must be set"))?;
        if secret.trim().is_empty() {
            return Err(AppError::config("BACKEND_JWT_SECRET must not be empty"));
        }

        let token_ttl = match env::var("BACKEND_TOKEN_TTL_SECS") {
            Ok(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::config(format!("BACKEND_TOKEN_TTL_SECS is not a number: '{raw}'"))
                })?;
                if secs == 0 {
                    return Err(AppError::config("BACKEND_TOKEN_TTL_SECS must be positive"));
                }
                if secs > MAX_TOKEN_TTL.as_secs() {
                    return Err(AppError::config(format!(
                        "BACKEND_TOKEN_TTL_SECS must be at most {} (one year)",
                        MAX_TOKEN_TTL.as_secs()
                    )));
                }
                Duration::from_secs(secs)
            }
            Err(_) => DEFAULT_TOKEN_TTL,
        };

        let digest_scheme = match env::var("BACKEND_PASSWORD_SCHEME") {
            Ok(raw) => raw.parse::<DigestScheme>()?,
            Err(_) => DigestScheme::default(),
        };

        Ok(Self::new(secret.into_bytes())
            .with_token_ttl(token_ttl)
            .with_digest_scheme(digest_scheme))
    }

    /// Fixed secret for tests that don't care about the key.
    pub fn for_tests() -> Self {
        Self::new(b"test_secret_key_for_testing_purposes_only".to_vec())
    }
}

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    fn clear_env() {
        env::remove_var("BACKEND_JWT_SECRET");
        env::remove_var("BACKEND_TOKEN_TTL_SECS");
        env::remove_var("BACKEND_PASSWORD_SCHEME");
    }

    #[test]
    #[serial]
    fn from_env_requires_secret() {
        clear_env();
        assert!(matches!(
            SecurityConfig::from_env(),
            Err(AppError::Config { .. })
        ));

        env::set_var("BACKEND_JWT_SECRET", "   ");
        assert!(matches!(
            SecurityConfig::from_env(),
            Err(AppError::Config { .. })
        ));
        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_applies_defaults() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "s3cret");

        let config = SecurityConfig::from_env().unwrap();
        assert_eq!(config.jwt_secret, b"s3cret".to_vec());
        assert_eq!(config.algorithm, Algorithm::HS256);
        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.digest_scheme, DigestScheme::Argon2id);
        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_reads_ttl_and_scheme() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "s3cret");
        env::set_var("BACKEND_TOKEN_TTL_SECS", "120");
        env::set_var("BACKEND_PASSWORD_SCHEME", "md5");

        let config = SecurityConfig::from_env().unwrap();
        assert_eq!(config.token_ttl, Duration::from_secs(120));
        assert_eq!(config.digest_scheme, DigestScheme::LegacyMd5);

        env::set_var("BACKEND_TOKEN_TTL_SECS", "0");
        assert!(SecurityConfig::from_env().is_err());
        env::set_var("BACKEND_TOKEN_TTL_SECS", "soon");
        assert!(SecurityConfig::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn from_env_caps_ttl_at_one_year() {
        clear_env();
        env::set_var("BACKEND_JWT_SECRET", "s3cret");

        env::set_var("BACKEND_TOKEN_TTL_SECS", MAX_TOKEN_TTL.as_secs().to_string());
        assert_eq!(SecurityConfig::from_env().unwrap().token_ttl, MAX_TOKEN_TTL);

        env::set_var(
            "BACKEND_TOKEN_TTL_SECS",
            (MAX_TOKEN_TTL.as_secs() + 1).to_string(),
        );
        assert!(matches!(
            SecurityConfig::from_env(),
            Err(AppError::Config { .. })
        ));

        env::set_var("BACKEND_TOKEN_TTL_SECS", (u64::MAX / 2).to_string());
        assert!(SecurityConfig::from_env().is_err());
        clear_env();
    }
}
