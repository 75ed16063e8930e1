//! Credential verification: does a presented secret match a stored identity?

use std::fmt;

use thiserror::Error;

use crate::auth::digest;
use crate::logging::pii::Redacted;
use crate::AppError;

/// What a caller presents at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &Redacted(&self.identifier))
            .field("secret", &"***")
            .finish()
    }
}

/// A persisted identity as seen by the verifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredIdentity {
    pub id: i64,
    pub identifier: String,
    pub secret_digest: String,
    pub is_privileged: bool,
    pub is_active: bool,
}

/// Identity proven by a successful verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub subject_id: i64,
    pub is_privileged: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("no identity with that identifier")]
    NotFound,
    #[error("secret does not match")]
    BadCredentials,
    #[error("identity lookup failed: {0}")]
    LookupFailed(String),
    #[error("token issuance failed: {0}")]
    Issuance(String),
}

impl AuthenticationError {
    /// Short reason for security logs.
    pub fn reason(&self) -> &'static str {
        match self {
            AuthenticationError::NotFound => "not_found",
            AuthenticationError::BadCredentials => "bad_credentials",
            AuthenticationError::LookupFailed(_) => "lookup_failed",
            AuthenticationError::Issuance(_) => "issuance_failed",
        }
    }
}

/// Unknown identifier, wrong secret and lookup failure are indistinguishable
/// to the client. Only a signing failure surfaces as a server error.
impl From<AuthenticationError> for AppError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::NotFound
            | AuthenticationError::BadCredentials
            | AuthenticationError::LookupFailed(_) => AppError::invalid_credentials(),
            AuthenticationError::Issuance(detail) => AppError::internal(detail),
        }
    }
}

/// Check `credentials` against the identity found for its identifier.
///
/// Pure apart from the digest work. When `stored` is `None` a dummy digest is
/// still verified so response time does not reveal whether the identifier
/// exists.
pub fn verify_credentials(
    credentials: &Credentials,
    stored: Option<&StoredIdentity>,
) -> Result<VerifiedIdentity, AuthenticationError> {
    let Some(identity) = stored else {
        digest::burn_verification(&credentials.secret);
        return Err(AuthenticationError::NotFound);
    };

    if !digest::matches(&credentials.secret, &identity.secret_digest) {
        return Err(AuthenticationError::BadCredentials);
    }

    Ok(VerifiedIdentity {
        subject_id: identity.id,
        is_privileged: identity.is_privileged,
    })
}
