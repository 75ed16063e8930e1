use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode as jwt_decode, encode, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::auth::claims::ClaimSet;
use crate::state::security_config::SecurityConfig;
use crate::AppError;

/// Why a presented token was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not three base64url segments of the expected JSON, including a
    /// signature segment that is not canonical base64url.
    #[error("token is malformed")]
    Malformed,
    /// Well-formed, but the decoded signature bytes do not match the HMAC of
    /// header and claims.
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Short reason for security logs.
    pub fn reason(&self) -> &'static str {
        match self {
            TokenError::Malformed => "malformed",
            TokenError::BadSignature => "bad_signature",
            TokenError::Expired => "expired",
        }
    }
}

/// Every token failure looks the same to the client.
impl From<TokenError> for AppError {
    fn from(_: TokenError) -> Self {
        AppError::unauthorized()
    }
}

/// Sign `claims` with the configured HMAC secret.
pub fn issue(claims: &ClaimSet, security: &SecurityConfig) -> Result<String, AppError> {
    if claims.expires_at <= claims.issued_at {
        return Err(AppError::internal(format!(
            "refusing to sign token with exp {} <= iat {}",
            claims.expires_at, claims.issued_at
        )));
    }

    encode(
        &Header::new(security.algorithm),
        claims,
        &EncodingKey::from_secret(&security.jwt_secret),
    )
    .map_err(|e| AppError::internal(format!("Failed to encode JWT: {e}")))
}

/// Verify signature and expiry, then return the claims.
///
/// A token is expired once the current time is past `exp`; no leeway.
pub fn decode(token: &str, security: &SecurityConfig) -> Result<ClaimSet, TokenError> {
    let mut validation = Validation::new(security.algorithm);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp"]);

    jwt_decode::<ClaimSet>(
        token,
        &DecodingKey::from_secret(&security.jwt_secret),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        _ => TokenError::Malformed,
    })
}

/// Build and sign claims for `subject_id`, valid for the configured TTL from `now`.
pub fn mint_access_token(
    subject_id: i64,
    is_privileged: bool,
    now: SystemTime,
    security: &SecurityConfig,
) -> Result<String, AppError> {
    let issued_at = now
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|since_epoch| i64::try_from(since_epoch.as_secs()).ok())
        .ok_or_else(|| AppError::internal("Current time is outside the token range"))?;
    let expires_at = i64::try_from(security.token_ttl.as_secs())
        .ok()
        .and_then(|ttl| issued_at.checked_add(ttl))
        .ok_or_else(|| AppError::internal("Token lifetime overflows the expiry claim"))?;

    let claims = ClaimSet {
        subject_id,
        is_privileged,
        issued_at,
        expires_at,
    };
    issue(&claims, security)
}
