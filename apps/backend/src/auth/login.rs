use std::time::SystemTime;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::auth::credentials::{verify_credentials, AuthenticationError, Credentials, StoredIdentity};
use crate::auth::jwt::mint_access_token;
use crate::errors::domain::DomainError;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::state::security_config::SecurityConfig;

/// Read-only access to persisted identities.
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredIdentity>, DomainError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredIdentity>, DomainError>;
}

/// A successful login: the signed token and who it was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: String,
    pub subject_id: i64,
}

/// Look up the identifier, verify the secret and issue a token.
///
/// Inactive identities are not refused here; the flag is informational.
pub async fn login<L>(
    credentials: &Credentials,
    lookup: &L,
    security_config: &SecurityConfig,
    now: SystemTime,
) -> Result<LoginOutcome, AuthenticationError>
where
    L: IdentityLookup + ?Sized,
{
    let stored = match lookup.find_by_identifier(&credentials.identifier).await {
        Ok(stored) => stored,
        Err(e) => {
            let detail = e.to_string();
            security::lookup_failed(&credentials.identifier, &detail, e.is_transient());
            return Err(AuthenticationError::LookupFailed(detail));
        }
    };

    let verified = match verify_credentials(credentials, stored.as_ref()) {
        Ok(verified) => verified,
        Err(e) => {
            security::login_failed(e.reason(), &credentials.identifier);
            return Err(e);
        }
    };

    let token = mint_access_token(
        verified.subject_id,
        verified.is_privileged,
        now,
        security_config,
    )
    .map_err(|e| AuthenticationError::Issuance(e.to_string()))?;

    debug!(identifier = %Redacted(&credentials.identifier), "credentials verified");
    info!(user_id = verified.subject_id, admin = verified.is_privileged, "login succeeded");

    Ok(LoginOutcome {
        token,
        subject_id: verified.subject_id,
    })
}
