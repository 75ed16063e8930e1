//! Token payloads and the identity the middleware attaches to requests.

use serde::{Deserialize, Serialize};

/// Claims carried inside an access token.
///
/// Wire names are fixed (`user_id`, `admin`, `iat`, `exp`); unknown claims
/// make the token malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimSet {
    #[serde(rename = "user_id")]
    pub subject_id: i64,
    #[serde(rename = "admin")]
    pub is_privileged: bool,
    /// Issued-at (seconds since epoch)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

/// The caller behind a verified token, stored in request extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub subject_id: i64,
    pub is_privileged: bool,
}

impl From<&ClaimSet> for AuthenticatedIdentity {
    fn from(claims: &ClaimSet) -> Self {
        Self {
            subject_id: claims.subject_id,
            is_privileged: claims.is_privileged,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_with_wire_names() {
        let claims = ClaimSet {
            subject_id: 7,
            is_privileged: true,
            issued_at: 100,
            expires_at: 200,
        };
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(
            value,
            json!({ "user_id": 7, "admin": true, "iat": 100, "exp": 200 })
        );
    }

    #[test]
    fn rejects_unknown_and_missing_fields() {
        let extra = json!({ "user_id": 7, "admin": false, "iat": 1, "exp": 2, "role": "root" });
        assert!(serde_json::from_value::<ClaimSet>(extra).is_err());

        let missing = json!({ "user_id": 7, "iat": 1, "exp": 2 });
        assert!(serde_json::from_value::<ClaimSet>(missing).is_err());
    }
}
