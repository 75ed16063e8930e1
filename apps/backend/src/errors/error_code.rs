//! Error codes for the users API.
//!
//! Every `code` that appears in a Problem Details body comes from this enum;
//! never pass ad-hoc strings as error codes.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Missing, malformed, expired or forged bearer token
    Unauthorized,
    /// Login failed; deliberately says nothing about why
    InvalidCredentials,
    /// Authenticated caller may not perform the operation
    Forbidden,

    // Request Validation
    InvalidUserId,
    InvalidUserName,
    InvalidPassword,
    ValidationError,
    BadRequest,

    // Resource Not Found
    UserNotFound,
    NotFound,

    // Conflicts
    UserNameTaken,
    Conflict,

    // System Errors
    DbError,
    DbUnavailable,
    Internal,
    ConfigError,
}

impl ErrorCode {
    /// The exact string that appears in HTTP responses.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",

            Self::InvalidUserId => "INVALID_USER_ID",
            Self::InvalidUserName => "INVALID_USER_NAME",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",

            Self::UserNotFound => "USER_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::UserNameTaken => "USER_NAME_TAKEN",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_codes_render_as_screaming_snake() {
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(ErrorCode::InvalidCredentials.as_str(), "INVALID_CREDENTIALS");
        assert_eq!(ErrorCode::Forbidden.as_str(), "FORBIDDEN");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", ErrorCode::UserNameTaken), "USER_NAME_TAKEN");
        assert_eq!(format!("{}", ErrorCode::InvalidUserId), "INVALID_USER_ID");
        assert_eq!(format!("{}", ErrorCode::DbUnavailable), "DB_UNAVAILABLE");
    }
}
