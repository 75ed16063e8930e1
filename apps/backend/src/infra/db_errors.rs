//! `sea_orm::DbErr` to [`DomainError`] translation.
//!
//! Adapters return raw `DbErr`; repos lift it with `?` through the `From`
//! impl below. Raw driver text is logged (redacted) and never forwarded.

use sea_orm::DbErr;

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::redact;

const SQLITE_UNIQUE: &str = "UNIQUE constraint failed: ";
const USER_NAME_TAKEN: &str = "User name already registered";

/// Postgres names for the uniqueness guarantee on `users.name`.
const PG_USER_NAME_CONSTRAINTS: [&str; 2] = ["idx_users_name_unique", "users_name_key"];

#[derive(Debug, PartialEq, Eq)]
enum Failure<'m> {
    Missing,
    Unreachable,
    Unique { target: Option<&'m str> },
    Constraint,
    Timeout,
    Unknown,
}

fn has_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(&format!("SQLSTATE({code})")) || msg.contains(&format!("code: {code}"))
}

/// `users.name` out of `UNIQUE constraint failed: users.name`, or the
/// Postgres constraint name that matched.
fn unique_target(msg: &str) -> Option<&str> {
    if let Some(at) = msg.find(SQLITE_UNIQUE) {
        return msg[at + SQLITE_UNIQUE.len()..]
            .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
            .next()
            .filter(|s| !s.is_empty());
    }
    PG_USER_NAME_CONSTRAINTS
        .iter()
        .find(|name| msg.contains(*name))
        .copied()
}

fn classify<'m>(err: &DbErr, msg: &'m str) -> Failure<'m> {
    match err {
        DbErr::RecordNotFound(_) => return Failure::Missing,
        DbErr::ConnectionAcquire(_) | DbErr::Conn(_) => return Failure::Unreachable,
        _ => {}
    }

    if msg.contains("UNIQUE constraint failed")
        || msg.contains("duplicate key value violates unique constraint")
        || has_sqlstate(msg, "23505")
    {
        Failure::Unique {
            target: unique_target(msg),
        }
    } else if msg.contains("NOT NULL constraint failed")
        || has_sqlstate(msg, "23502")
        || has_sqlstate(msg, "23514")
    {
        Failure::Constraint
    } else if msg.contains("timed out") || msg.contains("timeout") {
        Failure::Timeout
    } else {
        Failure::Unknown
    }
}

/// Translate a `DbErr` into a `DomainError` whose detail is safe to show.
pub fn map_db_err(err: DbErr) -> DomainError {
    let raw = err.to_string();
    let failure = classify(&err, &raw);

    match failure {
        Failure::Missing => DomainError::not_found(NotFoundKind::Record, "Record not found"),
        Failure::Unreachable => {
            tracing::warn!(raw_error = %redact(&raw), "database unreachable");
            DomainError::infra(InfraErrorKind::Unavailable, "Database unavailable")
        }
        Failure::Unique { target } => {
            tracing::warn!(raw_error = %redact(&raw), "unique constraint violated");
            match target {
                Some("users.name") => DomainError::conflict(ConflictKind::UserName, USER_NAME_TAKEN),
                Some(t) if PG_USER_NAME_CONSTRAINTS.contains(&t) => {
                    DomainError::conflict(ConflictKind::UserName, USER_NAME_TAKEN)
                }
                _ => DomainError::conflict(ConflictKind::Unique, "Unique constraint violation"),
            }
        }
        Failure::Constraint => {
            tracing::warn!(raw_error = %redact(&raw), "constraint violated");
            DomainError::validation("Constraint violation")
        }
        Failure::Timeout => {
            tracing::warn!(raw_error = %redact(&raw), "database timeout");
            DomainError::infra(InfraErrorKind::Timeout, "Database timeout")
        }
        Failure::Unknown => {
            tracing::error!(raw_error = %redact(&raw), "unhandled database error");
            DomainError::infra(InfraErrorKind::Query, "Database operation failed")
        }
    }
}

impl From<DbErr> for DomainError {
    fn from(err: DbErr) -> Self {
        map_db_err(err)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::RuntimeErr;

    use super::*;

    #[test]
    fn sqlite_unique_on_name_is_user_name_conflict() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "error returned from database: (code: 2067) UNIQUE constraint failed: users.name"
                .into(),
        ));
        assert_eq!(
            map_db_err(err),
            DomainError::conflict(ConflictKind::UserName, USER_NAME_TAKEN)
        );
    }

    #[test]
    fn postgres_unique_index_is_user_name_conflict() {
        let err = DbErr::Query(RuntimeErr::Internal(
            "duplicate key value violates unique constraint \"idx_users_name_unique\"".into(),
        ));
        assert!(matches!(
            map_db_err(err),
            DomainError::Conflict(ConflictKind::UserName, _)
        ));
    }

    #[test]
    fn other_unique_violations_stay_generic() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: seaql_migrations.version".into(),
        ));
        assert!(matches!(
            map_db_err(err),
            DomainError::Conflict(ConflictKind::Unique, _)
        ));
    }

    #[test]
    fn not_null_violation_is_validation() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "NOT NULL constraint failed: users.password_digest".into(),
        ));
        assert!(matches!(map_db_err(err), DomainError::Validation(_)));
    }

    #[test]
    fn record_not_found_is_not_found() {
        assert!(matches!(
            map_db_err(DbErr::RecordNotFound("users".into())),
            DomainError::NotFound(NotFoundKind::Record, _)
        ));
    }

    #[test]
    fn unknown_errors_hide_raw_message() {
        let mapped = map_db_err(DbErr::Custom("syntax error at or near SELECT".into()));
        match mapped {
            DomainError::Infra(InfraErrorKind::Query, detail) => {
                assert!(!detail.contains("SELECT"))
            }
            other => panic!("expected infra error, got {other:?}"),
        }
    }

    #[test]
    fn unique_target_stops_at_delimiters() {
        assert_eq!(
            unique_target("UNIQUE constraint failed: users.name\n"),
            Some("users.name")
        );
        assert_eq!(unique_target("nothing here"), None);
    }
}
