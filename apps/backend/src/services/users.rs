//! User management on top of the users repo.

use sea_orm::ConnectionTrait;
use tracing::{info, warn};

use crate::auth::claims::AuthenticatedIdentity;
use crate::auth::digest::DigestScheme;
use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::logging::pii::Redacted;
use crate::repos::users::{self, User, UserCreate, UserUpdate};

const MAX_NAME_LEN: usize = 64;

/// Input for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub gender: Option<String>,
    pub password: String,
}

/// Requested changes to an existing user. `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub id: i64,
    pub name: Option<String>,
    pub gender: Option<String>,
    pub password: Option<String>,
    pub is_active: Option<bool>,
    pub is_admin: Option<bool>,
}

fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidUserName,
            "User name must not be empty",
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::invalid(
            ErrorCode::InvalidUserName,
            format!("User name must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(name.to_string())
}

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.is_empty() {
        return Err(AppError::invalid(
            ErrorCode::InvalidPassword,
            "Password must not be empty",
        ));
    }
    Ok(())
}

fn normalize_gender(raw: Option<String>) -> Option<String> {
    raw.map(|g| g.trim().to_string()).filter(|g| !g.is_empty())
}

fn user_not_found(id: i64) -> AppError {
    AppError::not_found(ErrorCode::UserNotFound, format!("User {id} not found"))
}

/// Register a regular, active user. The password is stored only as a digest.
pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    new_user: NewUser,
    scheme: DigestScheme,
) -> Result<User, AppError> {
    let name = normalize_name(&new_user.name)?;
    validate_password(&new_user.password)?;
    let digest = scheme.hash(&new_user.password)?;

    let dto = UserCreate::new(name, digest).with_gender(normalize_gender(new_user.gender));
    let user = users::create_user(conn, dto).await?;

    info!(user_id = user.id, name = %Redacted(&user.name), "user registered");
    Ok(user)
}

pub async fn get_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<User, AppError> {
    users::find_user_by_id(conn, id)
        .await?
        .ok_or_else(|| user_not_found(id))
}

pub async fn get_user_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<User, AppError> {
    users::find_user_by_name(conn, name.trim())
        .await?
        .ok_or_else(|| AppError::not_found(ErrorCode::UserNotFound, "User not found"))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<User>, AppError> {
    Ok(users::list_users(conn).await?)
}

/// Apply `changes` on behalf of `actor`.
///
/// Users may edit themselves; privileged users may edit anyone. Only a
/// privileged actor may change `is_admin`.
pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    actor: &AuthenticatedIdentity,
    changes: UserChanges,
    scheme: DigestScheme,
) -> Result<User, AppError> {
    if actor.subject_id != changes.id && !actor.is_privileged {
        warn!(
            actor_id = actor.subject_id,
            target_id = changes.id,
            "update of another user refused"
        );
        return Err(AppError::forbidden("You may only update your own account"));
    }
    if changes.is_admin.is_some() && !actor.is_privileged {
        return Err(AppError::forbidden(
            "Only administrators may change admin status",
        ));
    }

    let name = changes.name.as_deref().map(normalize_name).transpose()?;
    let password_digest = match changes.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(scheme.hash(password)?)
        }
        None => None,
    };

    let dto = UserUpdate {
        name,
        gender: normalize_gender(changes.gender),
        password_digest,
        is_admin: changes.is_admin,
        is_active: changes.is_active,
    };

    let user = users::update_user(conn, changes.id, dto)
        .await?
        .ok_or_else(|| user_not_found(changes.id))?;

    info!(user_id = user.id, actor_id = actor.subject_id, "user updated");
    Ok(user)
}
