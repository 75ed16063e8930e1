//! User repository functions for domain layer (generic over ConnectionTrait).

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use serde::Serialize;

use crate::adapters::users_sea as users_adapter;
use crate::auth::credentials::StoredIdentity;
use crate::auth::login::IdentityLookup;
use crate::errors::domain::DomainError;

pub use users_adapter::{UserCreate, UserUpdate};

/// User domain model. The digest never leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub gender: Option<String>,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub is_admin: bool,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: time::OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: time::OffsetDateTime,
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_id(conn, user_id).await?;
    Ok(user.map(User::from))
}

pub async fn find_user_by_name<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::find_user_by_name(conn, name).await?;
    Ok(user.map(User::from))
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Vec<User>, DomainError> {
    let users = users_adapter::list_users(conn).await?;
    Ok(users.into_iter().map(User::from).collect())
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    let user = users_adapter::create_user(conn, dto).await?;
    Ok(User::from(user))
}

pub async fn update_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    dto: UserUpdate,
) -> Result<Option<User>, DomainError> {
    let user = users_adapter::update_user(conn, user_id, dto).await?;
    Ok(user.map(User::from))
}

impl From<crate::entities::users::Model> for User {
    fn from(model: crate::entities::users::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            gender: model.gender,
            password_digest: model.password_digest,
            is_admin: model.is_admin,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<User> for StoredIdentity {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            identifier: user.name,
            secret_digest: user.password_digest,
            is_privileged: user.is_admin,
            is_active: user.is_active,
        }
    }
}

/// The users table seen as an identity directory for login.
pub struct UserDirectory<'c, C> {
    conn: &'c C,
}

impl<'c, C> UserDirectory<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl<C> IdentityLookup for UserDirectory<'_, C>
where
    C: ConnectionTrait + Send + Sync,
{
    async fn find_by_identifier(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredIdentity>, DomainError> {
        Ok(find_user_by_name(self.conn, identifier)
            .await?
            .map(StoredIdentity::from))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoredIdentity>, DomainError> {
        Ok(find_user_by_id(self.conn, id)
            .await?
            .map(StoredIdentity::from))
    }
}
