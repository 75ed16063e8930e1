use actix_web::{guard, web, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::errors::ErrorCode;
use crate::extractors::{CurrentUser, UserId, ValidatedJson};
use crate::infra::db::require_db;
use crate::middleware::JwtExtract;
use crate::services::users::{self as user_service, NewUser, UserChanges};
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    pub password: String,
}

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub is_admin: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: Option<String>,
}

async fn create_user(
    body: ValidatedJson<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let db = require_db(&app_state)?;

    let user = user_service::create_user(
        db,
        NewUser {
            name: body.name,
            gender: body.gender,
            password: body.password,
        },
        app_state.security.digest_scheme,
    )
    .await?;

    Ok(HttpResponse::Created().json(user))
}

async fn list_users(
    _current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let users = user_service::list_users(db).await?;
    Ok(HttpResponse::Ok().json(users))
}

async fn get_user_by_name(
    _current_user: CurrentUser,
    query: web::Query<NameQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let name = query
        .into_inner()
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| {
            AppError::bad_request(ErrorCode::InvalidUserName, "Query parameter 'name' is required")
        })?;

    let db = require_db(&app_state)?;
    let user = user_service::get_user_by_name(db, &name).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn get_user_by_id(
    _current_user: CurrentUser,
    user_id: UserId,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let db = require_db(&app_state)?;
    let user = user_service::get_user_by_id(db, user_id.0).await?;
    Ok(HttpResponse::Ok().json(user))
}

async fn update_user(
    current_user: CurrentUser,
    body: ValidatedJson<UpdateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let db = require_db(&app_state)?;

    let user = user_service::update_user(
        db,
        &current_user.identity(),
        UserChanges {
            id: body.id,
            name: body.name,
            gender: body.gender,
            password: body.password,
            is_active: body.is_active,
            is_admin: body.is_admin,
        },
        app_state.security.digest_scheme,
    )
    .await?;

    Ok(HttpResponse::Ok().json(user))
}

/// Registration is public; everything else under `/users` needs a token.
///
/// Register after `auth::configure_routes` so `/users/login` and
/// `/users/token` are matched before `/users/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .guard(guard::Post())
            .route(web::post().to(create_user)),
    );
    cfg.service(
        web::resource("/users/all")
            .wrap(JwtExtract)
            .route(web::get().to(list_users)),
    );
    cfg.service(
        web::resource("/users")
            .wrap(JwtExtract)
            .route(web::get().to(get_user_by_name))
            .route(web::put().to(update_user)),
    );
    cfg.service(
        web::resource("/users/{id}")
            .wrap(JwtExtract)
            .route(web::get().to(get_user_by_id)),
    );
}
