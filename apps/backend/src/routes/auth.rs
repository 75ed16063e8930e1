use std::time::SystemTime;

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::auth::credentials::Credentials;
use crate::auth::login::login as login_with;
use crate::error::AppError;
use crate::extractors::{CurrentUser, ValidatedJson};
use crate::infra::db::require_db;
use crate::middleware::JwtExtract;
use crate::repos::users::UserDirectory;
use crate::state::app_state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
}

/// Exchange a name and password for a bearer token.
async fn login(
    body: ValidatedJson<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let credentials = Credentials::new(body.name, body.password);

    let db = require_db(&app_state)?;
    let outcome = login_with(
        &credentials,
        &UserDirectory::new(db),
        &app_state.security,
        SystemTime::now(),
    )
    .await?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        token: outcome.token,
        user_id: outcome.subject_id,
    }))
}

/// Echo the caller's claims.
async fn token_claims(current_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(current_user)
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users/login").route(web::post().to(login)));
    cfg.service(
        web::resource("/users/token")
            .wrap(JwtExtract)
            .route(web::get().to(token_claims)),
    );
}
