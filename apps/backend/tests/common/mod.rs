#![allow(dead_code)]

// tests/common/mod.rs
pub mod proptest_prelude;

use actix_web::http::header::{HeaderValue, AUTHORIZATION};
use users_backend::auth::digest::digest;
use users_backend::infra::db::SQLITE_MEMORY_URL;
use users_backend::infra::state::build_state;
use users_backend::repos::users::{self, User, UserCreate, UserUpdate};
use users_backend::{AppState, SecurityConfig};

// Logging is auto-installed for every test binary
#[ctor::ctor]
fn init_logging() {
    backend_test_support::logging::init();
}

/// Initialise the full application (middleware stack + routes) over `$state`.
macro_rules! test_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(users_backend::TraceSpan)
                .wrap(users_backend::StructuredLogger)
                .wrap(users_backend::RequestTrace)
                .app_data(actix_web::web::Data::new($state))
                .configure(users_backend::routes::configure),
        )
    };
}
pub(crate) use test_app;

pub fn security() -> SecurityConfig {
    SecurityConfig::for_tests()
}

/// Fresh, migrated in-memory database behind an `AppState`.
pub async fn test_state() -> AppState {
    build_state(security())
        .with_db(SQLITE_MEMORY_URL)
        .build()
        .await
        .expect("in-memory state should build")
}

/// Insert a user whose secret is stored as a legacy MD5 digest.
pub async fn seed_user(state: &AppState, name: &str, password: &str, is_admin: bool) -> User {
    let db = state.db().expect("state should have a database");
    let user = users::create_user(db, UserCreate::new(name, digest(password)))
        .await
        .expect("seed user");

    if !is_admin {
        return user;
    }

    users::update_user(
        db,
        user.id,
        UserUpdate {
            is_admin: Some(true),
            ..UserUpdate::default()
        },
    )
    .await
    .expect("promote user")
    .expect("seeded user exists")
}

pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, HeaderValue) {
    (
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("token is header-safe"),
    )
}
