use actix_web::web;

pub mod auth;
pub mod health;
pub mod users;

/// Register every route. Protected resources carry their own `JwtExtract`
/// wrapper, so the same configuration serves `main.rs` and tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    health::configure_routes(cfg);
    // Before users: fixed paths must win over `/users/{id}`.
    auth::configure_routes(cfg);
    users::configure_routes(cfg);
}
