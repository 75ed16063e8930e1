#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod auth;
pub mod config;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::{
    AuthenticatedIdentity, AuthenticationError, ClaimSet, Credentials, DigestScheme,
    IdentityLookup, LoginOutcome, StoredIdentity, TokenError,
};
pub use config::db::db_url;
pub use config::ServerConfig;
pub use error::AppError;
pub use extractors::CurrentUser;
pub use infra::db::{bootstrap_db, connect_db, require_db};
pub use infra::state::build_state;
pub use middleware::{cors_middleware, JwtExtract, RequestTrace, StructuredLogger, TraceSpan};
pub use repos::users::UserDirectory;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::logging::init();
}
