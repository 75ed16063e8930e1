use actix_web::{web, App, HttpServer};
use tracing::{error, info};
use users_backend::config::db::db_url;
use users_backend::config::ServerConfig;
use users_backend::infra::state::build_state;
use users_backend::middleware::{
    cors_middleware, RequestTrace, StructuredLogger, TraceSpan,
};
use users_backend::routes;
use users_backend::state::security_config::SecurityConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    users_backend::telemetry::init_tracing();

    // Configuration comes from the process environment only
    let server_config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid server configuration");
            std::process::exit(1);
        }
    };
    let security_config = match SecurityConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid security configuration");
            std::process::exit(1);
        }
    };
    let database_url = match db_url() {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "invalid database configuration");
            std::process::exit(1);
        }
    };

    let app_state = match build_state(security_config)
        .with_db(database_url)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let data = web::Data::new(app_state);
    let allowed_origins = server_config.allowed_origins.clone();

    info!(
        host = %server_config.host,
        port = server_config.port,
        "starting users backend"
    );

    HttpServer::new(move || {
        // Last registered runs first: RequestTrace opens the trace scope for the rest.
        App::new()
            .wrap(TraceSpan)
            .wrap(StructuredLogger)
            .wrap(cors_middleware(&allowed_origins))
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind(server_config.bind_addr())?
    .run()
    .await
}
