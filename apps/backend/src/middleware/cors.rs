use actix_cors::Cors;
use actix_web::http::header;

/// Origins allowed when `CORS_ALLOWED_ORIGINS` names none.
const DEFAULT_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Parse a comma-separated origin list, keeping only http(s) entries.
pub fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .map(|s| s.trim_end_matches('/').to_string())
        .collect()
}

/// Build CORS middleware for the configured origins.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let effective: Vec<&str> = if allowed_origins.is_empty() {
        DEFAULT_ORIGINS.to_vec()
    } else {
        allowed_origins.iter().map(String::as_str).collect()
    };

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ORIGIN,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::CONTENT_LENGTH,
        ])
        .supports_credentials()
        .max_age(3600);

    for origin in effective {
        cors = cors.allowed_origin(origin);
    }

    cors
}
