use actix_cors::Cors;
use actix_web::http::header;

const DEV_FALLBACK_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://127.0.0.1:3000"];

/// Keep only origins that look like http(s) URLs; drop blanks and `null`.
pub fn sanitize_origins<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw.into_iter()
        .map(|s| s.as_ref().trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty() && s != "null")
        .filter(|s| s.starts_with("http://") || s.starts_with("https://"))
        .collect()
}

/// CORS for the API. The browser may send `Authorization` and read
/// `x-trace-id`; credentials travel in the header, never cookies.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut origins = sanitize_origins(allowed_origins);
    if origins.is_empty() {
        origins = DEV_FALLBACK_ORIGINS.iter().map(|s| s.to_string()).collect();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-trace-id"),
            header::WWW_AUTHENTICATE,
            header::RETRY_AFTER,
        ])
        .max_age(3600);

    for origin in &origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
