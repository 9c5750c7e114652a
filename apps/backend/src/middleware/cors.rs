use actix_cors::Cors;
use actix_web::http::header;

/// CORS for the browser client: explicit origins from `ServerConfig`, the
/// methods the HTTP surface and the websocket upgrade use, and the trace
/// header exposed for support requests.
pub fn cors_middleware(allowed_origins: &[String]) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static("x-trace-id")])
        .max_age(3600);

    for origin in allowed_origins {
        cors = cors.allowed_origin(origin);
    }

    cors
}
