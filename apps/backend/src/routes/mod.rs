use actix_web::web;

pub mod health;
pub mod players;
pub mod realtime;

/// Register every route. `main.rs` and the HTTP tests share this so both
/// see the same paths.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Player routes: /api/players/**
    cfg.service(web::scope("/api/players").configure(players::configure_routes));

    // Websocket upgrade: /ws
    cfg.configure(realtime::configure_routes);
}
