use actix_web::{web, App, HttpServer};
use backend::config::{GameConfig, ServerConfig, StoreConfig};
use backend::infra::state::build_state;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::middleware::trace_span::TraceSpan;
use backend::routes;
use tracing::{error, info};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Configuration comes from the process environment only:
    // - Docker: env_file / --env-file
    // - Local dev: source an env file first (set -a; . ./.env; set +a)
    let (server_config, game_config, store_config) = match (
        ServerConfig::from_env(),
        GameConfig::from_env(),
        StoreConfig::from_env(),
    ) {
        (Ok(server), Ok(game), Ok(store)) => (server, game, store),
        (server, game, store) => {
            for err in [server.err(), game.err(), store.err()].into_iter().flatten() {
                error!(error = %err, "invalid configuration");
            }
            std::process::exit(1);
        }
    };

    let app_state = match build_state()
        .with_game_config(game_config)
        .with_store_config(store_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            error!(error = %e, "failed to build application state");
            std::process::exit(1);
        }
    };

    let _sweeper = app_state.game_flow().spawn_sweeper();

    let (host, port) = server_config.bind_addr();
    info!(%host, port, store = app_state.store_name(), "starting server");

    let data = web::Data::new(app_state);
    let origins = server_config.allowed_origins.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&origins))
            .wrap(StructuredLogger)
            .wrap(TraceSpan)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
