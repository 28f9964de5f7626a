use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use thappy_api::config::Config;
use thappy_api::infra::db::connect_db;
use thappy_api::middleware::{cors_middleware, RequestTrace, StructuredLogger};
use thappy_api::routes;
use thappy_api::services::principals::{
    DbPrincipalStore, InMemoryPrincipalStore, PrincipalStore,
};
use thappy_api::state::AppState;
use tracing::{error, info, warn};

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables must be set by the runtime environment
    // (docker env_file, or `set -a; . ./.env; set +a` locally).
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    telemetry::init_tracing(config.env);

    let principals: Arc<dyn PrincipalStore> = match config.database_url.as_deref() {
        Some(url) => match connect_db(url, config.security.principal_lookup_timeout).await {
            Ok(conn) => Arc::new(DbPrincipalStore::new(conn)),
            Err(e) => {
                error!(error = %e, "Failed to connect principal store database");
                std::process::exit(1);
            }
        },
        None => {
            warn!("DATABASE_URL not set; using empty in-memory principal store");
            Arc::new(InMemoryPrincipalStore::new())
        }
    };

    let data = web::Data::new(AppState::new(config.security.clone(), principals));
    let cors_origins = config.cors_allowed_origins.clone();

    info!(
        host = %config.host,
        port = config.port,
        env = ?config.env,
        token_ttl = ?config.security.token_ttl,
        "Starting thappy API"
    );

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware(&cors_origins))
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
