use std::{future::Future, net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use migration::MigratorTrait;
use service::auth::{TokenConfig, TokenService};
use service::operations::repo::seaorm::SeaOrmOperationRepository;
use service::operations::{OperationService, OperationStore};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::auth::ServerState;
use crate::errors::StartupError;
use crate::routes;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &configs::ServerConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.host, cfg.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Token service built from the `[auth]` section.
pub fn token_service(cfg: &configs::AuthConfig) -> TokenService {
    TokenService::new(&TokenConfig {
        jwt_secret: cfg.jwt_secret.clone(),
        ttl: Duration::from_secs(cfg.token_ttl_secs),
    })
}

/// Wire an already-chosen store into the router.
pub fn build_app(store: Arc<dyn OperationStore>, tokens: TokenService) -> Router {
    let state = ServerState { store, tokens: Arc::new(tokens) };
    routes::build_router(state, build_cors())
}

/// Prepare the database named in `cfg` and serve HTTP until `shutdown`
/// resolves; in-flight requests are drained before returning.
pub async fn run(cfg: configs::AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let db = models::db::connect_with_config(&cfg.database)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    models::db::test_connection(&db)
        .await
        .map_err(|e| StartupError::Database(e.to_string()))?;
    migration::Migrator::up(&db, None)
        .await
        .map_err(|e| StartupError::Migration(e.to_string()))?;
    info!(event = "migrations_applied", "database schema up to date");

    let repo = Arc::new(SeaOrmOperationRepository::new(db));
    let store: Arc<dyn OperationStore> = Arc::new(OperationService::new(repo));
    let app = build_app(store, token_service(&cfg.auth));

    let addr = bind_addr(&cfg.server)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!(event = "drained", "server stopped accepting connections");
    Ok(())
}
