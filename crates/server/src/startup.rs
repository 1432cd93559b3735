use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use configs::{AppConfig, ServerConfig};
use models::db::{connect_with_config, DatabaseConfig};
use service::auth::AuthConfig;

use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(server: &ServerConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", server.host, server.port).parse()?)
}

pub fn auth_config(cfg: &configs::AuthConfig) -> AuthConfig {
    AuthConfig::new(cfg.jwt_secret.clone(), cfg.token_ttl_hours)
}

/// Connect, migrate, seed the admin account and build the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    let db = connect_with_config(&DatabaseConfig::from(&cfg.database)).await?;
    migration::Migrator::up(&db, None).await?;

    let state = ServerState::from_db(db, auth_config(&cfg.auth));
    if let (Some(login_id), Some(password)) = (&cfg.auth.admin_login_id, &cfg.auth.admin_password) {
        state.auth.ensure_admin(login_id, password).await?;
    }
    Ok(routes::build_router(build_cors(), state))
}

/// Public entry: load configuration and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let cfg = AppConfig::load_or_env()?;
    run_with_config(cfg).await
}

pub async fn run_with_config(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;
    let addr = bind_addr(&cfg.server)?;
    info!(%addr, "laundry server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
