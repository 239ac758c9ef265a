//! Backend entry-point: loads settings, prepares storage and serves the REST
//! API, the realtime gadget gateway and OpenAPI docs.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use gadget_backend::domain::TokenService;
use gadget_backend::inbound::http::health::HealthState;
use gadget_backend::outbound::persistence::{DbPool, run_migrations};
use gadget_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let lifetimes = settings.token_lifetimes().map_err(std::io::Error::other)?;
    let secret = settings.signing_secret().map_err(std::io::Error::other)?;
    let tokens = Arc::new(TokenService::new(&secret, lifetimes, Arc::new(DefaultClock)));

    let mut config = ServerConfig::new(tokens, settings.cookie_secure(), bind_addr)
        .with_seed_fixtures(settings.seed_fixtures);
    if !settings.cookie_secure() {
        warn!("credential cookies will be sent without the Secure attribute");
    }

    if let Some(database_url) = settings.database_url.as_deref() {
        let applied = run_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
        info!(applied, "database migrations applied");
        let pool = DbPool::connect(database_url)
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    info!(%bind_addr, "gadget backend listening");
    server.await
}
