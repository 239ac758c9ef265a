//! Builders wiring repositories into the HTTP and WebSocket states.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};
use tracing::info;

use gadget_backend::domain::ports::{GadgetRepository, UserRepository};
use gadget_backend::domain::{
    AccountService, ConnectionRegistry, DemoDataSeeder, GadgetService, MutationBroadcaster,
};
use gadget_backend::inbound::http::state::{CookieSettings, HttpState, HttpStatePorts};
use gadget_backend::inbound::ws::state::WsState;
use gadget_backend::outbound::memory::{InMemoryGadgetRepository, InMemoryUserRepository};
use gadget_backend::outbound::persistence::{DieselGadgetRepository, DieselUserRepository};

use super::ServerConfig;

/// Adapter states shared by every worker.
pub(super) struct AppStates {
    pub(super) http: HttpState,
    pub(super) ws: WsState,
}

/// Build both adapter states, choosing Diesel repositories when a pool is
/// configured and in-memory ones otherwise.
///
/// # Errors
/// Returns [`std::io::Error`] when demo data seeding fails.
pub(super) async fn build_states(config: &ServerConfig) -> std::io::Result<AppStates> {
    match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            wire(
                config,
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselGadgetRepository::new(pool.clone())),
            )
            .await
        }
        None => {
            info!("no database configured; using in-memory storage");
            wire(
                config,
                Arc::new(InMemoryUserRepository::default()),
                Arc::new(InMemoryGadgetRepository::default()),
            )
            .await
        }
    }
}

async fn wire<U, G>(
    config: &ServerConfig,
    users: Arc<U>,
    gadgets: Arc<G>,
) -> std::io::Result<AppStates>
where
    U: UserRepository + 'static,
    G: GadgetRepository + 'static,
{
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

    if config.seed_fixtures {
        DemoDataSeeder::new(Arc::clone(&users), Arc::clone(&gadgets), Arc::clone(&clock))
            .seed()
            .await
            .map_err(|err| std::io::Error::other(format!("demo data seeding failed: {err}")))?;
    }

    let registry = Arc::new(ConnectionRegistry::new());
    let accounts = Arc::new(AccountService::new(users));
    let gadget_service = Arc::new(GadgetService::new(
        gadgets,
        MutationBroadcaster::new(registry.clone()),
        clock,
    ));

    let http = HttpState::new(
        HttpStatePorts {
            login: accounts.clone(),
            profile: accounts,
            gadgets: gadget_service.clone(),
            gadget_commands: gadget_service,
        },
        Arc::clone(&config.tokens),
        CookieSettings {
            secure: config.cookie_secure,
        },
    );
    let ws = WsState::new(Arc::clone(&config.tokens), registry);
    Ok(AppStates { http, ws })
}
