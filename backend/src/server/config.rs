//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use gadget_backend::domain::TokenService;
use gadget_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) tokens: Arc<TokenService>,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) seed_fixtures: bool,
}

impl ServerConfig {
    /// Construct a server configuration backed by in-memory storage.
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, cookie_secure: bool, bind_addr: SocketAddr) -> Self {
        Self {
            tokens,
            cookie_secure,
            bind_addr,
            db_pool: None,
            seed_fixtures: false,
        }
    }

    /// Attach a database connection pool; the Diesel repositories replace
    /// the in-memory ones.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Seed the demo accounts and gadgets before serving.
    #[must_use]
    pub fn with_seed_fixtures(mut self, seed: bool) -> Self {
        self.seed_fixtures = seed;
        self
    }
}
