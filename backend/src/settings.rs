//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `GADGETS_*` environment variables and an
//! optional configuration file, in OrthoConfig's usual precedence. Boolean
//! switches have no CLI flag. Unset optional fields fall back to the defaults
//! exposed by the accessors.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use rand::RngCore;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::TokenLifetimes;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ACCESS_TTL_SECS: u64 = 300;
const DEFAULT_REFRESH_TTL_SECS: u64 = 86_400;
const EPHEMERAL_SECRET_LEN: usize = 32;

/// Errors raised while turning settings into runtime values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("invalid host address `{host}`")]
    InvalidHost { host: String },
    #[error("jwt_secret must be set outside debug builds")]
    MissingSecret,
    #[error("jwt_secret must not be empty")]
    EmptySecret,
    #[error("{field} must be greater than zero")]
    ZeroLifetime { field: &'static str },
}

/// Configuration values controlling the HTTP and realtime server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GADGETS")]
pub struct AppSettings {
    /// Interface to bind.
    pub host: Option<String>,
    /// Port to bind.
    pub port: Option<u16>,
    /// PostgreSQL connection string; in-memory storage is used when absent.
    pub database_url: Option<String>,
    /// HMAC secret signing access and refresh tokens.
    pub jwt_secret: Option<String>,
    /// Access token lifetime in seconds.
    pub access_ttl_secs: Option<u64>,
    /// Refresh token lifetime in seconds.
    pub refresh_ttl_secs: Option<u64>,
    /// Whether credential cookies carry the `Secure` attribute.
    /// Environment or file only; defaults to `true`.
    #[ortho_config(skip_cli)]
    pub cookie_secure: Option<bool>,
    /// Insert the demo accounts and gadgets on startup.
    #[ortho_config(skip_cli, default = false)]
    pub seed_fixtures: bool,
}

impl AppSettings {
    /// Socket address to bind, falling back to `0.0.0.0:8000`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    pub fn token_lifetimes(&self) -> Result<TokenLifetimes, SettingsError> {
        let access = self.access_ttl_secs.unwrap_or(DEFAULT_ACCESS_TTL_SECS);
        let refresh = self.refresh_ttl_secs.unwrap_or(DEFAULT_REFRESH_TTL_SECS);
        if access == 0 {
            return Err(SettingsError::ZeroLifetime {
                field: "access_ttl_secs",
            });
        }
        if refresh == 0 {
            return Err(SettingsError::ZeroLifetime {
                field: "refresh_ttl_secs",
            });
        }
        Ok(TokenLifetimes::from_secs(access, refresh))
    }

    pub fn cookie_secure(&self) -> bool {
        self.cookie_secure.unwrap_or(true)
    }

    /// Token signing secret.
    ///
    /// Debug builds without a configured secret get a random one, so tokens
    /// do not survive a restart.
    pub fn signing_secret(&self) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        self.resolve_secret(cfg!(debug_assertions))
    }

    fn resolve_secret(&self, allow_ephemeral: bool) -> Result<Zeroizing<Vec<u8>>, SettingsError> {
        match self.jwt_secret.as_deref() {
            Some("") => Err(SettingsError::EmptySecret),
            Some(secret) => Ok(Zeroizing::new(secret.as_bytes().to_vec())),
            None if allow_ephemeral => {
                warn!("jwt_secret not set; using an ephemeral signing secret (dev only)");
                let mut secret = Zeroizing::new(vec![0_u8; EPHEMERAL_SECRET_LEN]);
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            }
            None => Err(SettingsError::MissingSecret),
        }
    }
}
