//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::TokenService;
use crate::domain::ports::{GadgetCommand, GadgetQuery, LoginService, UserProfileQuery};

/// Parameter object bundling the port implementations used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub gadgets: Arc<dyn GadgetQuery>,
    pub gadget_commands: Arc<dyn GadgetCommand>,
}

/// Attributes applied to the credential cookies set by login and refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookieSettings {
    /// Adds the `Secure` attribute; disable only for plain-HTTP local runs.
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self { secure: true }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub gadgets: Arc<dyn GadgetQuery>,
    pub gadget_commands: Arc<dyn GadgetCommand>,
    pub tokens: Arc<TokenService>,
    pub cookies: CookieSettings,
}

impl HttpState {
    pub fn new(ports: HttpStatePorts, tokens: Arc<TokenService>, cookies: CookieSettings) -> Self {
        let HttpStatePorts {
            login,
            profile,
            gadgets,
            gadget_commands,
        } = ports;
        Self {
            login,
            profile,
            gadgets,
            gadget_commands,
            tokens,
            cookies,
        }
    }
}
