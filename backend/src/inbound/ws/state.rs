//! Shared WebSocket adapter state.

use std::sync::Arc;

use crate::domain::{ConnectionRegistry, TokenService};

/// Dependencies of the realtime gateway.
#[derive(Clone)]
pub struct WsState {
    pub tokens: Arc<TokenService>,
    pub registry: Arc<ConnectionRegistry>,
}

impl WsState {
    pub fn new(tokens: Arc<TokenService>, registry: Arc<ConnectionRegistry>) -> Self {
        Self { tokens, registry }
    }
}
