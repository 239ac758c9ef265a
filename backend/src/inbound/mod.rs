//! Inbound adapters that translate external requests into domain service
//! calls while keeping framework details at the edge.
//!
//! REST handlers live under [`http`]; the realtime gadget gateway lives
//! under [`ws`]. Both authenticate with the same token service.

pub mod http;
pub mod ws;
