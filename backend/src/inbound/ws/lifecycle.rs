//! Connection lifecycle for the realtime gateway.
//!
//! ```text
//! Connecting --auth ok--> Authenticated --joined--> Open --disconnect--> Closed
//!      \--auth failed--> Closed
//! ```
//!
//! Only `Open` connections process inbound frames. Any unexpected
//! transition lands in `Closed`.

/// Where a realtime connection is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticated,
    Open,
    Closed,
}

impl ConnectionState {
    #[must_use]
    pub fn on_auth(self, authenticated: bool) -> Self {
        match (self, authenticated) {
            (Self::Connecting, true) => Self::Authenticated,
            _ => Self::Closed,
        }
    }

    #[must_use]
    pub fn on_joined(self) -> Self {
        match self {
            Self::Authenticated => Self::Open,
            _ => Self::Closed,
        }
    }

    #[must_use]
    pub fn on_disconnect(self) -> Self {
        Self::Closed
    }

    pub fn accepts_frames(self) -> bool {
        matches!(self, Self::Open)
    }
}
