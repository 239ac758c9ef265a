//! Signed access and refresh credentials.
//!
//! Both token kinds are HS256 JWTs signed with the same secret. Validation
//! is the single gate used by the REST extractor and the WebSocket connect
//! path: every failure collapses into [`AuthError::AuthenticationFailed`]
//! and the underlying reason is only logged at debug level.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{Error, UserId};

/// Default access token lifetime in seconds.
pub const DEFAULT_ACCESS_TTL_SECS: u64 = 5 * 60;
/// Default refresh token lifetime in seconds.
pub const DEFAULT_REFRESH_TTL_SECS: u64 = 24 * 60 * 60;

/// Token validation failure. The cause is only logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authentication failed")]
    AuthenticationFailed,
}

impl From<AuthError> for Error {
    fn from(_: AuthError) -> Self {
        Error::unauthorized("Invalid or missing credentials")
    }
}

/// Failure to sign a token.
#[derive(Debug, thiserror::Error)]
#[error("failed to sign {kind:?} token: {source}")]
pub struct TokenIssueError {
    kind: TokenType,
    #[source]
    source: jsonwebtoken::errors::Error,
}

impl From<TokenIssueError> for Error {
    fn from(value: TokenIssueError) -> Self {
        Error::internal(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Claims {
    user_id: UserId,
    token_type: TokenType,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Validity windows for both token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLifetimes {
    pub access: TimeDelta,
    pub refresh: TimeDelta,
}

impl TokenLifetimes {
    /// Build lifetimes from whole seconds, saturating at [`TimeDelta::MAX`].
    pub fn from_secs(access: u64, refresh: u64) -> Self {
        let to_delta = |secs: u64| {
            i64::try_from(secs)
                .ok()
                .and_then(TimeDelta::try_seconds)
                .unwrap_or(TimeDelta::MAX)
        };
        Self {
            access: to_delta(access),
            refresh: to_delta(refresh),
        }
    }
}

impl Default for TokenLifetimes {
    fn default() -> Self {
        Self::from_secs(DEFAULT_ACCESS_TTL_SECS, DEFAULT_REFRESH_TTL_SECS)
    }
}

/// Freshly issued credentials returned by login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Issues and validates tokens against one signing secret.
///
/// Expiry is checked against the injected clock with no leeway, so tests
/// can mint already-expired tokens by issuing from a clock in the past.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    lifetimes: TokenLifetimes,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(secret: &[u8], lifetimes: TokenLifetimes, clock: Arc<dyn Clock>) -> Self {
        let secret = Zeroizing::new(secret.to_vec());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is compared against the injected clock in `decode_claims`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding: EncodingKey::from_secret(&secret),
            decoding: DecodingKey::from_secret(&secret),
            validation,
            lifetimes,
            clock,
        }
    }

    pub fn lifetimes(&self) -> TokenLifetimes {
        self.lifetimes
    }

    pub fn issue_pair(&self, user_id: UserId) -> Result<TokenPair, TokenIssueError> {
        Ok(TokenPair {
            access: self.issue(user_id, TokenType::Access)?,
            refresh: self.issue(user_id, TokenType::Refresh)?,
        })
    }

    pub fn issue_access(&self, user_id: UserId) -> Result<String, TokenIssueError> {
        self.issue(user_id, TokenType::Access)
    }

    /// Resolve the owner behind an access token.
    pub fn validate_access(&self, raw: &str) -> Result<UserId, AuthError> {
        self.decode_claims(raw, TokenType::Access)
    }

    /// Resolve the owner behind a refresh token.
    pub fn validate_refresh(&self, raw: &str) -> Result<UserId, AuthError> {
        self.decode_claims(raw, TokenType::Refresh)
    }

    fn issue(&self, user_id: UserId, kind: TokenType) -> Result<String, TokenIssueError> {
        let now = self.clock.utc();
        let lifetime = match kind {
            TokenType::Access => self.lifetimes.access,
            TokenType::Refresh => self.lifetimes.refresh,
        };
        let claims = Claims {
            user_id,
            token_type: kind,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(lifetime)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
            jti: Uuid::new_v4().simple().to_string(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|source| TokenIssueError { kind, source })
    }

    fn decode_claims(&self, raw: &str, expected: TokenType) -> Result<UserId, AuthError> {
        let raw = raw.trim();
        if raw.is_empty() {
            debug!("rejecting empty token");
            return Err(AuthError::AuthenticationFailed);
        }
        let claims = decode::<Claims>(raw, &self.decoding, &self.validation)
            .map_err(|error| {
                debug!(%error, "rejecting undecodable token");
                AuthError::AuthenticationFailed
            })?
            .claims;
        if claims.token_type != expected {
            debug!(?expected, actual = ?claims.token_type, "rejecting token of wrong type");
            return Err(AuthError::AuthenticationFailed);
        }
        if claims.exp <= self.clock.utc().timestamp() {
            debug!(exp = claims.exp, "rejecting expired token");
            return Err(AuthError::AuthenticationFailed);
        }
        Ok(claims.user_id)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("lifetimes", &self.lifetimes)
            .finish_non_exhaustive()
    }
}
