//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled when running tests
//! or with the `test-support` feature.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::password::hash_password;
use crate::domain::ports::{GadgetRepository, StoredUser};
use crate::domain::{
    AccountService, ConnectionRegistry, Gadget, GadgetDraft, GadgetId, GadgetName, GadgetService,
    MutationBroadcaster, TokenLifetimes, TokenService, User, UserId, Username,
};
use crate::inbound::http::state::{CookieSettings, HttpState, HttpStatePorts};
use crate::inbound::ws::state::WsState;
use crate::outbound::memory::{InMemoryGadgetRepository, InMemoryUserRepository};

/// Password of every account the harness seeds.
pub const HARNESS_PASSWORD: &str = "correct horse battery staple";

const HARNESS_SECRET: &[u8] = b"harness-signing-secret";

/// Clock frozen at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(now)
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

fn harness_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0)
        .single()
        .expect("valid harness instant")
}

// Hashing is slow outside `cfg(test)`; one hash serves every harness.
fn harness_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(HARNESS_PASSWORD).expect("hash harness password"))
        .clone()
}

fn stored_user(username: &str, first_name: &str) -> StoredUser {
    StoredUser {
        user: User::new(
            UserId::random(),
            Username::new(username).expect("valid harness username"),
            format!("{username}@example.com"),
            first_name,
            "Tester",
        ),
        password_hash: harness_password_hash(),
    }
}

/// Fully wired in-memory backend with two accounts, `alice` and `bob`.
///
/// Every call to [`TestHarness::http_state`] or [`TestHarness::ws_state`]
/// shares the same repositories, registry and token service, so a request
/// made through one can be observed through the other.
pub struct TestHarness {
    alice: UserId,
    bob: UserId,
    users: Arc<InMemoryUserRepository>,
    gadgets: Arc<InMemoryGadgetRepository>,
    registry: Arc<ConnectionRegistry>,
    tokens: Arc<TokenService>,
    gadget_service: Arc<GadgetService<InMemoryGadgetRepository>>,
    clock: Arc<FixedClock>,
}

impl TestHarness {
    pub fn new() -> Self {
        let alice = stored_user("alice", "Alice");
        let bob = stored_user("bob", "Bob");
        let (alice_id, bob_id) = (alice.user.id(), bob.user.id());

        let clock = Arc::new(FixedClock::new(harness_instant()));
        let users = Arc::new(InMemoryUserRepository::with_users(vec![alice, bob]));
        let gadgets = Arc::new(InMemoryGadgetRepository::default());
        let registry = Arc::new(ConnectionRegistry::new());
        let tokens = Arc::new(TokenService::new(
            HARNESS_SECRET,
            TokenLifetimes::default(),
            clock.clone(),
        ));
        let gadget_service = Arc::new(GadgetService::new(
            Arc::clone(&gadgets),
            MutationBroadcaster::new(registry.clone()),
            clock.clone(),
        ));

        Self {
            alice: alice_id,
            bob: bob_id,
            users,
            gadgets,
            registry,
            tokens,
            gadget_service,
            clock,
        }
    }

    pub fn alice(&self) -> UserId {
        self.alice
    }

    pub fn bob(&self) -> UserId {
        self.bob
    }

    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    pub fn gadget_service(&self) -> Arc<GadgetService<InMemoryGadgetRepository>> {
        Arc::clone(&self.gadget_service)
    }

    pub fn access_token(&self, user: UserId) -> String {
        self.tokens.issue_access(user).expect("issue access token")
    }

    pub fn refresh_token(&self, user: UserId) -> String {
        self.tokens.issue_pair(user).expect("issue token pair").refresh
    }

    /// Access token signed with the harness secret but already past expiry.
    pub fn expired_access_token(&self, user: UserId) -> String {
        let lifetimes = self.tokens.lifetimes();
        let issued_at = self.clock.utc() - lifetimes.access - TimeDelta::seconds(1);
        TokenService::new(
            HARNESS_SECRET,
            lifetimes,
            Arc::new(FixedClock::new(issued_at)),
        )
        .issue_access(user)
        .expect("issue expired token")
    }

    /// HTTP state with non-`Secure` cookies, as served over plain HTTP.
    pub fn http_state(&self) -> HttpState {
        let accounts = Arc::new(AccountService::new(Arc::clone(&self.users)));
        HttpState::new(
            HttpStatePorts {
                login: accounts.clone(),
                profile: accounts,
                gadgets: self.gadget_service.clone(),
                gadget_commands: self.gadget_service.clone(),
            },
            Arc::clone(&self.tokens),
            CookieSettings { secure: false },
        )
    }

    pub fn ws_state(&self) -> WsState {
        WsState::new(Arc::clone(&self.tokens), Arc::clone(&self.registry))
    }

    /// Store a gadget directly, bypassing the service and its broadcast.
    pub async fn seed_gadget(&self, owner: UserId, name: &str) -> Gadget {
        let draft = GadgetDraft::new(GadgetName::new(name).expect("valid gadget name"), None);
        self.gadgets
            .insert(owner, draft, self.clock.utc())
            .await
            .expect("seed gadget")
    }

    pub async fn gadget(&self, owner: UserId, id: GadgetId) -> Option<Gadget> {
        self.gadgets.find(owner, id).await.expect("find gadget")
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
