//! Development fixture accounts and gadgets.
//!
//! Seeding is idempotent: a demo user that already exists is left alone,
//! and its gadgets are only inserted when the user was created by this run.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::password::{PasswordHashError, hash_password};
use super::ports::{
    GadgetPersistenceError, GadgetRepository, StoredUser, UserPersistenceError, UserRepository,
};
use super::{GadgetDraft, GadgetName, GadgetValidationError, User, UserId, UserValidationError, Username};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "password123";

struct DemoUser {
    id: Uuid,
    username: &'static str,
    email: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    gadgets: &'static [(&'static str, &'static str)],
}

const DEMO_USERS: &[DemoUser] = &[
    DemoUser {
        id: Uuid::from_u128(0x5c1e_0d1a_0000_4000_8000_0000_0000_0001),
        username: "juandelacruz",
        email: "juan@example.com",
        first_name: "Juan",
        last_name: "Dela Cruz",
        gadgets: &[
            (
                "Smart Watch Pro",
                "A premium smartwatch with health monitoring, GPS tracking, and 7-day battery life.",
            ),
            (
                "Wireless Earbuds X1",
                "Noise-cancelling wireless earbuds with crystal clear audio and 24-hour battery.",
            ),
        ],
    },
    DemoUser {
        id: Uuid::from_u128(0x5c1e_0d1a_0000_4000_8000_0000_0000_0002),
        username: "mariaclarita",
        email: "maria@example.com",
        first_name: "Maria",
        last_name: "Clarita",
        gadgets: &[(
            "Portable Charger Max",
            "20000mAh portable charger with fast charging support for all devices.",
        )],
    },
];

/// Errors raised while seeding demo data.
#[derive(Debug, Error)]
pub enum DemoSeedError {
    #[error(transparent)]
    Hash(#[from] PasswordHashError),
    #[error("invalid demo user: {0}")]
    InvalidUser(#[from] UserValidationError),
    #[error("invalid demo gadget: {0}")]
    InvalidGadget(#[from] GadgetValidationError),
    #[error(transparent)]
    Users(#[from] UserPersistenceError),
    #[error(transparent)]
    Gadgets(#[from] GadgetPersistenceError),
}

/// What a seeding run wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSeedOutcome {
    pub users_created: usize,
    pub gadgets_created: usize,
}

pub struct DemoDataSeeder<U, G> {
    users: Arc<U>,
    gadgets: Arc<G>,
    clock: Arc<dyn Clock>,
}

impl<U, G> DemoDataSeeder<U, G>
where
    U: UserRepository,
    G: GadgetRepository,
{
    pub fn new(users: Arc<U>, gadgets: Arc<G>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            gadgets,
            clock,
        }
    }

    pub async fn seed(&self) -> Result<DemoSeedOutcome, DemoSeedError> {
        let mut outcome = DemoSeedOutcome::default();
        for demo in DEMO_USERS {
            let owner = UserId::from_uuid(demo.id);
            let stored = StoredUser {
                user: User::new(
                    owner,
                    Username::new(demo.username)?,
                    demo.email,
                    demo.first_name,
                    demo.last_name,
                ),
                password_hash: hash_password(DEMO_PASSWORD)?,
            };
            if !self.users.insert(&stored).await? {
                info!(username = demo.username, "demo user already exists; skipping");
                continue;
            }
            outcome.users_created += 1;

            for (name, description) in demo.gadgets {
                let draft = GadgetDraft::new(GadgetName::new(name)?, Some((*description).to_owned()));
                self.gadgets.insert(owner, draft, self.clock.utc()).await?;
                outcome.gadgets_created += 1;
            }
        }
        info!(
            users_created = outcome.users_created,
            gadgets_created = outcome.gadgets_created,
            "demo data seeding finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::memory::{InMemoryGadgetRepository, InMemoryUserRepository};
    use crate::test_support::FixedClock;
    use chrono::Utc;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn seeding_twice_only_writes_once() {
        let users = Arc::new(InMemoryUserRepository::default());
        let gadgets = Arc::new(InMemoryGadgetRepository::default());
        let seeder = DemoDataSeeder::new(
            Arc::clone(&users),
            Arc::clone(&gadgets),
            Arc::new(FixedClock::new(Utc::now())),
        );

        let first = seeder.seed().await.expect("first seed");
        let second = seeder.seed().await.expect("second seed");

        assert_eq!(
            first,
            DemoSeedOutcome {
                users_created: 2,
                gadgets_created: 3
            }
        );
        assert_eq!(second, DemoSeedOutcome::default());

        let juan = users
            .find_by_username(&Username::new("juandelacruz").expect("username"))
            .await
            .expect("lookup")
            .expect("juan seeded");
        let owned = gadgets
            .list_for_owner(juan.user.id())
            .await
            .expect("list gadgets");
        assert_eq!(owned.len(), 2);
    }
}
