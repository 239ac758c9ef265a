//! Account use-cases: credential checks and the caller's own profile.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use zeroize::Zeroizing;

use super::password::verify_password;
use super::ports::{LoginService, UserPersistenceError, UserProfileQuery, UserRepository};
use super::{Error, LoginCredentials, User, UserId, Username};

/// Message returned for any failed login.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            tracing::warn!(%message, "user storage unavailable");
            Error::service_unavailable("user storage is unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user storage query failed: {message}"))
        }
    }
}

/// Implements [`LoginService`] and [`UserProfileQuery`] over a
/// [`UserRepository`].
#[derive(Clone)]
pub struct AccountService<U> {
    users: Arc<U>,
}

impl<U> AccountService<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl<U: UserRepository> LoginService for AccountService<U> {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let username = Username::new(credentials.username())
            .map_err(|_| Error::unauthorized(INVALID_CREDENTIALS))?;
        let Some(stored) = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_persistence_error)?
        else {
            debug!(username = %username, "login for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let password = Zeroizing::new(credentials.password().to_owned());
        let hash = stored.password_hash;
        // Argon2 is CPU bound; keep it off the request worker.
        let verified = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?;

        if verified {
            Ok(stored.user)
        } else {
            debug!(username = %username, "login with wrong password");
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[async_trait]
impl<U: UserRepository> UserProfileQuery for AccountService<U> {
    async fn fetch_profile(&self, user_id: UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_persistence_error)?
            .ok_or_else(|| Error::unauthorized("User not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::password::hash_password;
    use crate::domain::ports::{MockUserRepository, StoredUser};
    use rstest::{fixture, rstest};

    #[fixture]
    fn juan() -> StoredUser {
        StoredUser {
            user: User::new(
                UserId::random(),
                Username::new("juandelacruz").expect("valid username"),
                "juan@example.com",
                "Juan",
                "Dela Cruz",
            ),
            password_hash: hash_password("password123").expect("hash password"),
        }
    }

    fn service_with(stored: Option<StoredUser>) -> AccountService<MockUserRepository> {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(stored));
        AccountService::new(Arc::new(users))
    }

    #[rstest]
    #[tokio::test]
    async fn correct_password_returns_user(juan: StoredUser) {
        let expected = juan.user.clone();
        let service = service_with(Some(juan));
        let creds = LoginCredentials::try_from_parts("juandelacruz", "password123")
            .expect("credentials shape");

        let user = service.authenticate(&creds).await.expect("login succeeds");

        assert_eq!(user, expected);
    }

    #[rstest]
    #[case(true, "wrong-password")]
    #[case(false, "password123")]
    #[tokio::test]
    async fn failures_share_one_message(
        juan: StoredUser,
        #[case] known_user: bool,
        #[case] password: &str,
    ) {
        let service = service_with(known_user.then_some(juan));
        let creds =
            LoginCredentials::try_from_parts("juandelacruz", password).expect("credentials shape");

        let error = service.authenticate(&creds).await.expect_err("login fails");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
        assert_eq!(error.message(), INVALID_CREDENTIALS);
    }

    #[rstest]
    #[tokio::test]
    async fn storage_outage_is_service_unavailable() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(|_| Err(UserPersistenceError::connection("pool closed")));
        let service = AccountService::new(Arc::new(users));
        let creds = LoginCredentials::try_from_parts("juandelacruz", "password123")
            .expect("credentials shape");

        let error = service.authenticate(&creds).await.expect_err("login fails");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }

    #[rstest]
    #[tokio::test]
    async fn profile_of_vanished_user_is_unauthorized() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));
        let service = AccountService::new(Arc::new(users));

        let error = service
            .fetch_profile(UserId::random())
            .await
            .expect_err("missing user");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
