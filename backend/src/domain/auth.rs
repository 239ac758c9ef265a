//! Login credentials.
//!
//! Handlers build [`LoginCredentials`] from the raw request body before
//! calling the login port, so length limits are enforced in one place.

use zeroize::Zeroizing;

use super::user::USERNAME_MAX;

/// Maximum number of characters accepted for a password.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at most {max} characters")]
    UsernameTooLong { max: usize },
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password must be at most {max} characters")]
    PasswordTooLong { max: usize },
}

impl LoginValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::UsernameTooLong { .. } => "username",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `username` is trimmed, non-empty, and at most 150 characters.
/// - `password` is non-empty and at most 128 characters; surrounding
///   whitespace is kept as typed.
///
/// # Examples
/// ```
/// use gadget_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("juandelacruz", "password123").unwrap();
/// assert_eq!(creds.username(), "juandelacruz");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }
        if normalized.chars().count() > USERNAME_MAX {
            return Err(LoginValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        if password.chars().count() > PASSWORD_MAX {
            return Err(LoginValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
