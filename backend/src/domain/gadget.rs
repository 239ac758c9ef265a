//! Gadget records owned by a single user.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Maximum number of characters accepted for a gadget name.
pub const GADGET_NAME_MAX: usize = 255;

/// Validation errors for gadget input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GadgetValidationError {
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
}

impl GadgetValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        "name"
    }

    /// Stable code reported in error details.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "blank",
            Self::NameTooLong { .. } => "max_length",
        }
    }
}

/// Server-assigned gadget identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
#[schema(value_type = i64, example = 42)]
pub struct GadgetId(i64);

impl GadgetId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GadgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<i64> for GadgetId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Gadget display name: trimmed, 1 to 255 characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GadgetName(String);

impl GadgetName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, GadgetValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GadgetValidationError::EmptyName);
        }
        if trimmed.chars().count() > GADGET_NAME_MAX {
            return Err(GadgetValidationError::NameTooLong {
                max: GADGET_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for GadgetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<GadgetName> for String {
    fn from(value: GadgetName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GadgetName {
    type Error = GadgetValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A stored gadget.
///
/// ## Invariants
/// - `created` never changes after insert.
/// - `last_modified >= created`, refreshed on every update.
///
/// The owner is kept for scoping and event routing but is not serialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Gadget {
    id: GadgetId,
    #[serde(skip)]
    owner: UserId,
    #[schema(value_type = String, example = "Smart Watch Pro")]
    name: GadgetName,
    #[schema(example = "Advanced smartwatch with health monitoring.")]
    description: String,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl Gadget {
    pub fn new(
        id: GadgetId,
        owner: UserId,
        name: GadgetName,
        description: impl Into<String>,
        created: DateTime<Utc>,
        last_modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            description: description.into(),
            created,
            last_modified,
        }
    }

    pub fn id(&self) -> GadgetId {
        self.id
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn name(&self) -> &GadgetName {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Apply `changes`, stamping `now` as the modification time.
    pub fn apply(&mut self, changes: GadgetChanges, now: DateTime<Utc>) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = description;
        }
        self.last_modified = now;
    }
}

/// Fields supplied when creating a gadget or replacing it wholesale.
///
/// A missing description is stored as empty on create and left untouched
/// on replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GadgetDraft {
    pub name: GadgetName,
    pub description: Option<String>,
}

impl GadgetDraft {
    pub fn new(name: GadgetName, description: Option<String>) -> Self {
        Self { name, description }
    }

    /// Description to store for a new gadget.
    pub fn initial_description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }
}

impl From<GadgetDraft> for GadgetChanges {
    fn from(value: GadgetDraft) -> Self {
        Self {
            name: Some(value.name),
            description: value.description,
        }
    }
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GadgetChanges {
    pub name: Option<GadgetName>,
    pub description: Option<String>,
}
