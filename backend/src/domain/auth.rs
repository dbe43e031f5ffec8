//! Caller identity types.
//!
//! Identity resolution itself is an external collaborator reached through
//! [`crate::domain::ports::IdentityResolver`]; the domain only sees the
//! resolved [`Caller`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

/// Opaque owner identifier, e.g. `user-9`.
///
/// ## Invariants
/// - Non-empty once trimmed of whitespace.
/// - No surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

/// Validation errors returned when constructing [`OwnerId`].
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum OwnerIdValidationError {
    /// Identifier is empty after trimming whitespace.
    #[error("owner id must not be empty")]
    Empty,
    /// Identifier carries leading or trailing whitespace.
    #[error("owner id must not contain surrounding whitespace")]
    ContainsWhitespace,
}

impl OwnerId {
    /// Construct an owner id after validating shape.
    pub fn new(value: impl Into<String>) -> Result<Self, OwnerIdValidationError> {
        let raw = value.into();
        if raw.trim().is_empty() {
            return Err(OwnerIdValidationError::Empty);
        }
        if raw.trim() != raw {
            return Err(OwnerIdValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Borrow the underlying identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for OwnerId {
    type Error = OwnerIdValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

/// Resolved identity of an authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Owner identity the bearer token resolved to.
    pub owner_id: OwnerId,
    /// Registrars review transfers and see every record; citizens see their
    /// own holdings only.
    pub registrar: bool,
}

impl Caller {
    /// A citizen caller acting on their own records.
    #[must_use]
    pub fn citizen(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            registrar: false,
        }
    }

    /// A registrar caller with review privileges.
    #[must_use]
    pub fn registrar(owner_id: OwnerId) -> Self {
        Self {
            owner_id,
            registrar: true,
        }
    }

    /// Whether this caller may act on records owned by `owner`.
    #[must_use]
    pub fn may_act_for(&self, owner: &OwnerId) -> bool {
        self.registrar || self.owner_id == *owner
    }
}
