//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Unique identifier for a User, assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(u32);

impl UserId {
    /// Wraps a raw numeric id.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw numeric id.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A user account as held by the record store.
///
/// Deliberately not `Serialize`: the password hash must never leave the
/// service. Use [`crate::UserResponse`] for anything that goes on the wire.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Soft delete marker. Rows with a marker are excluded from normal reads.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A user that has passed validation and hashing but has no id yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Builds a new user record.
    ///
    /// # Validation
    /// - Username and email cannot be empty
    /// - Email must contain an `@`
    pub fn new(username: String, email: String, password_hash: String) -> Result<Self, DomainError> {
        validate_username(&username)?;
        validate_email(&email)?;

        Ok(Self {
            username,
            email,
            password_hash,
        })
    }
}

pub fn validate_username(username: &str) -> Result<(), DomainError> {
    if username.trim().is_empty() {
        return Err(DomainError::ValidationError(
            "Username cannot be empty".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.trim().is_empty() {
        return Err(DomainError::ValidationError("Email cannot be empty".into()));
    }
    if !email.contains('@') {
        return Err(DomainError::ValidationError(format!(
            "Invalid email address: {}",
            email
        )));
    }
    Ok(())
}
