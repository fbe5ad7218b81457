//! Payment domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::user::UserId;
use crate::error::DomainError;

/// Unique identifier for a Payment, assigned by the record store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(u32);

impl PaymentId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PaymentId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// A strictly positive, finite payment amount.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    pub fn new(value: f64) -> Result<Self, DomainError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(DomainError::ValidationError(
                "Amount must be positive".into(),
            ));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO-style currency code. Any non-empty code is accepted; the set of
/// currencies is not closed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Column default applied by the record store when no currency is given.
    pub const STORE_DEFAULT: &'static str = "USD";

    pub fn new(code: impl Into<String>) -> Result<Self, DomainError> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::ValidationError("Currency is required".into()));
        }
        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A recorded payment.
///
/// `user_id` is not a foreign key. It was confirmed against the user service
/// once, at creation, and is never re-checked.
#[derive(Debug, Clone)]
pub struct Payment {
    pub id: PaymentId,
    pub user_id: UserId,
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Initial status of every payment. Nothing in this system transitions it.
    pub const STATUS_PENDING: &'static str = "pending";
}

/// A validated payment that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub user_id: UserId,
    pub amount: Amount,
    pub currency: CurrencyCode,
    pub description: String,
    pub status: String,
}

impl NewPayment {
    /// Creates a payment in the `pending` state.
    pub fn pending(
        user_id: UserId,
        amount: Amount,
        currency: CurrencyCode,
        description: Option<String>,
    ) -> Self {
        Self {
            user_id,
            amount,
            currency,
            description: description.unwrap_or_default(),
            status: Payment::STATUS_PENDING.to_string(),
        }
    }
}
