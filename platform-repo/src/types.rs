//! Database row structs shared by the SQLite and PostgreSQL adapters.
//!
//! Both backends store ids as 64-bit integers and decode timestamps into
//! `DateTime<Utc>` (TEXT on SQLite, TIMESTAMPTZ on PostgreSQL).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use platform_types::{
    Amount, CurrencyCode, DomainError, Payment, PaymentId, RepoError, User, UserId,
};

/// User row from database.
#[derive(FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DbUser {
    pub fn into_domain(self) -> Result<User, RepoError> {
        Ok(User {
            id: UserId::new(narrow_id(self.id)?),
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Payment row from database.
#[derive(FromRow)]
pub struct DbPayment {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub currency: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl DbPayment {
    pub fn into_domain(self) -> Result<Payment, RepoError> {
        Ok(Payment {
            id: PaymentId::new(narrow_id(self.id)?),
            user_id: UserId::new(narrow_id(self.user_id)?),
            amount: Amount::new(self.amount).map_err(corrupt_row)?,
            currency: CurrencyCode::new(self.currency).map_err(corrupt_row)?,
            description: self.description,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        })
    }
}

/// Converts a stored 64-bit id into the 32-bit id the services expose.
pub(crate) fn narrow_id(raw: i64) -> Result<u32, RepoError> {
    u32::try_from(raw).map_err(|_| RepoError::Database(format!("id out of range: {}", raw)))
}

/// A stored row that no longer satisfies the domain rules is a store fault,
/// not a caller mistake.
fn corrupt_row(e: DomainError) -> RepoError {
    RepoError::Database(format!("corrupt payment row: {}", e))
}

pub(crate) fn db_err(e: sqlx::Error) -> RepoError {
    RepoError::Database(e.to_string())
}
