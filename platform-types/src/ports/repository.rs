//! Record store port traits.
//!
//! Adapters (Postgres, SQLite, in-memory) implement these traits. Every read
//! excludes soft-deleted rows. Stores enforce no uniqueness and no foreign
//! keys; those rules live in the domain services.

use crate::domain::{NewPayment, NewUser, Payment, PaymentId, User, UserId};
use crate::error::RepoError;

/// Record store for users.
#[async_trait::async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Inserts a user and returns it with its assigned id and timestamps.
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError>;

    /// Gets a non-deleted user by id.
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError>;

    /// Finds a non-deleted user by exact email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Finds a non-deleted user by exact username.
    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Saves username and email of an existing user, refreshing `updated_at`.
    ///
    /// Returns `RepoError::NotFound` if the row is gone or soft-deleted.
    async fn update_user(&self, user: User) -> Result<User, RepoError>;

    /// Sets the soft delete marker. The row stays in the store.
    async fn soft_delete_user(&self, id: UserId) -> Result<(), RepoError>;

    /// Lists all non-deleted users.
    async fn list_users(&self) -> Result<Vec<User>, RepoError>;
}

/// Record store for payments.
#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    /// Inserts a payment and returns it with its assigned id and timestamps.
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepoError>;

    /// Gets a non-deleted payment by id.
    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    /// Lists non-deleted payments referencing the given user id.
    async fn list_payments_for_user(&self, user_id: UserId) -> Result<Vec<Payment>, RepoError>;

    /// Lists all non-deleted payments.
    async fn list_payments(&self) -> Result<Vec<Payment>, RepoError>;
}
