//! In-memory repository adapter.
//!
//! Backed by `DashMap`, so every single operation is atomic on its own but
//! nothing spans two operations. Used for tests and local runs without a
//! database (`DATABASE_URL=memory://`).

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use platform_types::{
    NewPayment, NewUser, Payment, PaymentId, PaymentRepository, RepoError, User, UserId,
    UserRepository,
};

/// In-memory record store for both entity types.
pub struct MemoryRepo {
    users: DashMap<UserId, User>,
    payments: DashMap<PaymentId, Payment>,
    next_user_id: AtomicU32,
    next_payment_id: AtomicU32,
}

impl Default for MemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            payments: DashMap::new(),
            next_user_id: AtomicU32::new(1),
            next_payment_id: AtomicU32::new(1),
        }
    }

    /// Gets a user by id including soft-deleted rows (audit view).
    pub fn get_user_unscoped(&self, id: UserId) -> Option<User> {
        self.users.get(&id).map(|u| u.value().clone())
    }

    fn live_users(&self) -> Vec<User> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|u| !u.is_deleted())
            .map(|u| u.value().clone())
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }

    fn live_payments(&self) -> Vec<Payment> {
        let mut payments: Vec<Payment> = self
            .payments
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .map(|p| p.value().clone())
            .collect();
        payments.sort_by_key(|p| p.id);
        payments
    }
}

#[async_trait]
impl UserRepository for MemoryRepo {
    async fn create_user(&self, user: NewUser) -> Result<User, RepoError> {
        let now = Utc::now();
        let id = UserId::new(self.next_user_id.fetch_add(1, Ordering::SeqCst));
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        Ok(self
            .users
            .get(&id)
            .filter(|u| !u.is_deleted())
            .map(|u| u.value().clone()))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.live_users().into_iter().find(|u| u.email == email))
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .live_users()
            .into_iter()
            .find(|u| u.username == username))
    }

    async fn update_user(&self, mut user: User) -> Result<User, RepoError> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .filter(|u| !u.is_deleted())
            .ok_or(RepoError::NotFound)?;

        user.updated_at = Utc::now();
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.updated_at = user.updated_at;
        Ok(user)
    }

    async fn soft_delete_user(&self, id: UserId) -> Result<(), RepoError> {
        let mut stored = self
            .users
            .get_mut(&id)
            .filter(|u| !u.is_deleted())
            .ok_or(RepoError::NotFound)?;

        let now = Utc::now();
        stored.deleted_at = Some(now);
        stored.updated_at = now;
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>, RepoError> {
        Ok(self.live_users())
    }
}

#[async_trait]
impl PaymentRepository for MemoryRepo {
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment, RepoError> {
        let now = Utc::now();
        let id = PaymentId::new(self.next_payment_id.fetch_add(1, Ordering::SeqCst));
        let payment = Payment {
            id,
            user_id: payment.user_id,
            amount: payment.amount,
            currency: payment.currency,
            description: payment.description,
            status: payment.status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.payments.insert(id, payment.clone());
        Ok(payment)
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        Ok(self
            .payments
            .get(&id)
            .filter(|p| p.deleted_at.is_none())
            .map(|p| p.value().clone()))
    }

    async fn list_payments_for_user(&self, user_id: UserId) -> Result<Vec<Payment>, RepoError> {
        Ok(self
            .live_payments()
            .into_iter()
            .filter(|p| p.user_id == user_id)
            .collect())
    }

    async fn list_payments(&self) -> Result<Vec<Payment>, RepoError> {
        Ok(self.live_payments())
    }
}
