//! Payment Application Service
//!
//! Orchestrates the record store and the remote user lookup.
//! Contains NO infrastructure logic - pure business orchestration.

use platform_types::{
    Amount, AppError, CreatePaymentRequest, CurrencyCode, NewPayment, PaymentId,
    PaymentRepository, PaymentResponse, UserId, UserLookup,
};

/// Application service for payment operations.
///
/// Holds no user data of its own. Creating a payment and listing a user's
/// payments both ask the user service first; reading a single payment or all
/// payments does not.
pub struct PaymentService<R: PaymentRepository, U: UserLookup> {
    repo: R,
    users: U,
}

impl<R: PaymentRepository, U: UserLookup> PaymentService<R, U> {
    /// Creates a new payment service.
    ///
    /// `users` is the shared lookup handle, built once at startup.
    pub fn new(repo: R, users: U) -> Self {
        Self { repo, users }
    }

    /// Returns a reference to the underlying repository.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Confirms with the user service that the user exists.
    ///
    /// Every lookup failure counts as "user not found": a user service that is
    /// down or timing out is indistinguishable from a missing user here.
    async fn ensure_user_exists(&self, user_id: UserId) -> Result<(), AppError> {
        match self.users.lookup_by_id(user_id).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::warn!(user_id = %user_id, error = %e, "User existence check failed");
                Err(AppError::UserNotFound(user_id))
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Writes
    // ─────────────────────────────────────────────────────────────────────────────

    /// Records a new payment in the `pending` state.
    ///
    /// Invalid input is rejected before any remote call. The existence check
    /// and the insert are not atomic: the user can be deleted in between and
    /// the payment is still written.
    pub async fn create_payment(
        &self,
        req: CreatePaymentRequest,
    ) -> Result<PaymentResponse, AppError> {
        let amount = Amount::new(req.amount)?;
        let currency = CurrencyCode::new(req.currency)?;

        self.ensure_user_exists(req.user_id).await?;

        let payment = self
            .repo
            .create_payment(NewPayment::pending(
                req.user_id,
                amount,
                currency,
                req.description,
            ))
            .await?;

        tracing::info!(payment_id = %payment.id, user_id = %payment.user_id, "Payment created");
        Ok(payment.into())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Reads
    // ─────────────────────────────────────────────────────────────────────────────

    /// Gets a payment by ID. Local only; the owning user is not re-checked.
    pub async fn get_payment(&self, id: PaymentId) -> Result<PaymentResponse, AppError> {
        self.repo
            .get_payment(id)
            .await?
            .map(PaymentResponse::from)
            .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))
    }

    /// Lists a user's payments after confirming the user still exists.
    pub async fn list_user_payments(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PaymentResponse>, AppError> {
        self.ensure_user_exists(user_id).await?;

        let payments = self.repo.list_payments_for_user(user_id).await?;
        Ok(payments.into_iter().map(PaymentResponse::from).collect())
    }

    /// Lists all payments.
    pub async fn list_payments(&self) -> Result<Vec<PaymentResponse>, AppError> {
        let payments = self.repo.list_payments().await?;
        Ok(payments.into_iter().map(PaymentResponse::from).collect())
    }
}
