//! Domain models for the user and payment services.

pub mod payment;
pub mod user;

pub use payment::{Amount, CurrencyCode, NewPayment, Payment, PaymentId};
pub use user::{NewUser, User, UserId, validate_email, validate_username};
