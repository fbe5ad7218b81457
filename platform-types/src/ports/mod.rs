//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The application layer depends on these traits, not concrete implementations.

mod lookup;
mod repository;

pub use lookup::{LookupError, UserLookup};
pub use repository::{PaymentRepository, UserRepository};
