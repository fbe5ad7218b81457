//! # Platform Types
//!
//! Domain types and port traits for the user and payment services.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate is the **innermost core** of both services:
//! - `domain/` - Pure domain types (User, Payment, Amount)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Data Transfer Objects for the HTTP boundaries
//! - `rpc/` - Wire types for the user lookup RPC surface
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;
pub mod rpc;

// Re-export commonly used types
pub use domain::{
    Amount, CurrencyCode, NewPayment, NewUser, Payment, PaymentId, User, UserId, validate_email,
    validate_username,
};
pub use dto::*;
pub use error::{AppError, DomainError, RepoError};
pub use ports::{LookupError, PaymentRepository, UserLookup, UserRepository};
pub use rpc::{RemoteUser, RpcCode, RpcStatus};
