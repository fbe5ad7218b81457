//! # User Hex
//!
//! Application service layer and inbound adapters for the user service.
//!
//! ## Architecture
//!
//! - `service/` - User domain service (uniqueness rules, hashing, CRUD)
//! - `password/` - Argon2 credential hashing
//! - `inbound/` - HTTP adapter (full CRUD) and RPC adapter (read-only lookups)
//!
//! The service is generic over `R: UserRepository`, allowing different record
//! stores to be injected.

pub mod inbound;
pub mod password;
pub mod service;


pub use service::UserService;
