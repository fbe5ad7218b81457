//! # Payment Hex
//!
//! Application service layer and HTTP adapter for the payment service.
//!
//! ## Architecture
//!
//! - `service/` - Payment domain service (validation, remote existence check)
//! - `inbound/` - HTTP adapter (Axum server)
//!
//! The service is generic over `R: PaymentRepository` and `U: UserLookup`.
//! In production `U` is the remote user client; tests inject fakes that can
//! simulate a missing user or a user service that is down.

pub mod inbound;
pub mod service;


pub use service::PaymentService;
