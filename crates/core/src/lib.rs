//! Walletbook Core - Domain entities, use-case services, and traits.
//!
//! This crate contains the business logic for wallets and their histories.
//! It is database-agnostic and defines traits that are implemented
//! by the `storage-sqlite` crate.

pub mod errors;
pub mod wallets;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
