//! SQLite storage implementation for Walletbook.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository and transaction traits defined in `walletbook-core`
//! and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - The wallet/history repository
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//!
//! ```text
//!   core (domain, use cases)
//!            │
//!            ▼
//!   storage-sqlite (this crate)
//!            │
//!            ▼
//!        SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod wallets;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, run_migrations, DbConnection, DbPool,
    PooledTransactionExecutor, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from walletbook-core for convenience
pub use walletbook_core::errors::{DatabaseError, Error, Result};
