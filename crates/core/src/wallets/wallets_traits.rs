//! Wallet repository, transaction and service traits.
//!
//! These traits define the contract for wallet and history operations without
//! any database-specific types, allowing for different storage implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::wallets_model::{History, HistoryType, NewHistory, Wallet};
use crate::errors::Result;

/// Storage operations bound to one open transaction.
///
/// An implementation is only ever handed out by a [`WalletTransactionExecutor`]
/// for the duration of a single job; every call made through it belongs to the
/// same transaction. Read methods return fully loaded values, never handles
/// that would touch storage after the transaction has ended.
pub trait WalletRepositoryTrait {
    /// Inserts a wallet with no histories.
    fn add(&mut self, name: &str) -> Result<Wallet>;

    /// Loads a wallet and all of its histories, newest first.
    fn get_by_id(&mut self, wallet_id: i32) -> Result<Option<Wallet>>;

    /// Loads every wallet with its histories.
    fn get_all(&mut self) -> Result<Vec<Wallet>>;

    /// Overwrites the stored name of `wallet`. Histories on the input are ignored.
    ///
    /// Fails with a storage error (not `NotFound`) if the row is missing.
    fn update(&mut self, wallet: &Wallet) -> Result<Wallet>;

    /// Deletes the wallet and its histories. Missing wallets are a no-op.
    fn delete(&mut self, wallet: &Wallet) -> Result<()>;

    /// Inserts a history owned by `wallet_id`.
    ///
    /// Fails with a storage error if the wallet does not exist.
    fn add_history(&mut self, wallet_id: i32, new_history: NewHistory) -> Result<History>;

    /// Looks a history up by both its owner and its own id.
    fn get_history_by_id(&mut self, wallet_id: i32, history_id: i32) -> Result<Option<History>>;

    /// Finds the history by `(wallet_id, history.history_id)` and overwrites
    /// every mutable field from `history`, including its `wallet_id`.
    ///
    /// The new owner is not checked here.
    fn update_history(&mut self, wallet_id: i32, history: &History) -> Result<History>;

    /// Deletes the history if it is still owned by `wallet_id`; otherwise a no-op.
    fn delete_history(&mut self, wallet_id: i32, history: &History) -> Result<()>;
}

/// Runs a job against a [`WalletRepositoryTrait`] inside one transaction.
///
/// The transaction commits when the job returns `Ok` and rolls back when it
/// returns `Err`, whatever path the job exits through.
#[async_trait]
pub trait WalletTransactionExecutor: Send + Sync {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WalletRepositoryTrait) -> Result<T> + Send + 'static,
        T: Send + 'static;
}

/// Wallet use cases.
#[async_trait]
pub trait WalletServiceTrait: Send + Sync {
    /// Lists every wallet with its histories.
    async fn list_wallets(&self) -> Result<Vec<Wallet>>;

    /// Retrieves a wallet and its histories.
    async fn get_wallet(&self, wallet_id: i32) -> Result<Wallet>;

    /// Creates an empty wallet.
    async fn create_wallet(&self, name: String) -> Result<Wallet>;

    /// Renames a wallet.
    async fn update_wallet(&self, wallet_id: i32, name: String) -> Result<Wallet>;

    /// Deletes a wallet and its histories. Succeeds if the wallet is already gone.
    async fn delete_wallet(&self, wallet_id: i32) -> Result<()>;
}

/// History use cases.
#[async_trait]
pub trait HistoryServiceTrait: Send + Sync {
    async fn list_histories(&self, wallet_id: i32) -> Result<Vec<History>>;

    async fn get_history(&self, wallet_id: i32, history_id: i32) -> Result<History>;

    async fn create_history(&self, wallet_id: i32, new_history: NewHistory) -> Result<History>;

    async fn update_history(
        &self,
        wallet_id: i32,
        history_id: i32,
        name: String,
        amount: i64,
        history_type: HistoryType,
        history_at: DateTime<Utc>,
    ) -> Result<History>;

    /// Deletes a history. Succeeds if it is already gone.
    async fn delete_history(&self, wallet_id: i32, history_id: i32) -> Result<()>;

    /// Reassigns a history from `wallet_id` to `destination_id`.
    async fn move_history(
        &self,
        wallet_id: i32,
        history_id: i32,
        destination_id: i32,
    ) -> Result<History>;
}
