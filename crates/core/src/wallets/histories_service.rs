use chrono::{DateTime, Utc};
use log::debug;

use super::wallets_model::{History, HistoryType, NewHistory};
use super::wallets_traits::{HistoryServiceTrait, WalletTransactionExecutor};
use crate::errors::{Error, Result};

/// Service for the histories of a wallet (Generic over Executor).
///
/// Each method submits one job, so all reads and writes of a use case share a
/// single transaction.
pub struct HistoryService<E: WalletTransactionExecutor> {
    transaction_executor: E,
}

impl<E: WalletTransactionExecutor> HistoryService<E> {
    pub fn new(transaction_executor: E) -> Self {
        Self {
            transaction_executor,
        }
    }
}

#[async_trait::async_trait]
impl<E: WalletTransactionExecutor> HistoryServiceTrait for HistoryService<E> {
    async fn list_histories(&self, wallet_id: i32) -> Result<Vec<History>> {
        self.transaction_executor
            .execute(move |repo| {
                let wallet = repo
                    .get_by_id(wallet_id)?
                    .ok_or_else(|| Error::wallet_not_found(wallet_id))?;
                Ok(wallet.histories)
            })
            .await
    }

    async fn get_history(&self, wallet_id: i32, history_id: i32) -> Result<History> {
        self.transaction_executor
            .execute(move |repo| {
                repo.get_history_by_id(wallet_id, history_id)?
                    .ok_or_else(|| Error::history_not_found(history_id))
            })
            .await
    }

    async fn create_history(&self, wallet_id: i32, new_history: NewHistory) -> Result<History> {
        debug!(
            "Creating {} history '{}' in wallet {}",
            new_history.history_type, new_history.name, wallet_id
        );
        self.transaction_executor
            .execute(move |repo| {
                let wallet = repo
                    .get_by_id(wallet_id)?
                    .ok_or_else(|| Error::wallet_not_found(wallet_id))?;
                repo.add_history(wallet.wallet_id, new_history)
            })
            .await
    }

    async fn update_history(
        &self,
        wallet_id: i32,
        history_id: i32,
        name: String,
        amount: i64,
        history_type: HistoryType,
        history_at: DateTime<Utc>,
    ) -> Result<History> {
        debug!("Updating history {} in wallet {}", history_id, wallet_id);
        self.transaction_executor
            .execute(move |repo| {
                let mut history = repo
                    .get_history_by_id(wallet_id, history_id)?
                    .ok_or_else(|| Error::history_not_found(history_id))?;
                history.name = name;
                history.amount = amount;
                history.history_type = history_type;
                history.history_at = history_at;
                repo.update_history(wallet_id, &history)
            })
            .await
    }

    async fn delete_history(&self, wallet_id: i32, history_id: i32) -> Result<()> {
        debug!("Deleting history {} in wallet {}", history_id, wallet_id);
        self.transaction_executor
            .execute(move |repo| match repo.get_history_by_id(wallet_id, history_id)? {
                Some(history) => repo.delete_history(history.wallet_id, &history),
                None => Ok(()),
            })
            .await
    }

    /// Both lookups run before the write, so a missing destination leaves the
    /// history where it was.
    async fn move_history(
        &self,
        wallet_id: i32,
        history_id: i32,
        destination_id: i32,
    ) -> Result<History> {
        debug!(
            "Moving history {} from wallet {} to wallet {}",
            history_id, wallet_id, destination_id
        );
        self.transaction_executor
            .execute(move |repo| {
                let mut history = repo
                    .get_history_by_id(wallet_id, history_id)?
                    .ok_or_else(|| Error::history_not_found(history_id))?;
                let destination = repo
                    .get_by_id(destination_id)?
                    .ok_or_else(|| Error::wallet_not_found(destination_id))?;

                history.wallet_id = destination.wallet_id;
                repo.update_history(wallet_id, &history)
            })
            .await
    }
}
