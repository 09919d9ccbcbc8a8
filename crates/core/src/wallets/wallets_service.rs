use log::debug;

use super::wallets_model::Wallet;
use super::wallets_traits::{WalletServiceTrait, WalletTransactionExecutor};
use crate::errors::{Error, Result};

/// Service for managing wallets (Generic over Executor)
pub struct WalletService<E: WalletTransactionExecutor> {
    transaction_executor: E,
}

impl<E: WalletTransactionExecutor> WalletService<E> {
    /// Creates a new WalletService instance
    pub fn new(transaction_executor: E) -> Self {
        Self {
            transaction_executor,
        }
    }
}

#[async_trait::async_trait]
impl<E: WalletTransactionExecutor> WalletServiceTrait for WalletService<E> {
    async fn list_wallets(&self) -> Result<Vec<Wallet>> {
        self.transaction_executor
            .execute(|repo| repo.get_all())
            .await
    }

    async fn get_wallet(&self, wallet_id: i32) -> Result<Wallet> {
        self.transaction_executor
            .execute(move |repo| {
                repo.get_by_id(wallet_id)?
                    .ok_or_else(|| Error::wallet_not_found(wallet_id))
            })
            .await
    }

    async fn create_wallet(&self, name: String) -> Result<Wallet> {
        debug!("Creating wallet '{}'", name);
        self.transaction_executor
            .execute(move |repo| repo.add(&name))
            .await
    }

    /// Only the name is written; the stored histories stay as they are.
    async fn update_wallet(&self, wallet_id: i32, name: String) -> Result<Wallet> {
        debug!("Renaming wallet {} to '{}'", wallet_id, name);
        self.transaction_executor
            .execute(move |repo| {
                let mut wallet = repo
                    .get_by_id(wallet_id)?
                    .ok_or_else(|| Error::wallet_not_found(wallet_id))?;
                wallet.name = name;
                repo.update(&wallet)
            })
            .await
    }

    async fn delete_wallet(&self, wallet_id: i32) -> Result<()> {
        debug!("Deleting wallet {}", wallet_id);
        self.transaction_executor
            .execute(move |repo| match repo.get_by_id(wallet_id)? {
                Some(wallet) => repo.delete(&wallet),
                None => Ok(()),
            })
            .await
    }
}
