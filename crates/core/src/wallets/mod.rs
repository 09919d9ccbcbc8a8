//! Wallets module - domain models, use-case services, and traits.

mod histories_service;
mod wallets_model;
mod wallets_service;
mod wallets_traits;

#[cfg(test)]
mod service_tests;


// Re-export the public interface
pub use histories_service::HistoryService;
pub use wallets_model::{sort_histories_desc, History, HistoryType, NewHistory, Wallet};
pub use wallets_service::WalletService;
pub use wallets_traits::{
    HistoryServiceTrait, WalletRepositoryTrait, WalletServiceTrait, WalletTransactionExecutor,
};
