//! SQLite storage implementation for wallets and their histories.

mod model;
mod repository;

pub use model::{HistoryChangesetDB, HistoryDB, NewHistoryDB, NewWalletDB, WalletDB};
pub use repository::WalletRepository;
