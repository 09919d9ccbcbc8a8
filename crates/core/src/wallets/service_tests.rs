//! Use-case tests against an in-memory repository.
//!
//! `MemoryExecutor` copies the store before each job and only keeps the copy
//! when the job returns `Ok`, which mirrors commit/rollback.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use super::wallets_model::{sort_histories_desc, History, HistoryType, NewHistory, Wallet};
use super::wallets_traits::{
    HistoryServiceTrait, WalletRepositoryTrait, WalletServiceTrait, WalletTransactionExecutor,
};
use super::{HistoryService, WalletService};
use crate::errors::{Error, ResourceKind, Result};

#[derive(Clone, Default)]
struct MemoryStore {
    wallets: Vec<(i32, String)>,
    histories: Vec<History>,
    next_wallet_id: i32,
    next_history_id: i32,
}

impl MemoryStore {
    fn load(&self, wallet_id: i32, name: &str) -> Wallet {
        let mut histories: Vec<History> = self
            .histories
            .iter()
            .filter(|h| h.wallet_id == wallet_id)
            .cloned()
            .collect();
        sort_histories_desc(&mut histories);
        Wallet {
            wallet_id,
            name: name.to_string(),
            histories,
        }
    }
}

impl WalletRepositoryTrait for MemoryStore {
    fn add(&mut self, name: &str) -> Result<Wallet> {
        self.next_wallet_id += 1;
        self.wallets.push((self.next_wallet_id, name.to_string()));
        Ok(self.load(self.next_wallet_id, name))
    }

    fn get_by_id(&mut self, wallet_id: i32) -> Result<Option<Wallet>> {
        Ok(self
            .wallets
            .iter()
            .find(|(id, _)| *id == wallet_id)
            .map(|(id, name)| self.load(*id, name)))
    }

    fn get_all(&mut self) -> Result<Vec<Wallet>> {
        Ok(self
            .wallets
            .iter()
            .map(|(id, name)| self.load(*id, name))
            .collect())
    }

    fn update(&mut self, wallet: &Wallet) -> Result<Wallet> {
        let entry = self
            .wallets
            .iter_mut()
            .find(|(id, _)| *id == wallet.wallet_id)
            .ok_or_else(|| Error::Unexpected("wallet vanished".to_string()))?;
        entry.1 = wallet.name.clone();
        let name = entry.1.clone();
        Ok(self.load(wallet.wallet_id, &name))
    }

    fn delete(&mut self, wallet: &Wallet) -> Result<()> {
        self.wallets.retain(|(id, _)| *id != wallet.wallet_id);
        self.histories.retain(|h| h.wallet_id != wallet.wallet_id);
        Ok(())
    }

    fn add_history(&mut self, wallet_id: i32, new_history: NewHistory) -> Result<History> {
        if !self.wallets.iter().any(|(id, _)| *id == wallet_id) {
            return Err(Error::Unexpected("wallet vanished".to_string()));
        }
        self.next_history_id += 1;
        let history = History {
            history_id: self.next_history_id,
            name: new_history.name,
            amount: new_history.amount,
            history_type: new_history.history_type,
            history_at: new_history.history_at,
            wallet_id,
        };
        self.histories.push(history.clone());
        Ok(history)
    }

    fn get_history_by_id(&mut self, wallet_id: i32, history_id: i32) -> Result<Option<History>> {
        Ok(self
            .histories
            .iter()
            .find(|h| h.wallet_id == wallet_id && h.history_id == history_id)
            .cloned())
    }

    fn update_history(&mut self, wallet_id: i32, history: &History) -> Result<History> {
        let stored = self
            .histories
            .iter_mut()
            .find(|h| h.wallet_id == wallet_id && h.history_id == history.history_id)
            .ok_or_else(|| Error::Unexpected("history vanished".to_string()))?;
        *stored = history.clone();
        Ok(stored.clone())
    }

    fn delete_history(&mut self, wallet_id: i32, history: &History) -> Result<()> {
        self.histories
            .retain(|h| !(h.wallet_id == wallet_id && h.history_id == history.history_id));
        Ok(())
    }
}

#[derive(Clone, Default)]
struct MemoryExecutor {
    store: Arc<Mutex<MemoryStore>>,
}

impl MemoryExecutor {
    fn snapshot(&self) -> MemoryStore {
        self.store.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletTransactionExecutor for MemoryExecutor {
    async fn execute<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn WalletRepositoryTrait) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.store.lock().unwrap();
        let mut working = guard.clone();
        let result = job(&mut working);
        if result.is_ok() {
            *guard = working;
        }
        result
    }
}

fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap()
}

fn new_history(name: &str, amount: i64, history_type: HistoryType, day: u32) -> NewHistory {
    NewHistory {
        name: name.to_string(),
        amount,
        history_type,
        history_at: at(day),
    }
}

fn services() -> (
    MemoryExecutor,
    WalletService<MemoryExecutor>,
    HistoryService<MemoryExecutor>,
) {
    let executor = MemoryExecutor::default();
    (
        executor.clone(),
        WalletService::new(executor.clone()),
        HistoryService::new(executor),
    )
}

fn assert_not_found(err: Error, resource: ResourceKind, id: i32) {
    match err {
        Error::NotFound {
            resource: r,
            id: got,
        } => {
            assert_eq!(r, resource);
            assert_eq!(got, id);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_created_wallet_is_empty() {
    let (_, wallets, _) = services();
    let created = wallets.create_wallet("Groceries".to_string()).await.unwrap();

    let loaded = wallets.get_wallet(created.wallet_id).await.unwrap();
    assert_eq!(loaded.name, "Groceries");
    assert!(loaded.histories.is_empty());
    assert_eq!(loaded.balance(), 0);
}

#[tokio::test]
async fn test_get_missing_wallet_is_not_found() {
    let (_, wallets, _) = services();
    let err = wallets.get_wallet(42).await.unwrap_err();
    assert_not_found(err, ResourceKind::Wallet, 42);
}

#[tokio::test]
async fn test_update_wallet_keeps_histories() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Old".to_string()).await.unwrap();
    histories
        .create_history(w.wallet_id, new_history("Salary", 10, HistoryType::Income, 1))
        .await
        .unwrap();

    let updated = wallets
        .update_wallet(w.wallet_id, "New".to_string())
        .await
        .unwrap();
    assert_eq!(updated.name, "New");
    assert_eq!(updated.histories.len(), 1);
}

#[tokio::test]
async fn test_update_missing_wallet_is_not_found() {
    let (_, wallets, _) = services();
    let err = wallets.update_wallet(9, "x".to_string()).await.unwrap_err();
    assert_not_found(err, ResourceKind::Wallet, 9);
}

#[tokio::test]
async fn test_delete_wallet_removes_histories_and_is_idempotent() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Trip".to_string()).await.unwrap();
    let h = histories
        .create_history(w.wallet_id, new_history("Hotel", 300, HistoryType::Outcome, 2))
        .await
        .unwrap();

    wallets.delete_wallet(w.wallet_id).await.unwrap();
    wallets.delete_wallet(w.wallet_id).await.unwrap();

    let err = histories
        .get_history(w.wallet_id, h.history_id)
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::History, h.history_id);
    assert!(wallets.list_wallets().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_create_history_under_missing_wallet_is_not_found() {
    let (executor, _, histories) = services();
    let err = histories
        .create_history(5, new_history("Salary", 10, HistoryType::Income, 1))
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::Wallet, 5);
    assert!(executor.snapshot().histories.is_empty());
}

#[tokio::test]
async fn test_list_histories_newest_first() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Main".to_string()).await.unwrap();
    for (name, day) in [("a", 1), ("c", 3), ("b", 2)] {
        histories
            .create_history(w.wallet_id, new_history(name, 1, HistoryType::Income, day))
            .await
            .unwrap();
    }

    let names: Vec<String> = histories
        .list_histories(w.wallet_id)
        .await
        .unwrap()
        .into_iter()
        .map(|h| h.name)
        .collect();
    assert_eq!(names, vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_list_histories_missing_wallet() {
    let (_, _, histories) = services();
    let err = histories.list_histories(3).await.unwrap_err();
    assert_not_found(err, ResourceKind::Wallet, 3);
}

#[tokio::test]
async fn test_get_history_is_scoped_to_wallet() {
    let (_, wallets, histories) = services();
    let a = wallets.create_wallet("A".to_string()).await.unwrap();
    let b = wallets.create_wallet("B".to_string()).await.unwrap();
    let h = histories
        .create_history(a.wallet_id, new_history("Lunch", 12, HistoryType::Outcome, 4))
        .await
        .unwrap();

    assert_eq!(
        histories.get_history(a.wallet_id, h.history_id).await.unwrap(),
        h
    );
    let err = histories
        .get_history(b.wallet_id, h.history_id)
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::History, h.history_id);
}

#[tokio::test]
async fn test_update_history_overwrites_fields() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Main".to_string()).await.unwrap();
    let h = histories
        .create_history(w.wallet_id, new_history("Lunch", 12, HistoryType::Outcome, 4))
        .await
        .unwrap();

    let updated = histories
        .update_history(
            w.wallet_id,
            h.history_id,
            "Refund".to_string(),
            40,
            HistoryType::Income,
            at(9),
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Refund");
    assert_eq!(updated.amount, 40);
    assert_eq!(updated.history_type, HistoryType::Income);
    assert_eq!(updated.history_at, at(9));
    assert_eq!(updated.wallet_id, w.wallet_id);
    assert_eq!(
        histories.get_history(w.wallet_id, h.history_id).await.unwrap(),
        updated
    );
}

#[tokio::test]
async fn test_update_missing_history_is_not_found() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Main".to_string()).await.unwrap();
    let err = histories
        .update_history(w.wallet_id, 77, "x".to_string(), 1, HistoryType::Income, at(1))
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::History, 77);
}

#[tokio::test]
async fn test_delete_history_twice_succeeds() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Main".to_string()).await.unwrap();
    let h = histories
        .create_history(w.wallet_id, new_history("Lunch", 12, HistoryType::Outcome, 4))
        .await
        .unwrap();

    histories
        .delete_history(w.wallet_id, h.history_id)
        .await
        .unwrap();
    histories
        .delete_history(w.wallet_id, h.history_id)
        .await
        .unwrap();
    assert!(histories
        .list_histories(w.wallet_id)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_move_history_changes_owner() {
    let (_, wallets, histories) = services();
    let src = wallets.create_wallet("Src".to_string()).await.unwrap();
    let dst = wallets.create_wallet("Dst".to_string()).await.unwrap();
    let h = histories
        .create_history(src.wallet_id, new_history("Rent", 1200, HistoryType::Outcome, 2))
        .await
        .unwrap();

    let moved = histories
        .move_history(src.wallet_id, h.history_id, dst.wallet_id)
        .await
        .unwrap();
    assert_eq!(moved.wallet_id, dst.wallet_id);
    assert_eq!(moved.name, h.name);
    assert_eq!(moved.amount, h.amount);
    assert_eq!(moved.history_at, h.history_at);

    assert!(histories
        .get_history(dst.wallet_id, h.history_id)
        .await
        .is_ok());
    assert!(histories
        .get_history(src.wallet_id, h.history_id)
        .await
        .unwrap_err()
        .is_not_found());
}

#[tokio::test]
async fn test_move_history_to_same_wallet_is_noop() {
    let (_, wallets, histories) = services();
    let w = wallets.create_wallet("Only".to_string()).await.unwrap();
    let h = histories
        .create_history(w.wallet_id, new_history("Rent", 1200, HistoryType::Outcome, 2))
        .await
        .unwrap();

    let moved = histories
        .move_history(w.wallet_id, h.history_id, w.wallet_id)
        .await
        .unwrap();
    assert_eq!(moved, h);
    assert_eq!(
        histories.get_history(w.wallet_id, h.history_id).await.unwrap(),
        h
    );
}

#[tokio::test]
async fn test_move_history_to_missing_wallet_leaves_history() {
    let (executor, wallets, histories) = services();
    let w = wallets.create_wallet("Only".to_string()).await.unwrap();
    let h = histories
        .create_history(w.wallet_id, new_history("Rent", 1200, HistoryType::Outcome, 2))
        .await
        .unwrap();
    let before = executor.snapshot().histories;

    let err = histories
        .move_history(w.wallet_id, h.history_id, 999)
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::Wallet, 999);
    assert_eq!(executor.snapshot().histories, before);
}

#[tokio::test]
async fn test_move_unknown_history_is_not_found() {
    let (_, wallets, histories) = services();
    let a = wallets.create_wallet("A".to_string()).await.unwrap();
    let b = wallets.create_wallet("B".to_string()).await.unwrap();
    let err = histories
        .move_history(a.wallet_id, 31, b.wallet_id)
        .await
        .unwrap_err();
    assert_not_found(err, ResourceKind::History, 31);
}

#[tokio::test]
async fn test_groceries_and_bills_balances() {
    let (_, wallets, histories) = services();
    let groceries = wallets.create_wallet("Groceries".to_string()).await.unwrap();
    assert_eq!(groceries.wallet_id, 1);
    assert_eq!(groceries.balance(), 0);

    histories
        .create_history(1, new_history("Salary", 5000, HistoryType::Income, 1))
        .await
        .unwrap();
    assert_eq!(wallets.get_wallet(1).await.unwrap().balance(), 5000);

    let rent = histories
        .create_history(1, new_history("Rent", 1200, HistoryType::Outcome, 2))
        .await
        .unwrap();
    assert_eq!(wallets.get_wallet(1).await.unwrap().balance(), 3800);

    let bills = wallets.create_wallet("Bills".to_string()).await.unwrap();
    assert_eq!(bills.wallet_id, 2);
    histories
        .move_history(1, rent.history_id, bills.wallet_id)
        .await
        .unwrap();

    assert_eq!(wallets.get_wallet(1).await.unwrap().balance(), 5000);
    assert_eq!(wallets.get_wallet(2).await.unwrap().balance(), -1200);
}
