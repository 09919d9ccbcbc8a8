use diesel::prelude::*;
use diesel::SqliteConnection;
use log::error;

use walletbook_core::errors::{Error, Result};
use walletbook_core::wallets::{History, NewHistory, Wallet, WalletRepositoryTrait};

use super::model::{HistoryChangesetDB, HistoryDB, NewHistoryDB, NewWalletDB, WalletDB};
use crate::errors::IntoCore;
use crate::schema::{histories, wallets};
use crate::utils::chunk_for_sqlite;

/// Wallet repository bound to one connection that is already inside a
/// transaction.
///
/// Instances are created by the transaction executors in [`crate::db`]; they
/// never open or commit transactions themselves.
pub struct WalletRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> WalletRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    fn find_wallet_row(&mut self, wallet_id: i32) -> Result<Option<WalletDB>> {
        wallets::table
            .find(wallet_id)
            .select(WalletDB::as_select())
            .first::<WalletDB>(self.conn)
            .optional()
            .into_core()
    }

    fn find_history_row(&mut self, wallet_id: i32, history_id: i32) -> Result<Option<HistoryDB>> {
        histories::table
            .filter(histories::wallet_id.eq(wallet_id))
            .filter(histories::history_id.eq(history_id))
            .select(HistoryDB::as_select())
            .first::<HistoryDB>(self.conn)
            .optional()
            .into_core()
    }

    fn load_wallet(&mut self, wallet_db: WalletDB) -> Result<Wallet> {
        let histories_db = HistoryDB::belonging_to(&wallet_db)
            .select(HistoryDB::as_select())
            .order((histories::history_at.desc(), histories::history_id.desc()))
            .load::<HistoryDB>(self.conn)
            .into_core()?;
        wallet_db.into_wallet(histories_db)
    }
}

impl WalletRepositoryTrait for WalletRepository<'_> {
    fn add(&mut self, name: &str) -> Result<Wallet> {
        let wallet_db = diesel::insert_into(wallets::table)
            .values(&NewWalletDB {
                name: name.to_string(),
            })
            .returning(WalletDB::as_returning())
            .get_result::<WalletDB>(self.conn)
            .into_core()?;
        wallet_db.into_wallet(Vec::new())
    }

    fn get_by_id(&mut self, wallet_id: i32) -> Result<Option<Wallet>> {
        match self.find_wallet_row(wallet_id)? {
            Some(wallet_db) => self.load_wallet(wallet_db).map(Some),
            None => Ok(None),
        }
    }

    fn get_all(&mut self) -> Result<Vec<Wallet>> {
        let wallets_db = wallets::table
            .select(WalletDB::as_select())
            .order(wallets::wallet_id.asc())
            .load::<WalletDB>(self.conn)
            .into_core()?;

        let mut histories_db = Vec::new();
        for chunk in chunk_for_sqlite(&wallets_db) {
            let loaded = HistoryDB::belonging_to(chunk)
                .select(HistoryDB::as_select())
                .order((histories::history_at.desc(), histories::history_id.desc()))
                .load::<HistoryDB>(self.conn)
                .into_core()?;
            histories_db.extend(loaded);
        }

        let grouped = histories_db.grouped_by(&wallets_db);
        wallets_db
            .into_iter()
            .zip(grouped)
            .map(|(wallet_db, histories)| wallet_db.into_wallet(histories))
            .collect()
    }

    fn update(&mut self, wallet: &Wallet) -> Result<Wallet> {
        if self.find_wallet_row(wallet.wallet_id)?.is_none() {
            error!("Wallet {} vanished before update", wallet.wallet_id);
            return Err(Error::Unexpected(format!(
                "wallet {} does not exist",
                wallet.wallet_id
            )));
        }

        let wallet_db = diesel::update(wallets::table.find(wallet.wallet_id))
            .set(wallets::name.eq(&wallet.name))
            .returning(WalletDB::as_returning())
            .get_result::<WalletDB>(self.conn)
            .into_core()?;
        self.load_wallet(wallet_db)
    }

    fn delete(&mut self, wallet: &Wallet) -> Result<()> {
        if self.find_wallet_row(wallet.wallet_id)?.is_none() {
            return Ok(());
        }

        // The schema cascades as well; removing the children first keeps the
        // result independent of the connection's foreign_keys setting.
        diesel::delete(histories::table.filter(histories::wallet_id.eq(wallet.wallet_id)))
            .execute(self.conn)
            .into_core()?;
        diesel::delete(wallets::table.find(wallet.wallet_id))
            .execute(self.conn)
            .into_core()?;
        Ok(())
    }

    fn add_history(&mut self, wallet_id: i32, new_history: NewHistory) -> Result<History> {
        let wallet_db = self.find_wallet_row(wallet_id)?.ok_or_else(|| {
            error!("Wallet {} vanished before adding a history", wallet_id);
            Error::Unexpected(format!("wallet {} does not exist", wallet_id))
        })?;

        let history_db = diesel::insert_into(histories::table)
            .values(&NewHistoryDB::new(wallet_db.wallet_id, new_history))
            .returning(HistoryDB::as_returning())
            .get_result::<HistoryDB>(self.conn)
            .into_core()?;
        History::try_from(history_db)
    }

    fn get_history_by_id(&mut self, wallet_id: i32, history_id: i32) -> Result<Option<History>> {
        self.find_history_row(wallet_id, history_id)?
            .map(History::try_from)
            .transpose()
    }

    fn update_history(&mut self, wallet_id: i32, history: &History) -> Result<History> {
        let existing = self
            .find_history_row(wallet_id, history.history_id)?
            .ok_or_else(|| {
                error!(
                    "History {} vanished from wallet {} before update",
                    history.history_id, wallet_id
                );
                Error::Unexpected(format!(
                    "history {} does not exist in wallet {}",
                    history.history_id, wallet_id
                ))
            })?;

        let history_db = diesel::update(histories::table.find(existing.history_id))
            .set(&HistoryChangesetDB::from(history))
            .returning(HistoryDB::as_returning())
            .get_result::<HistoryDB>(self.conn)
            .into_core()?;
        History::try_from(history_db)
    }

    fn delete_history(&mut self, wallet_id: i32, history: &History) -> Result<()> {
        diesel::delete(
            histories::table
                .filter(histories::wallet_id.eq(wallet_id))
                .filter(histories::history_id.eq(history.history_id)),
        )
        .execute(self.conn)
        .into_core()?;
        Ok(())
    }
}
