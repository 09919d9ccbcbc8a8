//! Database models for wallets and histories.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;

use walletbook_core::errors::{DatabaseError, Error, Result};
use walletbook_core::wallets::{History, NewHistory, Wallet};

/// Database model for wallets
#[derive(Queryable, Identifiable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
#[diesel(primary_key(wallet_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct WalletDB {
    pub wallet_id: i32,
    pub name: String,
}

impl WalletDB {
    /// Builds the domain wallet from this row and its already-loaded histories.
    pub fn into_wallet(self, histories: Vec<HistoryDB>) -> Result<Wallet> {
        let histories = histories
            .into_iter()
            .map(History::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Wallet {
            wallet_id: self.wallet_id,
            name: self.name,
            histories,
        })
    }
}

/// Database model for creating a new wallet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::wallets)]
pub struct NewWalletDB {
    pub name: String,
}

/// Database model for histories
#[derive(Queryable, Identifiable, Associations, Selectable, PartialEq, Debug, Clone)]
#[diesel(belongs_to(WalletDB, foreign_key = wallet_id))]
#[diesel(table_name = crate::schema::histories)]
#[diesel(primary_key(history_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryDB {
    pub history_id: i32,
    pub name: String,
    pub amount: i64,
    pub history_type: String,
    pub wallet_id: i32,
    /// Always UTC.
    pub history_at: NaiveDateTime,
}

impl TryFrom<HistoryDB> for History {
    type Error = Error;

    fn try_from(db: HistoryDB) -> Result<Self> {
        // The column is CHECK-constrained, so an unknown value means a corrupt row.
        let history_type = db.history_type.parse().map_err(|_| {
            Error::Database(DatabaseError::Internal(format!(
                "history {} has unknown type '{}'",
                db.history_id, db.history_type
            )))
        })?;
        Ok(Self {
            history_id: db.history_id,
            name: db.name,
            amount: db.amount,
            history_type,
            history_at: DateTime::from_naive_utc_and_offset(db.history_at, Utc),
            wallet_id: db.wallet_id,
        })
    }
}

/// Database model for inserting a history under a wallet
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::histories)]
pub struct NewHistoryDB {
    pub name: String,
    pub amount: i64,
    pub history_type: String,
    pub wallet_id: i32,
    pub history_at: NaiveDateTime,
}

impl NewHistoryDB {
    pub fn new(wallet_id: i32, domain: NewHistory) -> Self {
        Self {
            name: domain.name,
            amount: domain.amount,
            history_type: domain.history_type.as_str().to_string(),
            wallet_id,
            history_at: domain.history_at.naive_utc(),
        }
    }
}

/// Every mutable column of a history, owner included.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::histories)]
pub struct HistoryChangesetDB {
    pub name: String,
    pub amount: i64,
    pub history_type: String,
    pub wallet_id: i32,
    pub history_at: NaiveDateTime,
}

impl From<&History> for HistoryChangesetDB {
    fn from(domain: &History) -> Self {
        Self {
            name: domain.name.clone(),
            amount: domain.amount,
            history_type: domain.history_type.as_str().to_string(),
            wallet_id: domain.wallet_id,
            history_at: domain.history_at.naive_utc(),
        }
    }
}
