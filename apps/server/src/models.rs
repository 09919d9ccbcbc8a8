//! Request and response payloads for the HTTP API.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use walletbook_core::wallets as core_wallets;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    Income,
    Outcome,
}

impl From<core_wallets::HistoryType> for HistoryType {
    fn from(t: core_wallets::HistoryType) -> Self {
        match t {
            core_wallets::HistoryType::Income => HistoryType::Income,
            core_wallets::HistoryType::Outcome => HistoryType::Outcome,
        }
    }
}

impl From<HistoryType> for core_wallets::HistoryType {
    fn from(t: HistoryType) -> Self {
        match t {
            HistoryType::Income => core_wallets::HistoryType::Income,
            HistoryType::Outcome => core_wallets::HistoryType::Outcome,
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct History {
    pub history_id: i32,
    pub name: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub history_type: HistoryType,
    pub history_at: DateTime<Utc>,
    pub wallet_id: i32,
}

impl From<core_wallets::History> for History {
    fn from(h: core_wallets::History) -> Self {
        Self {
            history_id: h.history_id,
            name: h.name,
            amount: h.amount,
            history_type: h.history_type.into(),
            history_at: h.history_at,
            wallet_id: h.wallet_id,
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct HistoryList {
    pub histories: Vec<History>,
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: i32,
    pub name: String,
    #[schema(value_type = i64)]
    pub balance: i128,
}

impl From<&core_wallets::Wallet> for Wallet {
    fn from(w: &core_wallets::Wallet) -> Self {
        Self {
            wallet_id: w.wallet_id,
            name: w.name.clone(),
            balance: w.balance(),
        }
    }
}

#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletWithHistories {
    pub wallet_id: i32,
    pub name: String,
    #[schema(value_type = i64)]
    pub balance: i128,
    pub histories: Vec<History>,
}

impl From<core_wallets::Wallet> for WalletWithHistories {
    fn from(w: core_wallets::Wallet) -> Self {
        let balance = w.balance();
        Self {
            wallet_id: w.wallet_id,
            name: w.name,
            balance,
            histories: w.histories.into_iter().map(History::from).collect(),
        }
    }
}

/// Wallet as returned by `GET /wallets/{id}`, with or without its histories.
#[derive(Serialize, Debug, Clone, ToSchema)]
#[serde(untagged)]
pub enum WalletDetail {
    WithHistories(WalletWithHistories),
    Summary(Wallet),
}

#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct WalletList {
    pub wallets: Vec<Wallet>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
pub struct WalletPayload {
    pub name: String,
}

impl WalletPayload {
    pub fn validated_name(self) -> Result<String, ApiError> {
        require_name(self.name)
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryPayload {
    pub name: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub history_type: HistoryType,
    /// Any RFC 3339 offset is accepted; the instant is kept in UTC.
    pub history_at: DateTime<FixedOffset>,
}

impl HistoryPayload {
    pub fn validate(self) -> Result<core_wallets::NewHistory, ApiError> {
        let name = require_name(self.name)?;
        if self.amount <= 0 {
            return Err(ApiError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }
        Ok(core_wallets::NewHistory {
            name,
            amount: self.amount,
            history_type: self.history_type.into(),
            history_at: self.history_at.with_timezone(&Utc),
        })
    }
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoveHistoryPayload {
    pub destination_id: i32,
}

#[derive(Deserialize, Debug, Default)]
pub struct WalletQuery {
    #[serde(default)]
    pub include_histories: bool,
}

fn require_name(name: String) -> Result<String, ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".to_string()));
    }
    Ok(name)
}
