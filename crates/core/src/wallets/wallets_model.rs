//! Wallet and history domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};

/// Direction of a history entry. The stored amount is always positive;
/// the sign comes from this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryType {
    Income,
    Outcome,
}

impl HistoryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryType::Income => "INCOME",
            HistoryType::Outcome => "OUTCOME",
        }
    }

    /// Applies the direction to a positive amount.
    pub fn signed(&self, amount: i64) -> i64 {
        match self {
            HistoryType::Income => amount,
            HistoryType::Outcome => -amount,
        }
    }
}

impl fmt::Display for HistoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INCOME" => Ok(HistoryType::Income),
            "OUTCOME" => Ok(HistoryType::Outcome),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown history type: {}",
                other
            )))),
        }
    }
}

/// A single dated income or outcome entry owned by one wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

impl History {
    /// Amount with the sign of its type applied.
    pub fn signed_amount(&self) -> i64 {
        self.history_type.signed(self.amount)
    }
}

/// Input model for creating a history entry under an existing wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHistory {
    pub name: String,
    pub amount: i64,
    #[serde(rename = "type")]
    pub history_type: HistoryType,
    pub history_at: DateTime<Utc>,
}

/// Domain model representing a wallet and its loaded histories.
///
/// `histories` is always fully materialized and ordered by `history_at`,
/// newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub wallet_id: i32,
    pub name: String,
    pub histories: Vec<History>,
}

impl Wallet {
    /// Sum of incomes minus sum of outcomes.
    ///
    /// Accumulated in `i128`: every amount is a positive `i64`, so the total of
    /// a wallet's entries can exceed the `i64` range.
    pub fn balance(&self) -> i128 {
        self.histories
            .iter()
            .map(|h| i128::from(h.signed_amount()))
            .sum()
    }
}

/// Sorts histories into the read order exposed by `Wallet::histories`.
pub fn sort_histories_desc(histories: &mut [History]) {
    histories.sort_by(|a, b| {
        b.history_at
            .cmp(&a.history_at)
            .then_with(|| b.history_id.cmp(&a.history_id))
    });
}
