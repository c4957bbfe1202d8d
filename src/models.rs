// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::EngineError;
use crate::utils::decimal_col;
use chrono::NaiveDateTime;
use rusqlite::Row;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Cny,
    Eur,
    Jpy,
    Krw,
}

impl Currency {
    pub const ALL: [Currency; 5] = [
        Currency::Usd,
        Currency::Cny,
        Currency::Eur,
        Currency::Jpy,
        Currency::Krw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Cny => "CNY",
            Currency::Eur => "EUR",
            Currency::Jpy => "JPY",
            Currency::Krw => "KRW",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| {
                EngineError::validation(format!(
                    "unsupported currency '{}', expected one of USD, CNY, EUR, JPY, KRW",
                    s
                ))
            })
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: i64,
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub id: i64,
    pub user_id: String,
    pub name: String,
    pub category_id: Option<i64>,
    pub currency: Currency,
    pub balance: Decimal,
    pub include_in_total: bool,
    pub notes: String,
}

impl Asset {
    pub const COLUMNS: &'static str =
        "id, user_id, name, category_id, currency, balance, include_in_total, notes";

    pub fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Asset {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
            category_id: r.get(3)?,
            currency: r.get(4)?,
            balance: decimal_col(r, 5)?,
            include_in_total: r.get(6)?,
            notes: r.get(7)?,
        })
    }
}

/// A transaction category. `is_income` decides the direction of every transaction filed under it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub is_income: bool,
    pub sort_order: i64,
}

/// A persisted transaction, also used as the explicit before/after snapshot on update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub user_id: String,
    pub ledger_id: i64,
    pub asset_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub is_expense: bool,
    pub transaction_date: NaiveDateTime,
    pub notes: String,
    pub include_in_stats: bool,
}

impl TransactionRecord {
    pub const COLUMNS: &'static str = "id, user_id, ledger_id, asset_id, category_id, amount, \
         is_expense, transaction_date, notes, include_in_stats";

    pub fn from_row(r: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(TransactionRecord {
            id: r.get(0)?,
            user_id: r.get(1)?,
            ledger_id: r.get(2)?,
            asset_id: r.get(3)?,
            category_id: r.get(4)?,
            amount: decimal_col(r, 5)?,
            is_expense: r.get(6)?,
            transaction_date: r.get(7)?,
            notes: r.get(8)?,
            include_in_stats: r.get(9)?,
        })
    }

    /// The signed amount this record contributes to its asset's balance.
    pub fn signed_effect(&self) -> Decimal {
        crate::ledger::signed_effect(self.amount, self.is_expense)
    }

    /// True when `other` would move a balance differently than `self`.
    pub fn affects_balance_differently(&self, other: &TransactionRecord) -> bool {
        self.asset_id != other.asset_id
            || self.amount != other.amount
            || self.is_expense != other.is_expense
    }

    pub fn with_patch(mut self, patch: TransactionPatch) -> Self {
        if let Some(ledger_id) = patch.ledger_id {
            self.ledger_id = ledger_id;
        }
        if let Some(asset_id) = patch.asset_id {
            self.asset_id = asset_id;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(is_expense) = patch.is_expense {
            self.is_expense = is_expense;
        }
        if let Some(date) = patch.transaction_date {
            self.transaction_date = date;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(include) = patch.include_in_stats {
            self.include_in_stats = include;
        }
        self
    }
}

#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: String,
    pub ledger_id: i64,
    pub asset_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Decimal,
    pub is_expense: bool,
    pub transaction_date: NaiveDateTime,
    pub notes: String,
    pub include_in_stats: bool,
}

/// Field changes for an update. `None` leaves a field alone; for nullable references
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default)]
pub struct TransactionPatch {
    pub ledger_id: Option<i64>,
    pub asset_id: Option<Option<i64>>,
    pub category_id: Option<Option<i64>>,
    pub amount: Option<Decimal>,
    pub is_expense: Option<bool>,
    pub transaction_date: Option<NaiveDateTime>,
    pub notes: Option<String>,
    pub include_in_stats: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    User,
    Assistant,
    System,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::User => "user",
            MessageKind::Assistant => "assistant",
            MessageKind::System => "system",
        }
    }
}

impl ToSql for MessageKind {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for MessageKind {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "user" => Ok(MessageKind::User),
            "assistant" => Ok(MessageKind::Assistant),
            "system" => Ok(MessageKind::System),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageSession {
    pub id: i64,
    pub user_id: String,
    pub model: String,
    pub assistant_name: Option<String>,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub session_id: i64,
    pub user_id: Option<String>,
    pub content: String,
    pub kind: MessageKind,
    pub is_voice: bool,
    pub transaction_ids: Vec<i64>,
    pub seed: i64,
    pub emoji: String,
    pub created_at: NaiveDateTime,
}

/// Messages keep their linked transactions as `"1,2,3"`, with `"0"` meaning none.
pub fn encode_transaction_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        return "0".to_string();
    }
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

pub fn decode_transaction_ids(raw: &str) -> Vec<i64> {
    if raw.trim().is_empty() || raw.trim() == "0" {
        return Vec::new();
    }
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|s| s.parse().ok())
        .collect()
}
