// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Balance ledger: the only code that writes `assets.balance`.
//!
//! Every call is a read-modify-write of one asset row and must run inside the caller's
//! SQLite transaction, which is what makes it atomic against concurrent writers.
//! A missing asset is logged and skipped so a dangling reference never aborts the
//! enclosing transaction-record operation.

use crate::error::{EngineError, EngineResult};
use crate::utils::decimal_col;
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Delta a transaction contributes to its asset: expenses subtract, income adds.
pub fn signed_effect(amount: Decimal, is_expense: bool) -> Decimal {
    if is_expense { -amount } else { amount }
}

/// Adds `delta` to the asset's balance. Returns `false` when the asset does not exist.
pub fn apply_delta(conn: &Connection, asset_id: i64, delta: Decimal) -> EngineResult<bool> {
    let Some(balance) = balance_of(conn, asset_id)? else {
        warn!(asset_id, %delta, "asset not found; balance delta skipped");
        return Ok(false);
    };
    let next = balance
        .checked_add(delta)
        .ok_or_else(|| {
            EngineError::validation(format!("balance of asset {} would overflow", asset_id))
        })?
        .round_dp(2);
    conn.execute(
        "UPDATE assets SET balance=?1, updated_at=datetime('now') WHERE id=?2",
        params![next.to_string(), asset_id],
    )?;
    debug!(asset_id, %balance, %delta, %next, "balance updated");
    Ok(true)
}

/// Reverses a previously applied effect.
pub fn undo_effect(conn: &Connection, asset_id: i64, effect: Decimal) -> EngineResult<bool> {
    apply_delta(conn, asset_id, -effect)
}

pub fn balance_of(conn: &Connection, asset_id: i64) -> EngineResult<Option<Decimal>> {
    let balance = conn
        .query_row(
            "SELECT balance FROM assets WHERE id=?1",
            params![asset_id],
            |r| decimal_col(r, 0),
        )
        .optional()?;
    Ok(balance)
}
