// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Transaction record store.
//!
//! Every mutation keeps asset balances reconciled through the balance ledger:
//!
//! - create: write the row, then apply the new effect to its asset;
//! - update: undo the previous effect on the previous asset, write the new fields,
//!   then apply the new effect to the new asset (skipped entirely when asset, amount
//!   and direction are unchanged);
//! - delete: undo the current effect, then remove the row.
//!
//! The `create_*`/`update_*`/`delete_*` entry points open their own `IMMEDIATE` SQLite
//! transaction. The `insert_*`/`reconcile_update`/`remove_*` building blocks expect the
//! caller to hold one already, which is how the turn orchestrator batches them.

use crate::error::{EngineError, EngineResult};
use crate::guard;
use crate::ledger;
use crate::models::{NewTransaction, TransactionPatch, TransactionRecord};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use rust_decimal::Decimal;
use tracing::debug;

pub fn create_transaction(conn: &mut Connection, new: NewTransaction) -> EngineResult<i64> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let id = insert_transaction(&tx, new)?;
    tx.commit()?;
    Ok(id)
}

pub fn update_transaction(
    conn: &mut Connection,
    id: i64,
    patch: TransactionPatch,
) -> EngineResult<TransactionRecord> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let previous = load_transaction(&tx, id)?
        .ok_or_else(|| EngineError::not_found(format!("transaction {}", id)))?;
    let next = prepare_update(&tx, &previous, patch)?;
    reconcile_update(&tx, &previous, &next)?;
    tx.commit()?;
    Ok(next)
}

pub fn delete_transaction(conn: &mut Connection, id: i64) -> EngineResult<()> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = load_transaction(&tx, id)?
        .ok_or_else(|| EngineError::not_found(format!("transaction {}", id)))?;
    remove_transaction(&tx, &current)?;
    tx.commit()?;
    Ok(())
}

/// Validates, guards and writes a new record, then applies its effect.
pub fn insert_transaction(conn: &Connection, mut new: NewTransaction) -> EngineResult<i64> {
    new.amount = validate_amount(new.amount)?;
    ensure_ledger(conn, &new.user_id, new.ledger_id)?;
    if let Some(asset_id) = new.asset_id {
        ensure_asset(conn, &new.user_id, asset_id)?;
    }
    if let Some(category_id) = new.category_id {
        ensure_category(conn, category_id)?;
    }
    new.is_expense = guard::enforce(conn, new.category_id, new.is_expense)?;

    conn.execute(
        "INSERT INTO transactions(user_id, ledger_id, asset_id, category_id, amount, is_expense,
             transaction_date, notes, include_in_stats)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            new.user_id,
            new.ledger_id,
            new.asset_id,
            new.category_id,
            new.amount.to_string(),
            new.is_expense,
            new.transaction_date,
            new.notes,
            new.include_in_stats
        ],
    )?;
    let id = conn.last_insert_rowid();

    if let Some(asset_id) = new.asset_id {
        ledger::apply_delta(conn, asset_id, ledger::signed_effect(new.amount, new.is_expense))?;
    }
    debug!(id, asset_id = ?new.asset_id, amount = %new.amount, is_expense = new.is_expense, "transaction created");
    Ok(id)
}

/// Builds the record an update will store: patch applied, amount validated, direction guarded.
pub fn prepare_update(
    conn: &Connection,
    previous: &TransactionRecord,
    patch: TransactionPatch,
) -> EngineResult<TransactionRecord> {
    let mut next = previous.clone().with_patch(patch);
    next.amount = validate_amount(next.amount)?;
    if next.ledger_id != previous.ledger_id {
        ensure_ledger(conn, &next.user_id, next.ledger_id)?;
    }
    if next.asset_id != previous.asset_id {
        if let Some(asset_id) = next.asset_id {
            ensure_asset(conn, &next.user_id, asset_id)?;
        }
    }
    if next.category_id != previous.category_id {
        if let Some(category_id) = next.category_id {
            ensure_category(conn, category_id)?;
        }
    }
    next.is_expense = guard::enforce(conn, next.category_id, next.is_expense)?;
    Ok(next)
}

/// Stores `next` over `previous`, moving balances only when the balance-relevant
/// fields differ. The undo against the old asset is issued before the row is rewritten
/// and the apply against the new asset after it.
pub fn reconcile_update(
    conn: &Connection,
    previous: &TransactionRecord,
    next: &TransactionRecord,
) -> EngineResult<()> {
    let moves_balance = previous.affects_balance_differently(next);

    if moves_balance {
        if let Some(old_asset) = previous.asset_id {
            ledger::undo_effect(conn, old_asset, previous.signed_effect())?;
        }
    }

    let changed = conn.execute(
        "UPDATE transactions SET ledger_id=?1, asset_id=?2, category_id=?3, amount=?4,
             is_expense=?5, transaction_date=?6, notes=?7, include_in_stats=?8,
             updated_at=datetime('now')
         WHERE id=?9",
        params![
            next.ledger_id,
            next.asset_id,
            next.category_id,
            next.amount.to_string(),
            next.is_expense,
            next.transaction_date,
            next.notes,
            next.include_in_stats,
            previous.id
        ],
    )?;
    if changed == 0 {
        return Err(EngineError::not_found(format!("transaction {}", previous.id)));
    }

    if moves_balance {
        if let Some(new_asset) = next.asset_id {
            ledger::apply_delta(conn, new_asset, next.signed_effect())?;
        }
    }
    debug!(id = previous.id, moves_balance, "transaction updated");
    Ok(())
}

pub fn remove_transaction(conn: &Connection, current: &TransactionRecord) -> EngineResult<()> {
    if let Some(asset_id) = current.asset_id {
        ledger::undo_effect(conn, asset_id, current.signed_effect())?;
    }
    conn.execute("DELETE FROM transactions WHERE id=?1", params![current.id])?;
    debug!(id = current.id, "transaction deleted");
    Ok(())
}

pub fn load_transaction(conn: &Connection, id: i64) -> EngineResult<Option<TransactionRecord>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE id=?1",
        TransactionRecord::COLUMNS
    );
    let rec = conn
        .query_row(&sql, params![id], TransactionRecord::from_row)
        .optional()?;
    Ok(rec)
}

pub fn transactions_for_asset(
    conn: &Connection,
    asset_id: i64,
) -> EngineResult<Vec<TransactionRecord>> {
    let sql = format!(
        "SELECT {} FROM transactions WHERE asset_id=?1 ORDER BY transaction_date, id",
        TransactionRecord::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![asset_id], TransactionRecord::from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Exclusive upper bound on a single amount: 15 integer digits, 2 decimal places.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000_000;

/// Amounts are non-negative, below [`MAX_AMOUNT`], and kept at two decimal places.
fn validate_amount(amount: Decimal) -> EngineResult<Decimal> {
    if amount < Decimal::ZERO {
        return Err(EngineError::validation(format!(
            "amount must not be negative, got {}",
            amount
        )));
    }
    if amount >= Decimal::from(MAX_AMOUNT) {
        return Err(EngineError::validation(format!(
            "amount must be below {}, got {}",
            MAX_AMOUNT, amount
        )));
    }
    Ok(amount.round_dp(2))
}

pub fn ensure_ledger(conn: &Connection, user_id: &str, ledger_id: i64) -> EngineResult<()> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT user_id FROM ledgers WHERE id=?1",
            params![ledger_id],
            |r| r.get(0),
        )
        .optional()?;
    match owner {
        Some(o) if o == user_id => Ok(()),
        _ => Err(EngineError::not_found(format!("ledger {}", ledger_id))),
    }
}

pub fn ensure_asset(conn: &Connection, user_id: &str, asset_id: i64) -> EngineResult<()> {
    let owner: Option<String> = conn
        .query_row(
            "SELECT user_id FROM assets WHERE id=?1",
            params![asset_id],
            |r| r.get(0),
        )
        .optional()?;
    match owner {
        Some(o) if o == user_id => Ok(()),
        _ => Err(EngineError::not_found(format!("asset {}", asset_id))),
    }
}

fn ensure_category(conn: &Connection, category_id: i64) -> EngineResult<()> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get(0),
        )
        .optional()?;
    exists
        .map(|_| ())
        .ok_or_else(|| EngineError::not_found(format!("category {}", category_id)))
}
