// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Keeps a transaction's direction in line with its category.
//!
//! The category wins: a mismatch is corrected in place, never rejected. This runs before
//! any balance delta is computed, since the delta sign depends on the corrected flag.

use crate::categories::category_is_income;
use crate::error::EngineResult;
use rusqlite::Connection;
use tracing::debug;

/// Direction implied by a category: income categories mean `is_expense == false`.
pub fn reconcile_direction(is_expense: bool, category_is_income: bool) -> bool {
    if category_is_income == is_expense {
        !category_is_income
    } else {
        is_expense
    }
}

/// Returns the `is_expense` flag to store for a record filed under `category_id`.
///
/// A record without a category, or whose category has vanished, keeps its flag.
pub fn enforce(conn: &Connection, category_id: Option<i64>, is_expense: bool) -> EngineResult<bool> {
    let Some(category_id) = category_id else {
        return Ok(is_expense);
    };
    let Some(is_income) = category_is_income(conn, category_id)? else {
        return Ok(is_expense);
    };
    let corrected = reconcile_direction(is_expense, is_income);
    if corrected != is_expense {
        debug!(category_id, is_income, "transaction direction corrected to match category");
    }
    Ok(corrected)
}
