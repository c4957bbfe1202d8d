// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-side aggregation of asset balances into a USD net worth.
//!
//! Balances are kept in each asset's own currency; conversion happens only here.
//! Assets in a negative category (credit cards, loans) count against the total.

use crate::error::EngineResult;
use crate::models::{Asset, Currency};
use crate::utils::decimal_col;
use rusqlite::{Connection, params};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct CurrencyTotals {
    pub positive: Decimal,
    pub negative: Decimal,
    pub net: Decimal,
    pub net_in_usd: Decimal,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NetWorthSummary {
    pub total_positive_usd: Decimal,
    pub total_negative_usd: Decimal,
    pub net_asset_usd: Decimal,
    pub by_currency: BTreeMap<Currency, CurrencyTotals>,
    pub asset_count: usize,
}

pub fn set_rate(conn: &Connection, currency: Currency, rate_to_usd: Decimal) -> EngineResult<()> {
    conn.execute(
        "INSERT INTO currency_rates(currency, rate_to_usd) VALUES(?1, ?2)
         ON CONFLICT(currency) DO UPDATE SET rate_to_usd=excluded.rate_to_usd,
             updated_at=datetime('now')",
        params![currency, rate_to_usd.to_string()],
    )?;
    Ok(())
}

pub fn rates_to_usd(conn: &Connection) -> EngineResult<HashMap<Currency, Decimal>> {
    let mut stmt = conn.prepare("SELECT currency, rate_to_usd FROM currency_rates")?;
    let rows = stmt.query_map([], |r| Ok((r.get::<_, Currency>(0)?, decimal_col(r, 1)?)))?;
    let mut out = HashMap::new();
    for row in rows {
        let (c, rate) = row?;
        out.insert(c, rate);
    }
    Ok(out)
}

/// Aggregates the user's `include_in_total` assets. A missing rate converts 1:1.
pub fn total_assets(conn: &Connection, user_id: &str) -> EngineResult<NetWorthSummary> {
    let rates = rates_to_usd(conn)?;
    let sql = format!(
        "SELECT a.{cols}, COALESCE(c.is_positive_asset, 1)
         FROM assets a LEFT JOIN asset_categories c ON a.category_id=c.id
         WHERE a.user_id=?1 AND a.include_in_total=1
         ORDER BY a.id",
        cols = Asset::COLUMNS.replace(", ", ", a.")
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok((Asset::from_row(r)?, r.get::<_, bool>(8)?))
    })?;

    let mut total_positive = Decimal::ZERO;
    let mut total_negative = Decimal::ZERO;
    let mut by_currency: BTreeMap<Currency, CurrencyTotals> = BTreeMap::new();
    let mut asset_count = 0;
    for row in rows {
        let (asset, is_positive) = row?;
        asset_count += 1;
        let rate = rate_for(&rates, asset.currency);
        let usd = asset.balance * rate;
        let entry = by_currency.entry(asset.currency).or_default();
        if is_positive {
            total_positive += usd;
            entry.positive += asset.balance;
        } else {
            total_negative += usd;
            entry.negative += asset.balance;
        }
    }
    for (currency, totals) in by_currency.iter_mut() {
        let rate = rate_for(&rates, *currency);
        totals.positive = totals.positive.round_dp(2);
        totals.negative = totals.negative.round_dp(2);
        totals.net = (totals.positive - totals.negative).round_dp(2);
        totals.net_in_usd = (totals.net * rate).round_dp(2);
    }

    Ok(NetWorthSummary {
        total_positive_usd: total_positive.round_dp(2),
        total_negative_usd: total_negative.round_dp(2),
        net_asset_usd: (total_positive - total_negative).round_dp(2),
        by_currency,
        asset_count,
    })
}

fn rate_for(rates: &HashMap<Currency, Decimal>, currency: Currency) -> Decimal {
    if currency == Currency::Usd {
        return Decimal::ONE;
    }
    rates.get(&currency).copied().unwrap_or(Decimal::ONE)
}
