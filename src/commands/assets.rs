// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{Asset, Currency};
use crate::networth::{set_rate, total_assets};
use crate::records::MAX_AMOUNT;
use crate::utils::{fmt_money, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Result, bail};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let identity = settings.identity();
    let user_id = identity.require_user()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
            let balance = parse_decimal(sub.get_one::<String>("balance").unwrap())?;
            let category = sub.get_one::<i64>("category").copied();
            let include = !sub.get_flag("exclude-from-total");
            let notes = sub
                .get_one::<String>("notes")
                .map(|s| s.trim().to_string())
                .unwrap_or_default();
            let id = add_asset(conn, user_id, name, currency, balance, category, include, &notes)?;
            println!(
                "Added asset '{}' (id {}, {})",
                name,
                id,
                fmt_money(&balance, currency.as_str())
            );
        }
        Some(("list", sub)) => {
            let data = list_assets(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|a| {
                        vec![
                            a.id.to_string(),
                            a.name.clone(),
                            fmt_money(&a.balance, a.currency.as_str()),
                            if a.include_in_total { "yes" } else { "no" }.to_string(),
                        ]
                    })
                    .collect();
                println!(
                    "{}",
                    pretty_table(&["ID", "Name", "Balance", "In total"], rows)
                );
            }
        }
        Some(("networth", sub)) => {
            let summary = total_assets(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &summary)? {
                let mut rows: Vec<Vec<String>> = summary
                    .by_currency
                    .iter()
                    .map(|(ccy, t)| {
                        vec![
                            ccy.to_string(),
                            fmt_money(&t.positive, ccy.as_str()),
                            fmt_money(&t.negative, ccy.as_str()),
                            fmt_money(&t.net, ccy.as_str()),
                            fmt_money(&t.net_in_usd, "USD"),
                        ]
                    })
                    .collect();
                rows.push(vec![
                    "TOTAL".to_string(),
                    fmt_money(&summary.total_positive_usd, "USD"),
                    fmt_money(&summary.total_negative_usd, "USD"),
                    String::new(),
                    fmt_money(&summary.net_asset_usd, "USD"),
                ]);
                println!(
                    "{}",
                    pretty_table(&["CCY", "Assets", "Liabilities", "Net", "Net (USD)"], rows)
                );
            }
        }
        Some(("rate", sub)) => {
            let currency: Currency = sub.get_one::<String>("currency").unwrap().parse()?;
            let rate = parse_decimal(sub.get_one::<String>("usd").unwrap())?;
            if rate <= Decimal::ZERO {
                bail!("Rate must be positive, got {}", rate);
            }
            set_rate(conn, currency, rate)?;
            println!("1 {} = {} USD", currency, rate);
        }
        _ => {}
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn add_asset(
    conn: &Connection,
    user_id: &str,
    name: &str,
    currency: Currency,
    balance: Decimal,
    category_id: Option<i64>,
    include_in_total: bool,
    notes: &str,
) -> Result<i64> {
    if balance.abs() >= Decimal::from(MAX_AMOUNT) {
        bail!("Opening balance must be below {} in magnitude", MAX_AMOUNT);
    }
    conn.execute(
        "INSERT INTO assets(user_id, name, category_id, currency, balance, include_in_total, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            user_id,
            name,
            category_id,
            currency,
            balance.round_dp(2).to_string(),
            include_in_total,
            notes
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_assets(conn: &Connection, user_id: &str) -> Result<Vec<Asset>> {
    let sql = format!(
        "SELECT {} FROM assets WHERE user_id=?1 ORDER BY CAST(balance AS REAL) DESC, name",
        Asset::COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![user_id], Asset::from_row)?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}
