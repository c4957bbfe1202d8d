// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::{NewTransaction, TransactionPatch};
use crate::records::{self, create_transaction, delete_transaction, update_transaction};
use crate::utils::{maybe_print_json, now_utc, parse_datetime, parse_decimal, pretty_table};
use crate::EngineError;
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &mut Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let identity = settings.identity();
    let user_id = identity.require_user()?;
    match m.subcommand() {
        Some(("add", sub)) => add(conn, user_id, sub)?,
        Some(("update", sub)) => update(conn, user_id, sub)?,
        Some(("rm", sub)) => {
            let id = *sub.get_one::<i64>("id").unwrap();
            owned(conn, user_id, id)?;
            delete_transaction(conn, id)?;
            println!("Removed transaction {}", id);
        }
        Some(("list", sub)) => list(conn, user_id, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &mut Connection, user_id: &str, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let transaction_date = match sub.get_one::<String>("date") {
        Some(d) => parse_datetime(d)?,
        None => now_utc(),
    };
    let new = NewTransaction {
        user_id: user_id.to_string(),
        ledger_id: *sub.get_one::<i64>("ledger").unwrap(),
        asset_id: sub.get_one::<i64>("asset").copied(),
        category_id: sub.get_one::<i64>("category").copied(),
        amount,
        is_expense: !sub.get_flag("income"),
        transaction_date,
        notes: sub
            .get_one::<String>("note")
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
        include_in_stats: !sub.get_flag("exclude-from-stats"),
    };
    let id = create_transaction(conn, new)?;
    let stored = owned(conn, user_id, id)?;
    println!(
        "Recorded {} {} on {} (id {})",
        if stored.is_expense { "expense" } else { "income" },
        stored.amount,
        stored.transaction_date.format("%Y-%m-%d"),
        id
    );
    Ok(())
}

fn update(conn: &mut Connection, user_id: &str, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub.get_one::<i64>("id").unwrap();
    owned(conn, user_id, id)?;

    let mut patch = TransactionPatch {
        ledger_id: sub.get_one::<i64>("ledger").copied(),
        notes: sub.get_one::<String>("note").map(|s| s.trim().to_string()),
        include_in_stats: sub.get_one::<bool>("stats").copied(),
        ..TransactionPatch::default()
    };
    if let Some(a) = sub.get_one::<String>("amount") {
        patch.amount = Some(parse_decimal(a)?);
    }
    if sub.get_flag("no-asset") {
        patch.asset_id = Some(None);
    } else if let Some(a) = sub.get_one::<i64>("asset") {
        patch.asset_id = Some(Some(*a));
    }
    if sub.get_flag("no-category") {
        patch.category_id = Some(None);
    } else if let Some(c) = sub.get_one::<i64>("category") {
        patch.category_id = Some(Some(*c));
    }
    if sub.get_flag("expense") {
        patch.is_expense = Some(true);
    } else if sub.get_flag("income") {
        patch.is_expense = Some(false);
    }
    if let Some(d) = sub.get_one::<String>("date") {
        patch.transaction_date = Some(parse_datetime(d)?);
    }

    let stored = update_transaction(conn, id, patch)?;
    println!(
        "Updated transaction {}: {} {}",
        id,
        if stored.is_expense { "expense" } else { "income" },
        stored.amount
    );
    Ok(())
}

fn owned(
    conn: &Connection,
    user_id: &str,
    id: i64,
) -> Result<crate::models::TransactionRecord> {
    match records::load_transaction(conn, id)? {
        Some(rec) if rec.user_id == user_id => Ok(rec),
        _ => Err(EngineError::not_found(format!("transaction {}", id)).into()),
    }
}

fn list(conn: &Connection, user_id: &str, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, user_id, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.date.clone(),
                    r.asset.clone(),
                    r.signed_amount.clone(),
                    r.currency.clone(),
                    r.category.clone(),
                    r.notes.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "Date", "Asset", "Amount", "CCY", "Category", "Notes"],
                rows,
            )
        );
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub date: String,
    pub asset: String,
    pub signed_amount: String,
    pub currency: String,
    pub category: String,
    pub notes: String,
    pub include_in_stats: bool,
}

pub fn query_rows(
    conn: &Connection,
    user_id: &str,
    sub: &clap::ArgMatches,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT t.id, t.transaction_date, a.name, t.amount, t.is_expense, a.currency, c.name, t.notes, t.include_in_stats
         FROM transactions t LEFT JOIN assets a ON t.asset_id=a.id LEFT JOIN categories c ON t.category_id=c.id
         WHERE t.user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];

    if let Some(ledger) = sub.get_one::<i64>("ledger") {
        sql.push_str(" AND t.ledger_id=?");
        params_vec.push(ledger.to_string());
    }
    if let Some(asset) = sub.get_one::<i64>("asset") {
        sql.push_str(" AND t.asset_id=?");
        params_vec.push(asset.to_string());
    }
    if let Some(month) = sub.get_one::<String>("month") {
        sql.push_str(" AND substr(t.transaction_date,1,7)=?");
        params_vec.push(month.trim().into());
    }
    sql.push_str(" ORDER BY t.transaction_date DESC, t.id DESC");
    if let Some(limit) = sub.get_one::<usize>("limit") {
        sql.push_str(" LIMIT ?");
        params_vec.push(limit.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query(rusqlite::params_from_iter(params_vec.iter()))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(3)?;
        let is_expense: bool = r.get(4)?;
        let date: String = r.get(1)?;
        data.push(TransactionRow {
            id: r.get(0)?,
            date: date.chars().take(10).collect(),
            asset: r.get::<_, Option<String>>(2)?.unwrap_or_default(),
            signed_amount: if is_expense {
                format!("-{}", amount)
            } else {
                amount
            },
            currency: r.get::<_, Option<String>>(5)?.unwrap_or_default(),
            category: r.get::<_, Option<String>>(6)?.unwrap_or_default(),
            notes: r.get(7)?,
            include_in_stats: r.get(8)?,
        });
    }
    Ok(data)
}
