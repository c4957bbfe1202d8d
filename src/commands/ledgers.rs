// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::Settings;
use crate::models::Ledger;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let identity = settings.identity();
    let user_id = identity.require_user()?;
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let id = add_ledger(conn, user_id, name)?;
            println!("Added ledger '{}' (id {})", name, id);
        }
        Some(("list", sub)) => {
            let data = list_ledgers(conn, user_id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|l| vec![l.id.to_string(), l.name.clone()])
                    .collect();
                println!("{}", pretty_table(&["ID", "Name"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn add_ledger(conn: &Connection, user_id: &str, name: &str) -> Result<i64> {
    conn.execute(
        "INSERT INTO ledgers(user_id, name) VALUES (?1, ?2)",
        params![user_id, name],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_ledgers(conn: &Connection, user_id: &str) -> Result<Vec<Ledger>> {
    let mut stmt = conn.prepare("SELECT id, user_id, name FROM ledgers WHERE user_id=?1 ORDER BY id")?;
    let rows = stmt.query_map(params![user_id], |r| {
        Ok(Ledger {
            id: r.get(0)?,
            user_id: r.get(1)?,
            name: r.get(2)?,
        })
    })?;
    let mut data = Vec::new();
    for row in rows {
        data.push(row?);
    }
    Ok(data)
}
