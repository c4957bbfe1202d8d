// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::categories::list_categories;
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let is_income = sub.get_flag("income");
            let sort = *sub.get_one::<i64>("sort").unwrap_or(&0);
            conn.execute(
                "INSERT INTO categories(name, is_income, sort_order) VALUES (?1, ?2, ?3)",
                params![name, is_income, sort],
            )?;
            println!(
                "Added {} category '{}' (id {})",
                if is_income { "income" } else { "expense" },
                name,
                conn.last_insert_rowid()
            );
        }
        Some(("asset-add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim();
            let typ = sub.get_one::<String>("type").unwrap().trim();
            let positive = !sub.get_flag("negative");
            let sort = *sub.get_one::<i64>("sort").unwrap_or(&0);
            conn.execute(
                "INSERT INTO asset_categories(name, category_type, is_positive_asset, sort_order)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, typ, positive, sort],
            )?;
            println!(
                "Added asset category '{}' (id {}, {})",
                name,
                conn.last_insert_rowid(),
                if positive { "asset" } else { "liability" }
            );
        }
        Some(("list", sub)) => {
            let data = list_categories(conn)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|c| {
                        vec![
                            c.id.to_string(),
                            c.name.clone(),
                            if c.is_income { "income" } else { "expense" }.to_string(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["ID", "Category", "Direction"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
