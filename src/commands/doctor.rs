// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = find_issues(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn find_issues(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Direction disagrees with category
    let mut stmt = conn.prepare(
        "SELECT t.id, c.name FROM transactions t JOIN categories c ON t.category_id=c.id
         WHERE t.is_expense = c.is_income ORDER BY t.id",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let id: i64 = r.get(0)?;
        let cat: String = r.get(1)?;
        rows.push(vec![
            "direction_mismatch".into(),
            format!("transaction {} vs category '{}'", id, cat),
        ]);
    }

    // 2) Asset reference that no longer resolves
    let mut stmt2 = conn.prepare(
        "SELECT t.id, t.asset_id FROM transactions t LEFT JOIN assets a ON t.asset_id=a.id
         WHERE t.asset_id IS NOT NULL AND a.id IS NULL ORDER BY t.id",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let asset: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_asset".into(),
            format!("transaction {} -> asset {}", id, asset),
        ]);
    }

    Ok(rows)
}
