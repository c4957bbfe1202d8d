// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::EngineResult;
use crate::models::Category;
use rusqlite::{Connection, OptionalExtension, params};

/// Name of the catch-all category tried when a name matches nothing.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Maps a free-form category name to a category id with the same income flag.
///
/// Tries a case-insensitive containment match, then the `Others` category, then any
/// category with that flag. Returns `None` only when no category has that flag.
pub fn resolve_category_id(
    conn: &Connection,
    name: &str,
    is_income: bool,
) -> EngineResult<Option<i64>> {
    let name = name.trim();
    if !name.is_empty() {
        let pattern = format!("%{}%", escape_like(name));
        let hit: Option<i64> = conn
            .query_row(
                "SELECT id FROM categories WHERE is_income=?1 AND name LIKE ?2 ESCAPE '\\'
                 ORDER BY sort_order, name, id LIMIT 1",
                params![is_income, pattern],
                |r| r.get(0),
            )
            .optional()?;
        if hit.is_some() {
            return Ok(hit);
        }
    }

    let others: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE is_income=?1 AND name=?2 ORDER BY id LIMIT 1",
            params![is_income, FALLBACK_CATEGORY],
            |r| r.get(0),
        )
        .optional()?;
    if others.is_some() {
        return Ok(others);
    }

    let first: Option<i64> = conn
        .query_row(
            "SELECT id FROM categories WHERE is_income=?1 ORDER BY sort_order, name, id LIMIT 1",
            params![is_income],
            |r| r.get(0),
        )
        .optional()?;
    Ok(first)
}

pub fn category_is_income(conn: &Connection, category_id: i64) -> EngineResult<Option<bool>> {
    let v = conn
        .query_row(
            "SELECT is_income FROM categories WHERE id=?1",
            params![category_id],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn list_categories(conn: &Connection) -> EngineResult<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, is_income, sort_order FROM categories
         ORDER BY sort_order, is_income DESC, name",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok(Category {
            id: r.get(0)?,
            name: r.get(1)?,
            is_income: r.get(2)?,
            sort_order: r.get(3)?,
        })
    })?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
