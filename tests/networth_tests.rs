// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketclip::commands::assets::add_asset;
use pocketclip::models::Currency;
use pocketclip::networth::{set_rate, total_assets};
use pocketclip::db;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO asset_categories(id,name,category_type,is_positive_asset) VALUES (1,'Bank','bank',1);
         INSERT INTO asset_categories(id,name,category_type,is_positive_asset) VALUES (2,'Credit card','credit',0);",
    )
    .unwrap();
    add_asset(&conn, "u1", "Checking", Currency::Usd, dec("1000"), Some(1), true, "").unwrap();
    add_asset(&conn, "u1", "Card", Currency::Usd, dec("250"), Some(2), true, "").unwrap();
    add_asset(&conn, "u1", "Alipay", Currency::Cny, dec("700"), None, true, "").unwrap();
    add_asset(&conn, "u1", "Hidden", Currency::Usd, dec("5000"), Some(1), false, "").unwrap();
    add_asset(&conn, "u2", "Theirs", Currency::Usd, dec("9"), None, true, "").unwrap();
    conn
}

#[test]
fn missing_rate_converts_one_to_one() {
    let conn = setup();
    let s = total_assets(&conn, "u1").unwrap();
    assert_eq!(s.asset_count, 3);
    assert_eq!(s.total_positive_usd, dec("1700.00"));
    assert_eq!(s.total_negative_usd, dec("250.00"));
    assert_eq!(s.net_asset_usd, dec("1450.00"));
}

#[test]
fn rates_apply_per_currency() {
    let conn = setup();
    set_rate(&conn, Currency::Cny, dec("0.14")).unwrap();
    let s = total_assets(&conn, "u1").unwrap();
    assert_eq!(s.total_positive_usd, dec("1098.00"));
    assert_eq!(s.net_asset_usd, dec("848.00"));

    let cny = &s.by_currency[&Currency::Cny];
    assert_eq!(cny.net, dec("700.00"));
    assert_eq!(cny.net_in_usd, dec("98.00"));
    let usd = &s.by_currency[&Currency::Usd];
    assert_eq!(usd.positive, dec("1000.00"));
    assert_eq!(usd.negative, dec("250.00"));
    assert_eq!(usd.net, dec("750.00"));
}

#[test]
fn opening_balance_must_be_bounded() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let huge = dec("70000000000000000000000000000");
    assert!(add_asset(&conn, "u1", "Huge", Currency::Usd, huge, None, true, "").is_err());
    assert!(add_asset(&conn, "u1", "Debt", Currency::Usd, -huge, None, true, "").is_err());
}
