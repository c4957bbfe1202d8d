// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketclip::commands::{assets, ledgers, transactions};
use pocketclip::models::Currency;
use pocketclip::{cli, db};
use rusqlite::{Connection, params};
use rust_decimal::Decimal;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let ledger = ledgers::add_ledger(&conn, "u1", "Daily").unwrap();
    let asset =
        assets::add_asset(&conn, "u1", "Checking", Currency::Usd, Decimal::ZERO, None, true, "")
            .unwrap();
    conn.execute("INSERT INTO categories(id,name,is_income) VALUES (1,'Food',0)", [])
        .unwrap();
    for i in 1..=3 {
        conn.execute(
            "INSERT INTO transactions(user_id,ledger_id,asset_id,category_id,amount,is_expense,transaction_date)
             VALUES ('u1',?1,?2,1,'10.00',1,?3)",
            params![ledger, asset, format!("2025-01-0{} 12:00:00", i)],
        )
        .unwrap();
    }
    conn.execute(
        "INSERT INTO transactions(user_id,ledger_id,amount,is_expense,transaction_date)
         VALUES ('u2',?1,'5.00',0,'2025-02-01 00:00:00')",
        params![ledger],
    )
    .unwrap();
    conn
}

fn list_rows(conn: &Connection, args: &[&str]) -> Vec<transactions::TransactionRow> {
    let mut argv = vec!["pocketclip", "tx", "list"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            return transactions::query_rows(conn, "u1", list_m).unwrap();
        }
        panic!("no list subcommand");
    }
    panic!("no tx subcommand");
}

#[test]
fn list_limit_respected() {
    let conn = setup();
    let rows = list_rows(&conn, &["--limit", "2"]);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].date, "2025-01-03");
    assert_eq!(rows[0].signed_amount, "-10.00");
    assert_eq!(rows[0].category, "Food");
    assert_eq!(rows[0].currency, "USD");
}

#[test]
fn list_is_scoped_to_the_user() {
    let conn = setup();
    assert_eq!(list_rows(&conn, &[]).len(), 3);
    assert!(list_rows(&conn, &["--month", "2025-02"]).is_empty());
    assert_eq!(list_rows(&conn, &["--month", "2025-01"]).len(), 3);
}
