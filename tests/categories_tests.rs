// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketclip::categories::resolve_category_id;
use pocketclip::db;
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        "INSERT INTO categories(id,name,is_income,sort_order) VALUES (1,'Dining Out',0,2);
         INSERT INTO categories(id,name,is_income,sort_order) VALUES (2,'Others',0,9);
         INSERT INTO categories(id,name,is_income,sort_order) VALUES (3,'Transport',0,1);
         INSERT INTO categories(id,name,is_income,sort_order) VALUES (4,'Salary',1,3);
         INSERT INTO categories(id,name,is_income,sort_order) VALUES (5,'Gifts',1,1);",
    )
    .unwrap();
    conn
}

#[test]
fn containment_match_is_case_insensitive() {
    let conn = setup();
    assert_eq!(resolve_category_id(&conn, "dining", false).unwrap(), Some(1));
    assert_eq!(resolve_category_id(&conn, " SALARY ", true).unwrap(), Some(4));
}

#[test]
fn match_must_share_the_income_flag() {
    let conn = setup();
    // 'Salary' exists only as income; as an expense it falls back to Others.
    assert_eq!(resolve_category_id(&conn, "Salary", false).unwrap(), Some(2));
}

#[test]
fn falls_back_to_first_by_sort_order_without_others() {
    let conn = setup();
    assert_eq!(resolve_category_id(&conn, "lottery", true).unwrap(), Some(5));
    assert_eq!(resolve_category_id(&conn, "", true).unwrap(), Some(5));
}

#[test]
fn wildcards_in_names_are_literal() {
    let conn = setup();
    assert_eq!(resolve_category_id(&conn, "%", false).unwrap(), Some(2));
    assert_eq!(resolve_category_id(&conn, "_", true).unwrap(), Some(5));
}

#[test]
fn none_when_no_category_has_the_flag() {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute("INSERT INTO categories(name,is_income) VALUES ('Food',0)", [])
        .unwrap();
    assert_eq!(resolve_category_id(&conn, "Food", true).unwrap(), None);
}
