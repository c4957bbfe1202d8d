// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketclip::commands::doctor::find_issues;
use pocketclip::config::{Settings, get_setting, set_setting};
use pocketclip::db;
use tempfile::tempdir;

#[test]
fn doctor_reports_direction_mismatch_and_dangling_asset() {
    let dir = tempdir().unwrap();
    let conn = db::open_at(&dir.path().join("doctor.sqlite")).unwrap();
    assert!(find_issues(&conn).unwrap().is_empty());

    conn.execute_batch(
        "INSERT INTO ledgers(id,user_id,name) VALUES (1,'u1','Daily');
         INSERT INTO categories(id,name,is_income) VALUES (1,'Salary',1);
         INSERT INTO transactions(user_id,ledger_id,category_id,amount,is_expense,transaction_date)
             VALUES ('u1',1,1,'3.00',1,'2025-01-01 00:00:00');
         PRAGMA foreign_keys = OFF;
         INSERT INTO transactions(user_id,ledger_id,asset_id,amount,is_expense,transaction_date)
             VALUES ('u1',1,99,'1.00',1,'2025-01-01 00:00:00');",
    )
    .unwrap();

    let issues = find_issues(&conn).unwrap();
    let kinds: Vec<&str> = issues.iter().map(|r| r[0].as_str()).collect();
    assert_eq!(kinds, ["direction_mismatch", "dangling_asset"]);
}

#[test]
fn settings_round_trip_through_the_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.sqlite");
    {
        let conn = db::open_at(&path).unwrap();
        set_setting(&conn, "message_limit", "5").unwrap();
        set_setting(&conn, " is_premium ", "yes").unwrap();
        set_setting(&conn, "timezone", "Asia/Shanghai").unwrap();
    }
    let conn = db::open_at(&path).unwrap();
    assert_eq!(get_setting(&conn, "is_premium").unwrap().as_deref(), Some("yes"));

    let settings = Settings::load(&conn).unwrap();
    assert_eq!(settings.message_limit, 5);
    assert!(settings.is_premium);
    assert_eq!(settings.timezone, "Asia/Shanghai");
    assert!(settings.identity().require_user().is_err());
}

#[test]
fn settings_reject_unknown_keys_and_bad_values() {
    let dir = tempdir().unwrap();
    let conn = db::open_at(&dir.path().join("bad.sqlite")).unwrap();
    assert!(set_setting(&conn, "colour", "blue").is_err());
    assert!(set_setting(&conn, "message_limit", "lots").is_err());
    assert!(set_setting(&conn, "is_premium", "maybe").is_err());
    assert_eq!(get_setting(&conn, "message_limit").unwrap(), None);
}
