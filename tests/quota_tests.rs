// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use pocketclip::identity::Identity;
use pocketclip::messages::{NewMessage, create_session, insert_message};
use pocketclip::models::MessageKind;
use pocketclip::quota::{check_quota, count_user_authored_messages, usage};
use pocketclip::{EngineError, db};
use rusqlite::Connection;

fn setup(user_messages: usize) -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    let session = create_session(&conn, "u1", "ChatGPT", None).unwrap();
    for kind in std::iter::repeat_n(MessageKind::User, user_messages)
        .chain(std::iter::once(MessageKind::Assistant))
    {
        insert_message(
            &conn,
            &NewMessage {
                session_id: session.id,
                user_id: "u1",
                content: "hi",
                kind,
                is_voice: false,
                transaction_ids: &[],
                seed: 0,
                emoji: "random",
            },
        )
        .unwrap();
    }
    conn
}

#[test]
fn only_user_authored_messages_count() {
    let conn = setup(2);
    assert_eq!(count_user_authored_messages(&conn, "u1").unwrap(), 2);
    assert_eq!(count_user_authored_messages(&conn, "u2").unwrap(), 0);
}

#[test]
fn limit_reached_blocks_free_users() {
    let conn = setup(3);
    let free = Identity::new("u1");
    assert!(check_quota(&conn, &free, 4).is_ok());
    match check_quota(&conn, &free, 3).unwrap_err() {
        EngineError::QuotaExceeded { count, limit } => {
            assert_eq!((count, limit), (3, 3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn premium_users_are_unlimited() {
    let conn = setup(3);
    let premium = Identity::new("u1").premium(true);
    assert!(check_quota(&conn, &premium, 1).is_ok());
    let u = usage(&conn, &premium, 1).unwrap();
    assert_eq!(u.message_count, 3);
    assert_eq!(u.message_limit, None);
}

#[test]
fn anonymous_callers_are_unauthorized() {
    let conn = setup(0);
    assert!(matches!(
        check_quota(&conn, &Identity::default(), 10).unwrap_err(),
        EngineError::Unauthorized
    ));
}
