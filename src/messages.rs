// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Message, MessageKind, MessageSession, decode_transaction_ids, encode_transaction_ids,
};
use rusqlite::{Connection, OptionalExtension, Row, params};

#[derive(Debug, Clone)]
pub struct NewMessage<'a> {
    pub session_id: i64,
    pub user_id: &'a str,
    pub content: &'a str,
    pub kind: MessageKind,
    pub is_voice: bool,
    pub transaction_ids: &'a [i64],
    pub seed: i64,
    pub emoji: &'a str,
}

pub fn create_session(
    conn: &Connection,
    user_id: &str,
    model: &str,
    assistant_name: Option<&str>,
) -> EngineResult<MessageSession> {
    conn.execute(
        "INSERT INTO message_sessions(user_id, model, assistant_name) VALUES (?1, ?2, ?3)",
        params![user_id, model, assistant_name],
    )?;
    let id = conn.last_insert_rowid();
    load_session(conn, id)?.ok_or_else(|| EngineError::not_found(format!("session {}", id)))
}

pub fn load_session(conn: &Connection, id: i64) -> EngineResult<Option<MessageSession>> {
    let s = conn
        .query_row(
            "SELECT id, user_id, model, assistant_name, updated_at FROM message_sessions WHERE id=?1",
            params![id],
            |r| {
                Ok(MessageSession {
                    id: r.get(0)?,
                    user_id: r.get(1)?,
                    model: r.get(2)?,
                    assistant_name: r.get(3)?,
                    updated_at: r.get(4)?,
                })
            },
        )
        .optional()?;
    Ok(s)
}

/// Loads a session and checks it belongs to `user_id`.
pub fn owned_session(conn: &Connection, id: i64, user_id: &str) -> EngineResult<MessageSession> {
    let session =
        load_session(conn, id)?.ok_or_else(|| EngineError::not_found(format!("session {}", id)))?;
    if session.user_id != user_id {
        return Err(EngineError::Forbidden(
            "cannot post to another user's session".to_string(),
        ));
    }
    Ok(session)
}

pub fn touch_session(conn: &Connection, id: i64) -> EngineResult<()> {
    conn.execute(
        "UPDATE message_sessions SET updated_at=datetime('now') WHERE id=?1",
        params![id],
    )?;
    Ok(())
}

pub fn insert_message(conn: &Connection, m: &NewMessage<'_>) -> EngineResult<Message> {
    conn.execute(
        "INSERT INTO messages(session_id, user_id, content, transaction_ids, seed, message_type,
             is_voice, emoji)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            m.session_id,
            m.user_id,
            m.content,
            encode_transaction_ids(m.transaction_ids),
            m.seed,
            m.kind,
            m.is_voice,
            m.emoji
        ],
    )?;
    let id = conn.last_insert_rowid();
    load_message(conn, id)?.ok_or_else(|| EngineError::not_found(format!("message {}", id)))
}

const MESSAGE_COLUMNS: &str = "id, session_id, user_id, content, message_type, is_voice, \
     transaction_ids, seed, emoji, created_at";

fn message_from_row(r: &Row<'_>) -> rusqlite::Result<Message> {
    let ids: String = r.get(6)?;
    Ok(Message {
        id: r.get(0)?,
        session_id: r.get(1)?,
        user_id: r.get(2)?,
        content: r.get(3)?,
        kind: r.get(4)?,
        is_voice: r.get(5)?,
        transaction_ids: decode_transaction_ids(&ids),
        seed: r.get(7)?,
        emoji: r.get(8)?,
        created_at: r.get(9)?,
    })
}

pub fn load_message(conn: &Connection, id: i64) -> EngineResult<Option<Message>> {
    let sql = format!("SELECT {} FROM messages WHERE id=?1", MESSAGE_COLUMNS);
    let m = conn
        .query_row(&sql, params![id], message_from_row)
        .optional()?;
    Ok(m)
}

pub fn session_messages(conn: &Connection, session_id: i64) -> EngineResult<Vec<Message>> {
    let sql = format!(
        "SELECT {} FROM messages WHERE session_id=?1 ORDER BY created_at, id",
        MESSAGE_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![session_id], message_from_row)?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
