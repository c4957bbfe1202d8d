// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{EngineError, EngineResult};
use crate::identity::Identity;
use crate::models::MessageKind;
use rusqlite::{Connection, params};
use serde::Serialize;

/// Lifetime number of user-authored messages a non-premium user may send.
pub const DEFAULT_MESSAGE_LIMIT: i64 = 50;

pub fn count_user_authored_messages(conn: &Connection, user_id: &str) -> EngineResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM messages WHERE user_id=?1 AND message_type=?2",
        params![user_id, MessageKind::User],
        |r| r.get(0),
    )?;
    Ok(n)
}

/// Gate checked before a turn starts. Premium users are never limited.
pub fn check_quota(conn: &Connection, identity: &Identity, limit: i64) -> EngineResult<()> {
    let user_id = identity.require_user()?;
    if identity.is_premium {
        return Ok(());
    }
    let count = count_user_authored_messages(conn, user_id)?;
    if count >= limit {
        return Err(EngineError::QuotaExceeded { count, limit });
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MessageUsage {
    pub message_count: i64,
    pub message_limit: Option<i64>,
    pub is_premium: bool,
}

pub fn usage(conn: &Connection, identity: &Identity, limit: i64) -> EngineResult<MessageUsage> {
    let user_id = identity.require_user()?;
    Ok(MessageUsage {
        message_count: count_user_authored_messages(conn, user_id)?,
        message_limit: if identity.is_premium { None } else { Some(limit) },
        is_premium: identity.is_premium,
    })
}
