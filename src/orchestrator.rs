// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! One chat turn, start to finish.
//!
//! The user's message is committed on its own before the assistant is called, so it
//! survives any later failure. Everything the reply produces (transactions, the
//! assistant message, the session touch) is committed together or not at all.

use crate::assistant::normalize::{self, CandidateTransaction, NormalizedTurn};
use crate::assistant::{Assistant, AssistantRequest, model_name_for};
use crate::categories::resolve_category_id;
use crate::error::{EngineError, EngineResult};
use crate::identity::Identity;
use crate::messages::{self, NewMessage};
use crate::models::{Message, MessageKind, NewTransaction};
use crate::records;
use crate::utils::now_utc;
use chrono::NaiveDateTime;
use rusqlite::{Connection, TransactionBehavior};
use serde::Serialize;
use tracing::{error, info, warn};

pub const DEFAULT_LANGUAGE: &str = "en";
pub const DEFAULT_ASSISTANT_NAME: &str = "Alice";

#[derive(Debug, Clone)]
pub struct UserTurn {
    pub session_id: i64,
    pub text: String,
    pub ledger_id: i64,
    pub asset_id: Option<i64>,
    pub language: String,
    pub assistant_name: String,
    pub user_template_id: Option<i64>,
    pub is_voice: bool,
}

impl UserTurn {
    pub fn new(session_id: i64, ledger_id: i64, text: impl Into<String>) -> Self {
        UserTurn {
            session_id,
            text: text.into(),
            ledger_id,
            asset_id: None,
            language: DEFAULT_LANGUAGE.to_string(),
            assistant_name: DEFAULT_ASSISTANT_NAME.to_string(),
            user_template_id: None,
            is_voice: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub user_message: Message,
    pub assistant_message: Message,
    /// Candidates the assistant proposed that could not be turned into transactions.
    pub skipped_candidates: usize,
}

pub fn process_user_turn(
    conn: &mut Connection,
    assistant: &dyn Assistant,
    identity: &Identity,
    token: &str,
    turn: &UserTurn,
) -> EngineResult<TurnOutcome> {
    let user_id = identity.require_user()?;
    let text = turn.text.trim();
    if text.is_empty() {
        return Err(EngineError::validation("message content is required"));
    }
    let session = messages::owned_session(conn, turn.session_id, user_id)?;
    records::ensure_ledger(conn, user_id, turn.ledger_id)?;
    if let Some(asset_id) = turn.asset_id {
        records::ensure_asset(conn, user_id, asset_id)?;
    }

    let user_message = messages::insert_message(
        conn,
        &NewMessage {
            session_id: session.id,
            user_id,
            content: text,
            kind: MessageKind::User,
            is_voice: turn.is_voice,
            transaction_ids: &[],
            seed: 0,
            emoji: normalize::DEFAULT_MOOD,
        },
    )?;

    let request = AssistantRequest {
        assistant_name: turn.assistant_name.clone(),
        model_name: model_name_for(&session.model).to_string(),
        users_input: text.to_string(),
        language: turn.language.clone(),
        user_template_id: turn.user_template_id,
        token: token.to_string(),
    };
    let payload = assistant.invoke(&request).inspect_err(|e| {
        error!(session_id = session.id, "assistant call failed: {}", e);
    })?;
    let normalized = normalize::normalize(&payload);
    if normalized.is_unusable() {
        error!(session_id = session.id, "assistant payload unusable");
        return Err(EngineError::AssistantUnavailable(
            "assistant returned an unusable payload".to_string(),
        ));
    }

    let mut tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let (transaction_ids, skipped) =
        create_candidates(&mut tx, user_id, turn, &normalized, now_utc())?;
    let assistant_message = messages::insert_message(
        &tx,
        &NewMessage {
            session_id: session.id,
            user_id,
            content: &normalized.reply_text,
            kind: MessageKind::Assistant,
            is_voice: false,
            transaction_ids: &transaction_ids,
            seed: normalized.seed,
            emoji: &normalized.mood,
        },
    )?;
    messages::touch_session(&tx, session.id)?;
    tx.commit()?;

    info!(
        session_id = session.id,
        created = transaction_ids.len(),
        skipped,
        "turn processed"
    );
    Ok(TurnOutcome {
        user_message,
        assistant_message,
        skipped_candidates: skipped,
    })
}

/// Creates one transaction per usable candidate, each under its own savepoint so a
/// failing candidate leaves no partial writes behind.
fn create_candidates(
    tx: &mut rusqlite::Transaction<'_>,
    user_id: &str,
    turn: &UserTurn,
    normalized: &NormalizedTurn,
    now: NaiveDateTime,
) -> EngineResult<(Vec<i64>, usize)> {
    let mut ids = Vec::new();
    let mut skipped = 0;
    for (index, raw) in normalized.candidates.iter().enumerate() {
        let candidate = match normalize::parse_candidate(raw, now) {
            Ok(c) => c,
            Err(e) => {
                warn!(index, "skipping assistant transaction: {}", e);
                skipped += 1;
                continue;
            }
        };
        let sp = tx.savepoint()?;
        match create_candidate(&sp, user_id, turn, candidate) {
            Ok(id) => {
                sp.commit()?;
                ids.push(id);
            }
            Err(EngineError::Database(e)) => return Err(EngineError::Database(e)),
            Err(e) => {
                warn!(index, "skipping assistant transaction: {}", e);
                skipped += 1;
            }
        }
    }
    Ok((ids, skipped))
}

fn create_candidate(
    conn: &Connection,
    user_id: &str,
    turn: &UserTurn,
    candidate: CandidateTransaction,
) -> EngineResult<i64> {
    let category_id = resolve_category_id(conn, &candidate.category_name, !candidate.is_expense)?;
    records::insert_transaction(
        conn,
        NewTransaction {
            user_id: user_id.to_string(),
            ledger_id: turn.ledger_id,
            asset_id: turn.asset_id,
            category_id,
            amount: candidate.amount,
            is_expense: candidate.is_expense,
            transaction_date: candidate.transaction_date,
            notes: candidate.note,
            include_in_stats: true,
        },
    )
}
