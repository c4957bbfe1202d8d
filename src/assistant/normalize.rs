// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Turns the assistant's payload into one canonical shape.
//!
//! The service has answered in several layouts over time: a JSON object, the same object
//! serialized into a string (often wrapped in a ```json fence), with the reply under
//! `ai_output`, `content.ai_output`, `content.en`, `en.ai_output` or `en`, and with the
//! transactions at the top level or nested one or two `content` levels deep. All of them
//! stay accepted; the probe order below is the precedence.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use thiserror::Error;

pub const BUSY_REPLY: &str = "The server is busy. Please try again later.";
pub const DEFAULT_MOOD: &str = "random";

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    Structured,
    PlainText,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTurn {
    pub shape: PayloadShape,
    pub reply_text: String,
    /// Raw candidate objects, parsed one at a time with [`parse_candidate`].
    pub candidates: Vec<Value>,
    pub mood: String,
    pub seed: i64,
}

impl NormalizedTurn {
    /// A turn nothing can be built from: an empty reply, or text that opens like JSON
    /// but did not parse.
    pub fn is_unusable(&self) -> bool {
        if self.shape == PayloadShape::Structured {
            return false;
        }
        let text = self.reply_text.trim_start();
        text.is_empty() || text.starts_with('{') || text.starts_with('[')
    }
}

pub fn normalize(payload: &Value) -> NormalizedTurn {
    match payload {
        Value::Object(obj) => structured(obj),
        Value::String(raw) => {
            let cleaned = strip_code_fence(raw);
            match serde_json::from_str::<Value>(cleaned) {
                Ok(Value::Object(obj)) => structured(&obj),
                _ => plain_text(cleaned.to_string()),
            }
        }
        Value::Null => plain_text(String::new()),
        other => plain_text(other.to_string()),
    }
}

/// Strips surrounding whitespace and a ```json ... ``` fence if present.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix(FENCE_OPEN) {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix(FENCE_CLOSE) {
        s = rest;
    }
    s.trim()
}

fn plain_text(reply_text: String) -> NormalizedTurn {
    NormalizedTurn {
        shape: PayloadShape::PlainText,
        reply_text,
        candidates: Vec::new(),
        mood: DEFAULT_MOOD.to_string(),
        seed: 0,
    }
}

fn structured(obj: &Map<String, Value>) -> NormalizedTurn {
    NormalizedTurn {
        shape: PayloadShape::Structured,
        reply_text: reply_text(obj),
        candidates: transaction_list(obj),
        mood: probe(obj, &[&["emoji"], &["content", "emoji"]])
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MOOD)
            .to_string(),
        seed: probe(obj, &[&["random"], &["content", "random"]])
            .and_then(as_seed)
            .unwrap_or(0),
    }
}

fn reply_text(obj: &Map<String, Value>) -> String {
    const PATHS: &[&[&str]] = &[
        &["ai_output"],
        &["content", "ai_output"],
        &["content", "en"],
        &["en", "ai_output"],
        &["en"],
    ];
    PATHS
        .iter()
        .find_map(|path| lookup(obj, path).and_then(Value::as_str))
        .unwrap_or(BUSY_REPLY)
        .to_string()
}

fn transaction_list(obj: &Map<String, Value>) -> Vec<Value> {
    const PATHS: &[&[&str]] = &[
        &["transactions"],
        &["content", "transactions"],
        &["content", "content", "transactions"],
    ];
    PATHS
        .iter()
        .find_map(|path| lookup(obj, path).and_then(Value::as_array))
        .cloned()
        .unwrap_or_default()
}

fn probe<'a>(obj: &'a Map<String, Value>, paths: &[&[&str]]) -> Option<&'a Value> {
    paths
        .iter()
        .find_map(|path| lookup(obj, path).filter(|v| !v.is_null()))
}

fn lookup<'a>(obj: &'a Map<String, Value>, path: &[&str]) -> Option<&'a Value> {
    let (first, rest) = path.split_first()?;
    let mut cur = obj.get(*first)?;
    for key in rest {
        cur = cur.as_object()?.get(*key)?;
    }
    Some(cur)
}

fn as_seed(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// A transaction proposed by the assistant, not yet persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateTransaction {
    pub is_expense: bool,
    pub amount: Decimal,
    pub category_name: String,
    pub note: String,
    pub transaction_date: NaiveDateTime,
}

#[derive(Debug, Error, PartialEq)]
pub enum CandidateError {
    #[error("candidate is not an object")]
    NotAnObject,
    #[error("unrecognised date '{0}'")]
    BadDate(String),
}

/// Parses one candidate. `now` stands in for an absent date.
pub fn parse_candidate(value: &Value, now: NaiveDateTime) -> Result<CandidateTransaction, CandidateError> {
    let obj = value.as_object().ok_or(CandidateError::NotAnObject)?;
    let is_expense = obj.get("type").and_then(Value::as_str) == Some("expense");
    let category_name = obj
        .get("category")
        .or_else(|| obj.get("category_name"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let note = obj
        .get("note")
        .or_else(|| obj.get("notes"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok(CandidateTransaction {
        is_expense,
        amount: coerce_amount(obj.get("amount")),
        category_name,
        note,
        transaction_date: parse_candidate_date(obj.get("date"), now)?,
    })
}

/// `YYYY-MM-DD HH:MM:SS`, then `YYYY-MM-DD`; absent or blank means `now`.
pub fn parse_candidate_date(raw: Option<&Value>, now: NaiveDateTime) -> Result<NaiveDateTime, CandidateError> {
    let s = match raw {
        None | Some(Value::Null) => return Ok(now),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(now),
        Some(Value::String(s)) => s.trim(),
        Some(other) => return Err(CandidateError::BadDate(other.to_string())),
    };
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| CandidateError::BadDate(s.to_string()))
}

/// Missing or non-numeric amounts become zero.
pub fn coerce_amount(raw: Option<&Value>) -> Decimal {
    let text = match raw {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}
