// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Settings live in the `settings` table; `POCKETCLIP_<KEY>` environment variables
//! override the stored value for the current process.

use crate::assistant::client::{DEFAULT_ASSISTANT_URL, DEFAULT_TIMEOUT_SECS};
use crate::identity::Identity;
use crate::quota::DEFAULT_MESSAGE_LIMIT;
use anyhow::{Context, Result, bail};
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use std::time::Duration;

pub const ENV_PREFIX: &str = "POCKETCLIP_";

pub const KEYS: [&str; 7] = [
    "assistant_url",
    "assistant_token",
    "assistant_timeout_secs",
    "message_limit",
    "user_id",
    "is_premium",
    "timezone",
];

#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub assistant_url: String,
    #[serde(skip_serializing)]
    pub assistant_token: String,
    pub assistant_timeout_secs: u64,
    pub message_limit: i64,
    pub user_id: Option<String>,
    pub is_premium: bool,
    pub timezone: String,
}

impl Settings {
    pub fn load(conn: &Connection) -> Result<Settings> {
        let assistant_url =
            lookup(conn, "assistant_url")?.unwrap_or_else(|| DEFAULT_ASSISTANT_URL.to_string());
        let assistant_token = lookup(conn, "assistant_token")?.unwrap_or_default();
        let assistant_timeout_secs = match lookup(conn, "assistant_timeout_secs")? {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid assistant_timeout_secs '{}'", v))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let message_limit = match lookup(conn, "message_limit")? {
            Some(v) => v
                .trim()
                .parse()
                .with_context(|| format!("Invalid message_limit '{}'", v))?,
            None => DEFAULT_MESSAGE_LIMIT,
        };
        let is_premium = match lookup(conn, "is_premium")? {
            Some(v) => parse_bool(&v)?,
            None => false,
        };
        Ok(Settings {
            assistant_url,
            assistant_token,
            assistant_timeout_secs,
            message_limit,
            user_id: lookup(conn, "user_id")?.filter(|s| !s.trim().is_empty()),
            is_premium,
            timezone: lookup(conn, "timezone")?.unwrap_or_else(|| "UTC".to_string()),
        })
    }

    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.user_id.clone(),
            is_premium: self.is_premium,
            timezone: self.timezone.clone(),
        }
    }

    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant_timeout_secs)
    }
}

/// Environment first, then the settings table.
fn lookup(conn: &Connection, key: &str) -> Result<Option<String>> {
    let env_key = format!("{}{}", ENV_PREFIX, key.to_uppercase());
    if let Ok(v) = std::env::var(&env_key) {
        return Ok(Some(v));
    }
    get_setting(conn, key)
}

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let key = key.trim();
    if !KEYS.contains(&key) {
        bail!("Unknown setting '{}', expected one of {}", key, KEYS.join(", "));
    }
    let value = value.trim();
    match key {
        "assistant_timeout_secs" => {
            value
                .parse::<u64>()
                .with_context(|| format!("Invalid timeout '{}'", value))?;
        }
        "message_limit" => {
            value
                .parse::<i64>()
                .with_context(|| format!("Invalid message limit '{}'", value))?;
        }
        "is_premium" => {
            parse_bool(value)?;
        }
        _ => {}
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    match s.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => bail!("Invalid boolean '{}'", other),
    }
}
