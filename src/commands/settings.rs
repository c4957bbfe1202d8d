// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::config::{Settings, set_setting};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => {
            let key = sub.get_one::<String>("key").unwrap();
            let value = sub.get_one::<String>("value").unwrap();
            set_setting(conn, key, value)?;
            println!("Set {}", key.trim());
        }
        Some(("show", sub)) => {
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), settings)? {
                let rows = vec![
                    vec!["assistant_url".into(), settings.assistant_url.clone()],
                    vec![
                        "assistant_token".into(),
                        if settings.assistant_token.is_empty() { "(unset)" } else { "(set)" }
                            .to_string(),
                    ],
                    vec![
                        "assistant_timeout_secs".into(),
                        settings.assistant_timeout_secs.to_string(),
                    ],
                    vec!["message_limit".into(), settings.message_limit.to_string()],
                    vec![
                        "user_id".into(),
                        settings.user_id.clone().unwrap_or_else(|| "(unset)".into()),
                    ],
                    vec!["is_premium".into(), settings.is_premium.to_string()],
                    vec!["timezone".into(), settings.timezone.clone()],
                ];
                println!("{}", pretty_table(&["Key", "Value"], rows));
            }
        }
        _ => {}
    }
    Ok(())
}
