// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::assistant::HttpAssistant;
use crate::config::Settings;
use crate::messages::{create_session, owned_session, session_messages};
use crate::orchestrator::{UserTurn, process_user_turn};
use crate::quota::{check_quota, usage};
use crate::utils::{maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, settings: &Settings, m: &clap::ArgMatches) -> Result<()> {
    let identity = settings.identity();
    let user_id = identity.require_user()?;
    match m.subcommand() {
        Some(("new", sub)) => {
            let model = sub.get_one::<String>("model").unwrap().trim();
            let assistant = sub.get_one::<String>("assistant").map(|s| s.trim());
            let session = create_session(conn, user_id, model, assistant)?;
            println!("Started session {} ({})", session.id, session.model);
        }
        Some(("send", sub)) => {
            check_quota(conn, &identity, settings.message_limit)?;
            let turn = UserTurn {
                session_id: *sub.get_one::<i64>("session").unwrap(),
                text: sub.get_one::<String>("text").unwrap().to_string(),
                ledger_id: *sub.get_one::<i64>("ledger").unwrap(),
                asset_id: sub.get_one::<i64>("asset").copied(),
                language: sub.get_one::<String>("language").unwrap().trim().to_string(),
                assistant_name: sub.get_one::<String>("assistant").unwrap().trim().to_string(),
                user_template_id: sub.get_one::<i64>("template").copied(),
                is_voice: sub.get_flag("voice"),
            };
            let assistant =
                HttpAssistant::new(&settings.assistant_url, settings.assistant_timeout())?;
            let outcome = process_user_turn(
                conn,
                &assistant,
                &identity,
                &settings.assistant_token,
                &turn,
            )?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome)? {
                let reply = &outcome.assistant_message;
                println!("{} {}", reply.emoji, reply.content);
                if !reply.transaction_ids.is_empty() {
                    let ids: Vec<String> =
                        reply.transaction_ids.iter().map(|i| i.to_string()).collect();
                    println!("Recorded transactions: {}", ids.join(", "));
                }
                if outcome.skipped_candidates > 0 {
                    println!(
                        "Skipped {} suggested transaction(s) that could not be read",
                        outcome.skipped_candidates
                    );
                }
            }
        }
        Some(("history", sub)) => {
            let session = owned_session(conn, *sub.get_one::<i64>("session").unwrap(), user_id)?;
            let data = session_messages(conn, session.id)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
                let rows = data
                    .iter()
                    .map(|m| {
                        vec![
                            m.created_at.format("%Y-%m-%d %H:%M").to_string(),
                            m.kind.as_str().to_string(),
                            m.content.clone(),
                        ]
                    })
                    .collect();
                println!("{}", pretty_table(&["When", "From", "Message"], rows));
            }
        }
        Some(("usage", sub)) => {
            let u = usage(conn, &identity, settings.message_limit)?;
            if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &u)? {
                match u.message_limit {
                    Some(limit) => println!("{} of {} messages used", u.message_count, limit),
                    None => println!("{} messages sent (premium, no limit)", u.message_count),
                }
            }
        }
        _ => {}
    }
    Ok(())
}
