// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use pocketclip::{cli, commands, config::Settings, db};

fn main() -> Result<()> {
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let level = matches
        .get_one::<String>("log-level")
        .map(String::as_str)
        .unwrap_or("warn");
    init_logger(level);

    let mut conn = db::open_or_init()?;
    let settings = Settings::load(&conn)?;
    debug!(assistant_url = %settings.assistant_url, "settings loaded");

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path()?.display());
        }
        Some(("ledger", sub)) => commands::ledgers::handle(&conn, &settings, sub)?,
        Some(("category", sub)) => commands::categories::handle(&conn, sub)?,
        Some(("asset", sub)) => commands::assets::handle(&conn, &settings, sub)?,
        Some(("tx", sub)) => commands::transactions::handle(&mut conn, &settings, sub)?,
        Some(("chat", sub)) => commands::chat::handle(&mut conn, &settings, sub)?,
        Some(("config", sub)) => commands::settings::handle(&conn, &settings, sub)?,
        Some(("doctor", _)) => commands::doctor::handle(&conn)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}

fn init_logger(level: &str) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
