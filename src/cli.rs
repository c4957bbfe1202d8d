// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn id_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_parser(value_parser!(i64))
        .help(help)
}

pub fn build_cli() -> Command {
    Command::new("pocketclip")
        .version(crate_version!())
        .about("Personal finance tracker with an AI bookkeeping assistant")
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("warn")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .help("Log verbosity (RUST_LOG overrides)"),
        )
        .subcommand(Command::new("init").about("Create the database and print its location"))
        .subcommand(
            Command::new("ledger")
                .about("Manage ledgers")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true)),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("category")
                .about("Manage transaction and asset categories")
                .subcommand(
                    Command::new("add")
                        .about("Add a transaction category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Transactions in this category are income"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        ),
                )
                .subcommand(
                    Command::new("asset-add")
                        .about("Add an asset category")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("type").long("type").required(true))
                        .arg(
                            Arg::new("negative")
                                .long("negative")
                                .action(ArgAction::SetTrue)
                                .help("Liability: subtracts from net worth"),
                        )
                        .arg(
                            Arg::new("sort")
                                .long("sort")
                                .value_parser(value_parser!(i64))
                                .default_value("0"),
                        ),
                )
                .subcommand(json_flags(Command::new("list"))),
        )
        .subcommand(
            Command::new("asset")
                .about("Manage assets and view net worth")
                .subcommand(
                    Command::new("add")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("currency").long("currency").default_value("USD"))
                        .arg(Arg::new("balance").long("balance").default_value("0"))
                        .arg(id_arg("category", "Asset category id"))
                        .arg(
                            Arg::new("exclude-from-total")
                                .long("exclude-from-total")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(Arg::new("notes").long("notes")),
                )
                .subcommand(json_flags(Command::new("list")))
                .subcommand(json_flags(Command::new("networth")))
                .subcommand(
                    Command::new("rate")
                        .about("Set the USD rate used by net worth")
                        .arg(Arg::new("currency").long("currency").required(true))
                        .arg(Arg::new("usd").long("usd").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Record and edit transactions")
                .subcommand(
                    Command::new("add")
                        .arg(id_arg("ledger", "Ledger id").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(id_arg("asset", "Asset whose balance this moves"))
                        .arg(id_arg("category", "Transaction category id"))
                        .arg(
                            Arg::new("income")
                                .long("income")
                                .action(ArgAction::SetTrue)
                                .help("Record as income (default is expense)"),
                        )
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD[ HH:MM:SS]"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("exclude-from-stats")
                                .long("exclude-from-stats")
                                .action(ArgAction::SetTrue),
                        ),
                )
                .subcommand(
                    Command::new("update")
                        .arg(id_arg("id", "Transaction id").required(true))
                        .arg(id_arg("ledger", "Move to ledger"))
                        .arg(Arg::new("amount").long("amount"))
                        .arg(id_arg("asset", "Move to asset").conflicts_with("no-asset"))
                        .arg(
                            Arg::new("no-asset")
                                .long("no-asset")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(id_arg("category", "Transaction category id").conflicts_with("no-category"))
                        .arg(
                            Arg::new("no-category")
                                .long("no-category")
                                .action(ArgAction::SetTrue),
                        )
                        .arg(
                            Arg::new("expense")
                                .long("expense")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("income"),
                        )
                        .arg(Arg::new("income").long("income").action(ArgAction::SetTrue))
                        .arg(Arg::new("date").long("date"))
                        .arg(Arg::new("note").long("note"))
                        .arg(
                            Arg::new("stats")
                                .long("stats")
                                .value_parser(value_parser!(bool)),
                        ),
                )
                .subcommand(
                    Command::new("rm").arg(id_arg("id", "Transaction id").required(true)),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .arg(id_arg("ledger", "Only this ledger"))
                        .arg(id_arg("asset", "Only this asset"))
                        .arg(Arg::new("month").long("month").help("YYYY-MM"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                )),
        )
        .subcommand(
            Command::new("chat")
                .about("Talk to the bookkeeping assistant")
                .subcommand(
                    Command::new("new")
                        .arg(Arg::new("model").long("model").default_value("ChatGPT"))
                        .arg(Arg::new("assistant").long("assistant")),
                )
                .subcommand(json_flags(
                    Command::new("send")
                        .arg(id_arg("session", "Session id").required(true))
                        .arg(id_arg("ledger", "Ledger for created transactions").required(true))
                        .arg(Arg::new("text").long("text").required(true))
                        .arg(id_arg("asset", "Asset for created transactions"))
                        .arg(Arg::new("language").long("language").default_value("en"))
                        .arg(Arg::new("assistant").long("assistant").default_value("Alice"))
                        .arg(id_arg("template", "User template id"))
                        .arg(Arg::new("voice").long("voice").action(ArgAction::SetTrue)),
                ))
                .subcommand(json_flags(
                    Command::new("history").arg(id_arg("session", "Session id").required(true)),
                ))
                .subcommand(json_flags(Command::new("usage"))),
        )
        .subcommand(
            Command::new("config")
                .about("Show or change settings")
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("key").required(true))
                        .arg(Arg::new("value").required(true)),
                )
                .subcommand(json_flags(Command::new("show"))),
        )
        .subcommand(Command::new("doctor").about("Check stored data for inconsistencies"))
}
