// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn sort_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("filter")
            .long("filter")
            .help("Case-insensitive text matched against date, description, category and amount"),
    )
    .arg(
        Arg::new("sort")
            .long("sort")
            .default_value("date")
            .help("Sort column: date, description, amount or category"),
    )
    .arg(
        Arg::new("asc")
            .long("asc")
            .action(ArgAction::SetTrue)
            .help("Sort ascending instead of descending"),
    )
}

pub fn build_cli() -> Command {
    Command::new("budgetr")
        .version(crate_version!())
        .about("Budgetr: track personal transactions against a remote API")
        .arg(
            Arg::new("base_url")
                .long("base-url")
                .global(true)
                .help("Base address of the transactions API"),
        )
        .arg(
            Arg::new("timeout")
                .long("timeout")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Request timeout in seconds"),
        )
        .arg(
            Arg::new("debounce_ms")
                .long("debounce-ms")
                .global(true)
                .value_parser(value_parser!(u64))
                .help("Quiet period before an edit is sent, in milliseconds"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to a JSON config file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log requests and sync activity to stderr"),
        )
        .subcommand(
            sort_args(Command::new("list").about("List transactions"))
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("jsonl"),
                )
                .arg(Arg::new("jsonl").long("jsonl").action(ArgAction::SetTrue)),
        )
        .subcommand(
            Command::new("add")
                .about("Add a transaction")
                .arg(Arg::new("description").long("description").required(true))
                .arg(
                    Arg::new("amount")
                        .long("amount")
                        .required(true)
                        .allow_hyphen_values(true)
                        .help("Negative for expenses, positive for income"),
                )
                .arg(Arg::new("category").long("category").default_value(""))
                .arg(
                    Arg::new("date")
                        .long("date")
                        .help("Defaults to today (YYYY-MM-DD)"),
                ),
        )
        .subcommand(
            Command::new("edit")
                .about("Change one field of a transaction")
                .arg(
                    Arg::new("id")
                        .long("id")
                        .required(true)
                        .help("Transaction id or a unique prefix of it"),
                )
                .arg(
                    Arg::new("field")
                        .long("field")
                        .required(true)
                        .help("date, description, amount or category"),
                )
                .arg(
                    Arg::new("value")
                        .long("value")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        )
        .subcommand(
            Command::new("rm")
                .about("Delete a transaction")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            sort_args(Command::new("export").about("Export transactions to a file"))
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .help("csv or json"),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
        .subcommand(Command::new("config").about("Show the effective configuration"))
        .subcommand(Command::new("shell").about("Interactive session"))
}
