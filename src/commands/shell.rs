// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Interactive session over a long-lived [`TransactionStore`].
//!
//! Edits made here are debounced exactly like a table cell being typed
//! into: several `edit` commands on one record within the quiet period
//! reach the server as a single update.

use anyhow::{Result, anyhow, bail};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::commands::transactions::resolve_id;
use crate::models::{Field, Transaction};
use crate::state::TransactionStore;
use crate::sync::SyncEvent;
use crate::utils::{parse_amount, pretty_table, today, transactions_table};
use crate::view::{SortKey, SortOrder, SortSpec};

const HELP: &str = "\
commands:
  list                               show the filtered, sorted table
  filter [TEXT]                      set the filter (empty clears it)
  sort KEY [asc|desc]                date, description, amount or category
  add AMOUNT CATEGORY DESCRIPTION    add a transaction dated today
  edit ID FIELD VALUE                change one field (ID may be a prefix)
  rm ID                              delete a transaction
  reload                             fetch everything from the server again
  status                             pending edits and unsynced writes
  sync                               resend unsynced writes
  help
  quit";

#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    List,
    Filter(String),
    Sort(SortSpec),
    Add {
        amount: f64,
        category: String,
        description: String,
    },
    Edit {
        id: String,
        field: Field,
        value: String,
    },
    Remove(String),
    Reload,
    Status,
    Sync,
    Help,
    Quit,
}

fn split_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    match s.find(char::is_whitespace) {
        Some(i) => (&s[..i], s[i..].trim_start()),
        None => (s, ""),
    }
}

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>> {
    let (word, rest) = split_word(line.trim());
    let cmd = match word.to_lowercase().as_str() {
        "" => return Ok(None),
        "list" | "ls" => ShellCommand::List,
        "filter" => ShellCommand::Filter(rest.trim().to_string()),
        "sort" => {
            let (key, rest) = split_word(rest);
            if key.is_empty() {
                bail!("usage: sort KEY [asc|desc]");
            }
            let key = key.parse::<SortKey>()?;
            let (order, _) = split_word(rest);
            let order = if order.is_empty() {
                SortOrder::Descending
            } else {
                order.parse::<SortOrder>()?
            };
            ShellCommand::Sort(SortSpec::new(key, order))
        }
        "add" => {
            let (amount, rest) = split_word(rest);
            let (category, description) = split_word(rest);
            if amount.is_empty() || category.is_empty() || description.is_empty() {
                bail!("usage: add AMOUNT CATEGORY DESCRIPTION");
            }
            ShellCommand::Add {
                amount: parse_amount(amount)?,
                category: category.to_string(),
                description: description.trim().to_string(),
            }
        }
        "edit" => {
            let (id, rest) = split_word(rest);
            let (field, value) = split_word(rest);
            if id.is_empty() || field.is_empty() {
                bail!("usage: edit ID FIELD VALUE");
            }
            ShellCommand::Edit {
                id: id.to_string(),
                field: field.parse::<Field>()?,
                value: value.trim_end().to_string(),
            }
        }
        "rm" | "delete" => {
            let (id, _) = split_word(rest);
            if id.is_empty() {
                bail!("usage: rm ID");
            }
            ShellCommand::Remove(id.to_string())
        }
        "reload" => ShellCommand::Reload,
        "status" => ShellCommand::Status,
        "sync" => ShellCommand::Sync,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(anyhow!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(cmd))
}

/// Run one command against the store. Returns false when the session should end.
pub async fn execute(store: &mut TransactionStore, cmd: ShellCommand) -> Result<bool> {
    match cmd {
        ShellCommand::List => print_table(store),
        ShellCommand::Filter(q) => {
            store.set_query(q);
            print_table(store);
        }
        ShellCommand::Sort(spec) => {
            store.set_sort(spec);
            print_table(store);
        }
        ShellCommand::Add {
            amount,
            category,
            description,
        } => {
            let tx = Transaction::new(today(), description, amount, category);
            println!("added {}", tx.id);
            store.add(tx);
        }
        ShellCommand::Edit { id, field, value } => {
            let id = resolve_id(store, &id)?;
            store.edit(&id, field, &value)?;
        }
        ShellCommand::Remove(id) => {
            let id = resolve_id(store, &id)?;
            store.remove(&id);
            println!("removed {}", id);
        }
        ShellCommand::Reload => reload(store).await,
        ShellCommand::Status => print_status(store),
        ShellCommand::Sync => {
            let n = store.retry_unsynced();
            println!("resent {} write(s)", n);
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => return Ok(false),
    }
    Ok(true)
}

/// Placeholder shown while the first fetch is running and nothing is on screen yet.
pub fn loading_notice(store: &TransactionStore) -> Option<&'static str> {
    (store.is_loading() && store.transactions().is_empty()).then_some("Loading transactions...")
}

async fn reload(store: &mut TransactionStore) {
    let fetch = store.begin_load();
    if let Some(notice) = loading_notice(store) {
        println!("{}", notice);
    }
    let result = fetch.await;
    if store.finish_load(result) {
        print_table(store);
    } else if let Some(e) = store.load_error() {
        println!("{}", e);
    }
}

fn print_table(store: &TransactionStore) {
    println!("{}", transactions_table(store.displayed()));
    let mut footer = format!(
        "{} of {} shown, sorted by {}",
        store.displayed().len(),
        store.transactions().len(),
        store.sort()
    );
    if !store.query().is_empty() {
        footer.push_str(&format!(", filter '{}'", store.query()));
    }
    println!("{}", footer);
}

fn print_status(store: &TransactionStore) {
    if let Some(e) = store.load_error() {
        println!("{}", e);
    }
    println!("pending edits: {}", store.pending_updates());
    let rows: Vec<Vec<String>> = store
        .unsynced()
        .map(|f| vec![f.op.to_string(), f.id.clone(), f.message.clone()])
        .collect();
    if rows.is_empty() {
        println!("all changes synced");
    } else {
        println!("{}", pretty_table(&["Op", "ID", "Error"], rows));
    }
}

/// Line printed when a background write reports back. Successes stay quiet.
pub fn sync_notice(event: &SyncEvent) -> Option<String> {
    match event {
        SyncEvent::Failed(f) => Some(format!(
            "{} failed for {}: {} (use 'sync' to retry)",
            f.op, f.id, f.message
        )),
        SyncEvent::Synced { .. } => None,
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

pub async fn run(store: &mut TransactionStore) -> Result<()> {
    reload(store).await;
    println!("type 'help' for commands");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(Some(cmd)) => match execute(store, cmd).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => println!("error: {}", e),
                    },
                    Ok(None) => {}
                    Err(e) => println!("error: {}", e),
                }
                prompt();
            }
            Some(event) = store.next_sync_event() => {
                if let Some(notice) = sync_notice(&event) {
                    println!("\n{}", notice);
                    prompt();
                }
            }
        }
    }
    Ok(())
}
