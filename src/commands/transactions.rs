// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use clap::ArgMatches;

use crate::models::{Field, Transaction};
use crate::state::TransactionStore;
use crate::utils::{maybe_print_json, parse_amount, today, transactions_table};
use crate::view::{SortKey, SortOrder, SortSpec};

pub async fn ensure_loaded(store: &mut TransactionStore) -> Result<()> {
    if store.load().await {
        return Ok(());
    }
    Err(anyhow!(
        "{}",
        store.load_error().unwrap_or("Failed to load transactions")
    ))
}

pub fn sort_spec(sub: &ArgMatches) -> Result<SortSpec> {
    let key = match sub.get_one::<String>("sort") {
        Some(k) => k.parse::<SortKey>()?,
        None => SortKey::Date,
    };
    let order = if sub.get_flag("asc") {
        SortOrder::Ascending
    } else {
        SortOrder::Descending
    };
    Ok(SortSpec::new(key, order))
}

/// Apply `--filter`, `--sort` and `--asc` to the store's view.
pub fn apply_view(store: &mut TransactionStore, sub: &ArgMatches) -> Result<()> {
    store.set_sort(sort_spec(sub)?);
    store.set_query(sub.get_one::<String>("filter").cloned().unwrap_or_default());
    Ok(())
}

/// Exact id, or the id that uniquely starts with `raw`.
pub fn resolve_id(store: &TransactionStore, raw: &str) -> Result<String> {
    let raw = raw.trim();
    if store.get(raw).is_some() {
        return Ok(raw.to_string());
    }
    store
        .resolve_id(raw)
        .ok_or_else(|| anyhow!("Transaction '{}' not found or ambiguous", raw))
}

pub async fn list(store: &mut TransactionStore, sub: &ArgMatches) -> Result<()> {
    ensure_loaded(store).await?;
    apply_view(store, sub)?;
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    if !maybe_print_json(json_flag, jsonl_flag, &store.displayed())? {
        println!("{}", transactions_table(store.displayed()));
    }
    Ok(())
}

pub fn add(store: &mut TransactionStore, sub: &ArgMatches) -> Result<Transaction> {
    let description = sub.get_one::<String>("description").unwrap();
    let amount = parse_amount(sub.get_one::<String>("amount").unwrap())?;
    let category = sub
        .get_one::<String>("category")
        .map(|s| s.trim().to_string())
        .unwrap_or_default();
    let date = sub
        .get_one::<String>("date")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(today);

    let tx = Transaction::new(date, description.trim(), amount, category);
    store.add(tx.clone());
    println!(
        "Recorded {:.2} on {} '{}' (id {})",
        tx.amount, tx.date, tx.description, tx.id
    );
    Ok(tx)
}

pub async fn edit(store: &mut TransactionStore, sub: &ArgMatches) -> Result<()> {
    ensure_loaded(store).await?;
    let id = resolve_id(store, sub.get_one::<String>("id").unwrap())?;
    let field = sub.get_one::<String>("field").unwrap().parse::<Field>()?;
    let value = sub.get_one::<String>("value").unwrap();
    store.edit(&id, field, value)?;
    println!("Set {} of {} to '{}'", field, id, value);
    Ok(())
}

pub async fn rm(store: &mut TransactionStore, sub: &ArgMatches) -> Result<()> {
    ensure_loaded(store).await?;
    let id = resolve_id(store, sub.get_one::<String>("id").unwrap())?;
    store.remove(&id);
    println!("Removed transaction {}", id);
    Ok(())
}
