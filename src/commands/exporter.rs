// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::commands::transactions::{apply_view, ensure_loaded};
use crate::models::Transaction;
use crate::state::TransactionStore;

pub async fn handle(store: &mut TransactionStore, sub: &ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();
    ensure_loaded(store).await?;
    apply_view(store, sub)?;
    write_export(store.displayed(), &fmt, Path::new(out))?;
    println!("Exported {} transactions to {}", store.displayed().len(), out);
    Ok(())
}

pub fn write_export(rows: &[Transaction], fmt: &str, out: &Path) -> Result<()> {
    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)
                .with_context(|| format!("Create {}", out.display()))?;
            wtr.write_record(["id", "date", "description", "category", "amount"])?;
            for tx in rows {
                wtr.write_record([
                    tx.id.as_str(),
                    tx.date.as_str(),
                    tx.description.as_str(),
                    tx.category.as_str(),
                    tx.amount.to_string().as_str(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let file = File::create(out).with_context(|| format!("Create {}", out.display()))?;
            let mut w = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut w, rows)?;
            w.flush()?;
        }
        other => bail!("Unsupported export format '{}', expected csv or json", other),
    }
    Ok(())
}
