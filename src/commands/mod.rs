// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod config;
pub mod exporter;
pub mod shell;
pub mod transactions;

use anyhow::{Result, bail};

use crate::state::TransactionStore;

/// Flush pending edits, wait for queued writes and fail if any did not sync.
pub async fn finish(store: TransactionStore) -> Result<()> {
    let failed = store.shutdown().await;
    if failed.is_empty() {
        return Ok(());
    }
    for f in &failed {
        eprintln!("not synced: {} {} ({})", f.op, f.id, f.message);
    }
    bail!("{} change(s) were not saved remotely", failed.len())
}
