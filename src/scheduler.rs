// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::Transaction;
use crate::sync::{SyncHandle, WriteOp};

struct Pending {
    latest: Transaction,
    generation: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Table {
    pending: HashMap<String, Pending>,
    next_generation: u64,
}

/// Per-record debounce of remote updates.
///
/// Each edit replaces the pending timer for its record. When a timer
/// survives the quiet period it sends one update carrying the latest
/// state recorded for that record.
pub struct UpdateScheduler {
    quiet: Duration,
    sync: SyncHandle,
    table: Arc<Mutex<Table>>,
}

impl UpdateScheduler {
    pub fn new(quiet: Duration, sync: SyncHandle) -> Self {
        Self {
            quiet,
            sync,
            table: Arc::new(Mutex::new(Table::default())),
        }
    }

    /// Record `tx` as the newest state and restart its quiet period.
    /// Must be called from within a tokio runtime.
    pub fn schedule(&self, tx: Transaction) {
        let mut table = lock(&self.table);
        table.next_generation += 1;
        let generation = table.next_generation;
        let id = tx.id.clone();

        if let Some(old) = table.pending.remove(&id) {
            old.timer.abort();
        }

        let timer = tokio::spawn(fire_after(
            self.quiet,
            id.clone(),
            generation,
            Arc::clone(&self.table),
            self.sync.clone(),
        ));
        debug!("update for {} due in {:?}", id, self.quiet);
        table.pending.insert(
            id,
            Pending {
                latest: tx,
                generation,
                timer,
            },
        );
    }

    /// Drop the pending update for `id`, if any.
    pub fn cancel(&self, id: &str) -> bool {
        match lock(&self.table).pending.remove(id) {
            Some(p) => {
                p.timer.abort();
                debug!("cancelled pending update for {}", id);
                true
            }
            None => false,
        }
    }

    /// Send every pending update now instead of waiting out the quiet period.
    pub fn flush(&self) -> usize {
        let drained: Vec<Pending> = lock(&self.table).pending.drain().map(|(_, p)| p).collect();
        let n = drained.len();
        for p in drained {
            p.timer.abort();
            self.sync.submit(WriteOp::Update(p.latest));
        }
        if n > 0 {
            debug!("flushed {} pending updates", n);
        }
        n
    }

    pub fn pending(&self) -> usize {
        lock(&self.table).pending.len()
    }

    pub fn is_pending(&self, id: &str) -> bool {
        lock(&self.table).pending.contains_key(id)
    }
}

impl Drop for UpdateScheduler {
    fn drop(&mut self) {
        for (_, p) in lock(&self.table).pending.drain() {
            p.timer.abort();
        }
    }
}

async fn fire_after(
    quiet: Duration,
    id: String,
    generation: u64,
    table: Arc<Mutex<Table>>,
    sync: SyncHandle,
) {
    tokio::time::sleep(quiet).await;
    let due = {
        let mut table = lock(&table);
        match table.pending.get(&id) {
            // A newer edit may have replaced this entry after the sleep ended.
            Some(p) if p.generation == generation => table.pending.remove(&id),
            _ => None,
        }
    };
    if let Some(p) = due {
        debug!("quiet period over for {}", id);
        sync.submit(WriteOp::Update(p.latest));
    }
}

fn lock(table: &Mutex<Table>) -> MutexGuard<'_, Table> {
    table.lock().unwrap_or_else(|e| e.into_inner())
}
