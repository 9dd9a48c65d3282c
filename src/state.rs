// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The in-memory working set of transactions.
//!
//! [`TransactionStore`] is owned by one task and mutated only through
//! `&mut self`. Local changes apply immediately; the matching remote write
//! is queued on the write pipeline and its outcome comes back as a
//! [`SyncEvent`] that the owner drains with [`TransactionStore::poll_sync_events`].
//! Failed writes are kept in an unsynced table until a retry succeeds.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::api::TransactionApi;
use crate::error::{ApiError, EditError};
use crate::models::{Field, Transaction};
use crate::scheduler::UpdateScheduler;
use crate::sync::{SyncEvent, SyncFailure, SyncHandle, SyncOp, WriteOp, spawn_writer};
use crate::view::{self, SortSpec};

pub struct TransactionStore {
    api: Arc<dyn TransactionApi>,
    transactions: Vec<Transaction>,
    displayed: Vec<Transaction>,
    query: String,
    sort: SortSpec,
    loading: bool,
    load_error: Option<String>,
    unsynced: BTreeMap<String, SyncFailure>,
    sync: SyncHandle,
    writer: JoinHandle<()>,
    events: mpsc::UnboundedReceiver<SyncEvent>,
    scheduler: UpdateScheduler,
}

impl TransactionStore {
    /// Must be called from within a tokio runtime; it starts the writer task.
    pub fn new(api: Arc<dyn TransactionApi>, debounce: Duration) -> Self {
        let (events_tx, events) = mpsc::unbounded_channel();
        let (sync, writer) = spawn_writer(Arc::clone(&api), events_tx);
        let scheduler = UpdateScheduler::new(debounce, sync.clone());
        Self {
            api,
            transactions: Vec::new(),
            displayed: Vec::new(),
            query: String::new(),
            sort: SortSpec::default(),
            loading: false,
            load_error: None,
            unsynced: BTreeMap::new(),
            sync,
            writer,
            events,
            scheduler,
        }
    }

    /// Replace the working set with the server's copy. On failure the
    /// previous records stay and [`load_error`](Self::load_error) is set.
    pub async fn load(&mut self) -> bool {
        let fetch = self.begin_load();
        let result = fetch.await;
        self.finish_load(result)
    }

    /// First half of [`load`](Self::load): raise the loading flag and hand
    /// back the fetch. The store stays usable while the fetch runs.
    pub fn begin_load(
        &mut self,
    ) -> impl Future<Output = Result<Vec<Transaction>, ApiError>> + Send + use<> {
        self.loading = true;
        self.load_error = None;
        let api = Arc::clone(&self.api);
        async move { api.fetch_all().await }
    }

    /// Second half of [`load`](Self::load). Returns whether the fetch succeeded.
    pub fn finish_load(&mut self, result: Result<Vec<Transaction>, ApiError>) -> bool {
        self.loading = false;
        match result {
            Ok(transactions) => {
                info!("Loaded {} transactions", transactions.len());
                self.transactions = transactions;
                view::sort(&mut self.transactions, self.sort);
                self.refresh();
                true
            }
            Err(e) => {
                error!("Fetch failed: {}", e);
                self.load_error = Some(format!("Failed to load: {}", e));
                false
            }
        }
    }

    pub fn add(&mut self, tx: Transaction) {
        self.transactions.push(tx.clone());
        view::sort(&mut self.transactions, self.sort);
        self.refresh();
        self.sync.submit(WriteOp::Create(tx));
    }

    /// Remove the record locally and queue the remote delete.
    /// Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(pos) = self.transactions.iter().position(|t| t.id == id) else {
            return false;
        };
        self.transactions.remove(pos);
        self.scheduler.cancel(id);
        self.refresh();
        self.sync.submit(WriteOp::Delete(id.to_string()));
        true
    }

    /// Change one field in place and debounce the remote update.
    pub fn edit(&mut self, id: &str, field: Field, value: &str) -> Result<(), EditError> {
        let tx = self
            .transactions
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| EditError::NotFound(id.to_string()))?;
        tx.apply(field, value)?;
        let updated = tx.clone();
        view::sort(&mut self.transactions, self.sort);
        self.refresh();
        self.scheduler.schedule(updated);
        Ok(())
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.refresh();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        view::sort(&mut self.transactions, sort);
        self.refresh();
    }

    fn refresh(&mut self) {
        self.displayed = view::filter(&self.transactions, &self.query);
    }

    /// Canonical collection, sorted but unfiltered.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn displayed(&self) -> &[Transaction] {
        &self.displayed
    }

    pub fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Full id of the only record whose id starts with `prefix` (case-insensitive).
    pub fn resolve_id(&self, prefix: &str) -> Option<String> {
        let prefix = prefix.trim().to_uppercase();
        if prefix.is_empty() {
            return None;
        }
        let mut hits = self
            .transactions
            .iter()
            .filter(|t| t.id.to_uppercase().starts_with(&prefix));
        match (hits.next(), hits.next()) {
            (Some(t), None) => Some(t.id.clone()),
            _ => None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> SortSpec {
        self.sort
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pending_updates(&self) -> usize {
        self.scheduler.pending()
    }

    /// Apply write outcomes reported since the last call.
    /// Returns the failures among them.
    pub fn poll_sync_events(&mut self) -> Vec<SyncFailure> {
        let mut failed = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            if let Some(f) = apply_event(&mut self.unsynced, event) {
                failed.push(f);
            }
        }
        failed
    }

    /// Wait for the next write outcome and apply it.
    /// Cancel safe, so it can sit in a `select!` next to user input.
    pub async fn next_sync_event(&mut self) -> Option<SyncEvent> {
        let event = self.events.recv().await?;
        apply_event(&mut self.unsynced, event.clone());
        Some(event)
    }

    /// Writes that failed and have not been retried successfully.
    pub fn unsynced(&self) -> impl Iterator<Item = &SyncFailure> {
        self.unsynced.values()
    }

    /// Queue every unsynced write again, using the record's current local
    /// state. Outcomes arrive through [`poll_sync_events`](Self::poll_sync_events).
    pub fn retry_unsynced(&mut self) -> usize {
        self.poll_sync_events();
        let failures = std::mem::take(&mut self.unsynced);
        let mut queued = 0;
        for (id, failure) in failures {
            let op = match failure.op {
                SyncOp::Delete => WriteOp::Delete(id),
                SyncOp::Create | SyncOp::Update => match self.get(&id) {
                    Some(tx) if failure.op == SyncOp::Create => WriteOp::Create(tx.clone()),
                    Some(tx) => WriteOp::Update(tx.clone()),
                    // Removed locally since; nothing left to send.
                    None => continue,
                },
            };
            info!("Retrying {} for {}", failure.op, op.id());
            if self.sync.submit(op) {
                queued += 1;
            }
        }
        queued
    }

    /// Send pending edits immediately, wait for every queued write and
    /// return the writes that did not sync.
    pub async fn shutdown(self) -> Vec<SyncFailure> {
        self.scheduler.flush();
        let TransactionStore {
            sync,
            writer,
            scheduler,
            mut events,
            mut unsynced,
            ..
        } = self;
        drop(scheduler);
        drop(sync);
        if let Err(e) = writer.await {
            warn!("writer task ended abnormally: {}", e);
        }
        while let Ok(event) = events.try_recv() {
            apply_event(&mut unsynced, event);
        }
        unsynced.into_values().collect()
    }
}

fn apply_event(
    unsynced: &mut BTreeMap<String, SyncFailure>,
    event: SyncEvent,
) -> Option<SyncFailure> {
    match event {
        SyncEvent::Synced { op, id } => {
            // An update landing does not prove an earlier failed create did.
            let clears = match unsynced.get(&id) {
                Some(f) => op == f.op || op != SyncOp::Update,
                None => false,
            };
            if clears {
                unsynced.remove(&id);
            }
            None
        }
        SyncEvent::Failed(failure) => {
            let keep_create = unsynced
                .get(&failure.id)
                .is_some_and(|f| f.op == SyncOp::Create && failure.op == SyncOp::Update);
            if !keep_create {
                unsynced.insert(failure.id.clone(), failure.clone());
            }
            Some(failure)
        }
    }
}
