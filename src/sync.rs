// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ordered write pipeline between the local state and the remote API.
//!
//! Writes are queued in submission order. Each record has its own lane:
//! a write only starts once every earlier write for the same record has
//! finished, while writes for different records run concurrently. Results
//! travel back to the state owner as [`SyncEvent`]s.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, warn};

use crate::api::TransactionApi;
use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOp {
    Create,
    Update,
    Delete,
}

impl fmt::Display for SyncOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SyncOp::Create => "create",
            SyncOp::Update => "update",
            SyncOp::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    Create(Transaction),
    Update(Transaction),
    Delete(String),
}

impl WriteOp {
    pub fn id(&self) -> &str {
        match self {
            WriteOp::Create(tx) | WriteOp::Update(tx) => &tx.id,
            WriteOp::Delete(id) => id,
        }
    }

    pub fn kind(&self) -> SyncOp {
        match self {
            WriteOp::Create(_) => SyncOp::Create,
            WriteOp::Update(_) => SyncOp::Update,
            WriteOp::Delete(_) => SyncOp::Delete,
        }
    }
}

/// A write the server never acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncFailure {
    pub op: SyncOp,
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    Synced { op: SyncOp, id: String },
    Failed(SyncFailure),
}

/// Cheap, cloneable entry point into the writer task.
#[derive(Clone)]
pub struct SyncHandle {
    tx: mpsc::UnboundedSender<WriteOp>,
}

impl SyncHandle {
    /// Queue a write. Returns false once the writer has shut down.
    pub fn submit(&self, op: WriteOp) -> bool {
        debug!("queue {} for {}", op.kind(), op.id());
        match self.tx.send(op) {
            Ok(()) => true,
            Err(mpsc::error::SendError(op)) => {
                warn!("writer stopped, dropping {} for {}", op.kind(), op.id());
                false
            }
        }
    }
}

/// Start the writer task. It runs until every [`SyncHandle`] is dropped,
/// then waits for the writes still in flight.
pub fn spawn_writer(
    api: Arc<dyn TransactionApi>,
    events: mpsc::UnboundedSender<SyncEvent>,
) -> (SyncHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run_writer(api, rx, events));
    (SyncHandle { tx }, task)
}

async fn run_writer(
    api: Arc<dyn TransactionApi>,
    mut rx: mpsc::UnboundedReceiver<WriteOp>,
    events: mpsc::UnboundedSender<SyncEvent>,
) {
    // Completion signal of the newest write queued for each record.
    let mut lanes: HashMap<String, oneshot::Receiver<()>> = HashMap::new();
    let mut in_flight = JoinSet::new();

    while let Some(op) = rx.recv().await {
        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                warn!("write task ended abnormally: {}", e);
            }
        }
        lanes.retain(|_, done| {
            matches!(done.try_recv(), Err(oneshot::error::TryRecvError::Empty))
        });

        let (done_tx, done_rx) = oneshot::channel();
        let previous = lanes.insert(op.id().to_string(), done_rx);

        let api = api.clone();
        let events = events.clone();
        in_flight.spawn(async move {
            if let Some(previous) = previous {
                // Err means the earlier write's task is gone; either way it is over.
                let _ = previous.await;
            }
            let event = perform(api.as_ref(), op).await;
            // The receiver is gone only when nobody cares about the outcome.
            let _ = events.send(event);
            let _ = done_tx.send(());
        });
    }

    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            warn!("write task ended abnormally: {}", e);
        }
    }
    debug!("writer stopped");
}

async fn perform(api: &dyn TransactionApi, op: WriteOp) -> SyncEvent {
    let kind = op.kind();
    let result = match &op {
        WriteOp::Create(tx) => api.create(tx).await,
        WriteOp::Update(tx) => api.update(tx).await,
        WriteOp::Delete(id) => api.delete(id).await,
    };
    let id = op.id().to_string();
    match result {
        Ok(()) => {
            debug!("{} {} synced", kind, id);
            SyncEvent::Synced { op: kind, id }
        }
        Err(e) => {
            warn!("{} failed for {}: {}", kind, id, e);
            SyncEvent::Failed(SyncFailure {
                op: kind,
                id,
                message: e.to_string(),
            })
        }
    }
}
