// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use budgetr::api::TransactionApi;
use budgetr::error::ApiError;
use budgetr::models::Transaction;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    FetchAll,
    Create(Transaction),
    Update(Transaction),
    Delete(String),
}

/// In-memory backend. Writes are recorded when they complete, so the
/// order of `calls()` is the order the server saw them finish.
pub struct FakeApi {
    calls: Mutex<Vec<Call>>,
    fetch: Mutex<Result<Vec<Transaction>, ApiError>>,
    fail_writes: AtomicBool,
    write_delays: Mutex<VecDeque<Duration>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::with_rows(Vec::new())
    }

    pub fn with_rows(rows: Vec<Transaction>) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fetch: Mutex::new(Ok(rows)),
            fail_writes: AtomicBool::new(false),
            write_delays: Mutex::new(VecDeque::new()),
        }
    }

    pub fn set_fetch(&self, result: Result<Vec<Transaction>, ApiError>) {
        *self.fetch.lock().unwrap() = result;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Delay applied to the next write calls, one entry per call.
    pub fn push_write_delay(&self, d: Duration) {
        self.write_delays.lock().unwrap().push_back(d);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<Transaction> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Update(tx) => Some(tx),
                _ => None,
            })
            .collect()
    }

    async fn write(&self, call: Call) -> Result<(), ApiError> {
        let delay = self.write_delays.lock().unwrap().pop_front();
        if let Some(d) = delay {
            tokio::time::sleep(d).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ApiError::Transport("connection refused".into()));
        }
        self.calls.lock().unwrap().push(call);
        Ok(())
    }
}

#[async_trait]
impl TransactionApi for FakeApi {
    async fn fetch_all(&self) -> Result<Vec<Transaction>, ApiError> {
        self.calls.lock().unwrap().push(Call::FetchAll);
        self.fetch.lock().unwrap().clone()
    }

    async fn create(&self, tx: &Transaction) -> Result<(), ApiError> {
        self.write(Call::Create(tx.clone())).await
    }

    async fn update(&self, tx: &Transaction) -> Result<(), ApiError> {
        self.write(Call::Update(tx.clone())).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.write(Call::Delete(id.to_string())).await
    }
}

pub fn tx(id: &str, date: &str, description: &str, amount: f64, category: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: date.to_string(),
        description: description.to_string(),
        amount,
        category: category.to_string(),
    }
}

pub fn sample() -> Vec<Transaction> {
    vec![
        tx("A1", "2024-01-01", "Groceries at Corner Shop", -42.5, "Food"),
        tx("B2", "2023-06-01", "Salary", 2500.0, "Income"),
        tx("C3", "2024-06-01", "Train ticket", -12.0, "Travel"),
    ]
}

/// Let spawned tasks run until they are idle.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}
