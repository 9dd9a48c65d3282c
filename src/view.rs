// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Filtering and ordering of the transaction table.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use anyhow::{Result, anyhow};

use crate::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Date,
    Description,
    Amount,
    Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// The single active sort column. Defaults to newest date first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Date,
            order: SortOrder::Descending,
        }
    }
}

impl SortSpec {
    pub fn new(key: SortKey, order: SortOrder) -> Self {
        Self { key, order }
    }

    fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        let ord = match self.key {
            SortKey::Date => a.date.cmp(&b.date),
            SortKey::Description => a.description.cmp(&b.description),
            SortKey::Amount => a.amount.total_cmp(&b.amount),
            SortKey::Category => a.category.cmp(&b.category),
        };
        match self.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "description" => Ok(Self::Description),
            "amount" => Ok(Self::Amount),
            "category" | "cat" => Ok(Self::Category),
            other => Err(anyhow!(
                "Unknown sort key '{}', expected date, description, amount or category",
                other
            )),
        }
    }
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(anyhow!("Unknown sort order '{}', expected asc or desc", other)),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self.key {
            SortKey::Date => "date",
            SortKey::Description => "description",
            SortKey::Amount => "amount",
            SortKey::Category => "category",
        };
        let order = match self.order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        write!(f, "{} {}", key, order)
    }
}

/// Case-insensitive substring match against description, category, date and amount.
/// An empty query matches everything.
pub fn matches(tx: &Transaction, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let q = query.to_lowercase();
    tx.description.to_lowercase().contains(&q)
        || tx.category.to_lowercase().contains(&q)
        || tx.date.to_lowercase().contains(&q)
        || tx.amount_text().to_lowercase().contains(&q)
}

/// Matching records in the order they appear in `transactions`.
pub fn filter(transactions: &[Transaction], query: &str) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| matches(tx, query))
        .cloned()
        .collect()
}

/// Stable in-place sort; equal keys keep their relative order.
pub fn sort(transactions: &mut [Transaction], spec: SortSpec) {
    transactions.sort_by(|a, b| spec.compare(a, b));
}

