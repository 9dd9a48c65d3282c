// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EditError;

/// A single financial record as stored by the remote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub date: String,
    pub description: String,
    pub amount: f64, // negative = expense
    pub category: String,
}

impl Transaction {
    /// Build a new record with a freshly generated id.
    pub fn new(
        date: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            date: date.into(),
            description: description.into(),
            amount,
            category: category.into(),
        }
    }

    /// Text form of the amount used for searching, always with a fractional
    /// part. Large and tiny values use a signed, two-digit exponent (`1e+16`,
    /// `1.5e-05`).
    pub fn amount_text(&self) -> String {
        let text = format!("{:?}", self.amount);
        match text.split_once('e') {
            Some((mantissa, exp)) => {
                let (sign, digits) = match exp.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exp),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        }
    }

    pub fn apply(&mut self, field: Field, value: &str) -> Result<(), EditError> {
        match field {
            Field::Date => self.date = value.to_string(),
            Field::Description => self.description = value.to_string(),
            Field::Category => self.category = value.to_string(),
            Field::Amount => {
                self.amount = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| EditError::InvalidAmount(value.to_string()))?;
            }
        }
        Ok(())
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string().to_uppercase()
}

/// Body of a delete request.
#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
    pub id: &'a str,
}

/// Editable columns of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Description,
    Amount,
    Category,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Description => "description",
            Self::Amount => "amount",
            Self::Category => "category",
        }
    }
}

impl FromStr for Field {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "description" | "desc" => Ok(Self::Description),
            "amount" => Ok(Self::Amount),
            "category" | "cat" => Ok(Self::Category),
            _ => Err(EditError::UnknownField(s.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
