// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Error types for the remote API and local edits.

use thiserror::Error;

/// Failure of a remote API call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Connectivity problem or timeout; no response was received.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered a read with a non-success status.
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(String),

    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Rejected local edit. The record is left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("no transaction with id '{0}'")]
    NotFound(String),

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("unknown field '{0}', expected date, description, amount or category")]
    UnknownField(String),
}
