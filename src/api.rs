// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::models::{DeleteRequest, Transaction};
use crate::utils::http_client;

pub const FETCH_PATH: &str = "getTransactions.php";
pub const CREATE_PATH: &str = "addTransaction.php";
pub const UPDATE_PATH: &str = "updateTransaction.php";
pub const DELETE_PATH: &str = "deleteTransaction.php";

/// The four operations of the transactions backend.
///
/// Every call resolves exactly once. Nothing is retried or cancelled here;
/// callers own all consistency decisions.
#[async_trait]
pub trait TransactionApi: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Transaction>, ApiError>;
    async fn create(&self, tx: &Transaction) -> Result<(), ApiError>;
    async fn update(&self, tx: &Transaction) -> Result<(), ApiError>;
    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// HTTP implementation of [`TransactionApi`].
pub struct RemoteClient {
    http_client: HttpClient,
    config: ClientConfig,
}

impl RemoteClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        config.validate()?;
        let http_client = http_client(config.timeout)
            .map_err(|e| ApiError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// POST a JSON body. Any response counts as success; the body is ignored.
    async fn post_json<B: Serialize + Sync>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        let url = self.config.endpoint(path);
        debug!("POST {}", url);
        let response = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("POST {} failed: {}", url, e)))?;
        let status = response.status();
        if !status.is_success() {
            warn!("POST {} answered {}, treating as delivered", url, status);
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionApi for RemoteClient {
    async fn fetch_all(&self) -> Result<Vec<Transaction>, ApiError> {
        let url = self.config.endpoint(FETCH_PATH);
        debug!("GET {}", url);
        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Transport(format!("GET {} failed: {}", url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Reading body of {} failed: {}", url, e)))?;
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let transactions: Vec<Transaction> =
            serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        debug!("Fetched {} transactions", transactions.len());
        Ok(transactions)
    }

    async fn create(&self, tx: &Transaction) -> Result<(), ApiError> {
        self.post_json(CREATE_PATH, tx).await
    }

    async fn update(&self, tx: &Transaction) -> Result<(), ApiError> {
        self.post_json(UPDATE_PATH, tx).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.post_json(DELETE_PATH, &DeleteRequest { id }).await
    }
}
