// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client configuration, resolved from defaults, an optional JSON file,
//! the environment and command-line flags (in that order).

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ApiError;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Budgetr", "budgetr"));

pub const DEFAULT_BASE_URL: &str = "https://www.cs.drexel.edu/~rb468/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;
pub const BASE_URL_ENV: &str = "BUDGETR_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub debounce: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl ClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full URL of an endpoint script, e.g. `getTransactions.php`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = Url::parse(&self.base_url)
            .map_err(|_| ApiError::InvalidBaseUrl(self.base_url.clone()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            _ => Err(ApiError::InvalidBaseUrl(self.base_url.clone())),
        }
    }

    /// Layer the file, the environment and the parsed flags over the defaults.
    pub fn resolve(
        file: Option<&ConfigFile>,
        env_base_url: Option<String>,
        m: &clap::ArgMatches,
    ) -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(f) = file {
            if let Some(url) = &f.base_url {
                cfg.base_url = url.clone();
            }
            if let Some(secs) = f.timeout_secs {
                cfg.timeout = Duration::from_secs(secs);
            }
            if let Some(ms) = f.debounce_ms {
                cfg.debounce = Duration::from_millis(ms);
            }
        }
        if let Some(url) = env_base_url.filter(|s| !s.trim().is_empty()) {
            cfg.base_url = url.trim().to_string();
        }
        if let Some(url) = m.get_one::<String>("base_url") {
            cfg.base_url = url.trim().to_string();
        }
        if let Some(secs) = m.get_one::<u64>("timeout") {
            cfg.timeout = Duration::from_secs(*secs);
        }
        if let Some(ms) = m.get_one::<u64>("debounce_ms") {
            cfg.debounce = Duration::from_millis(*ms);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Resolve using the real environment and the default or `--config` file.
    pub fn load(m: &clap::ArgMatches) -> Result<Self> {
        let path = match m.get_one::<String>("config") {
            Some(p) => Some(PathBuf::from(p)),
            None => default_config_path().ok().filter(|p| p.exists()),
        };
        let file = match path {
            Some(p) => Some(ConfigFile::read(&p)?),
            None => None,
        };
        Self::resolve(file.as_ref(), std::env::var(BASE_URL_ENV).ok(), m)
    }
}

/// On-disk shape of `config.json`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub debounce_ms: Option<u64>,
}

impl ConfigFile {
    pub fn parse(s: &str) -> Result<Self> {
        serde_json::from_str(s).context("Invalid config file, expected a JSON object")
    }

    pub fn read(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)
            .with_context(|| format!("Read config at {}", path.display()))?;
        Self::parse(&s).with_context(|| format!("Parse config at {}", path.display()))
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific config dir")?;
    Ok(proj.config_dir().join("config.json"))
}
