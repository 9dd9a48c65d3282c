// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;

use crate::config::{BASE_URL_ENV, ClientConfig, default_config_path};
use crate::utils::pretty_table;

pub fn handle(cfg: &ClientConfig) -> Result<()> {
    let path = default_config_path()
        .map(|p| {
            let state = if p.exists() { "" } else { " (not present)" };
            format!("{}{}", p.display(), state)
        })
        .unwrap_or_else(|e| format!("unavailable: {}", e));
    let rows = vec![
        vec!["base_url".to_string(), cfg.base_url.clone()],
        vec!["timeout".to_string(), format!("{}s", cfg.timeout.as_secs())],
        vec![
            "debounce".to_string(),
            format!("{}ms", cfg.debounce.as_millis()),
        ],
        vec!["config file".to_string(), path],
        vec!["env override".to_string(), BASE_URL_ENV.to_string()],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}
