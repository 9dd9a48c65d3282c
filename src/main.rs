// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::sync::Arc;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use budgetr::api::RemoteClient;
use budgetr::config::ClientConfig;
use budgetr::state::TransactionStore;
use budgetr::{cli, commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "budgetr=debug" } else { "budgetr=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let matches = cli::build_cli().get_matches();
    init_logging(matches.get_flag("verbose"));

    let config = ClientConfig::load(&matches)?;
    if let Some(("config", _)) = matches.subcommand() {
        return commands::config::handle(&config);
    }

    let api = Arc::new(RemoteClient::new(config.clone())?);
    let mut store = TransactionStore::new(api, config.debounce);

    let outcome = match matches.subcommand() {
        Some(("list", sub)) => commands::transactions::list(&mut store, sub).await,
        Some(("add", sub)) => commands::transactions::add(&mut store, sub).map(|_| ()),
        Some(("edit", sub)) => commands::transactions::edit(&mut store, sub).await,
        Some(("rm", sub)) => commands::transactions::rm(&mut store, sub).await,
        Some(("export", sub)) => commands::exporter::handle(&mut store, sub).await,
        Some(("shell", _)) => commands::shell::run(&mut store).await,
        _ => {
            cli::build_cli().print_help()?;
            println!();
            Ok(())
        }
    };
    // Pending writes still go out when the command itself failed.
    let synced = commands::finish(store).await;
    outcome.and(synced)
}
