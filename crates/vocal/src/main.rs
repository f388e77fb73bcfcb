// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vocal - voice-journal API server.
//!
//! This is the binary entry point for the Vocal service.

mod config_cmd;
mod reconcile;
mod serve;

use std::path::PathBuf;
use std::time::Duration;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

/// Vocal - voice cloning, guided audio sessions and journaling over HTTP.
#[derive(Parser, Debug)]
#[command(name = "vocal", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the XDG hierarchy.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Validate configuration and print the effective values (secrets redacted).
    Config,
    /// Delete vendor voices whose local voice model was never committed.
    Reconcile {
        /// Only consider clones staged at least this many seconds ago.
        #[arg(long, default_value_t = 3600)]
        older_than_secs: u64,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => vocal_config::load_and_validate_path(path),
        None => vocal_config::load_and_validate(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(errors) => {
            vocal_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Config) => config_cmd::run_config(&config),
        Some(Commands::Reconcile { older_than_secs }) => {
            reconcile::run_reconcile(config, Duration::from_secs(older_than_secs)).await
        }
        None => {
            println!("vocal: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
