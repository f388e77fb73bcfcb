// SPDX-FileCopyrightText: 2026 Vocal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `vocal serve` command implementation.
//!
//! Wires the SQLite storage, identity provider and voice vendor adapters into
//! the studio services, then serves the HTTP API until SIGINT or SIGTERM.

use std::sync::Arc;

use tracing::{info, warn};

use vocal_config::model::VocalConfig;
use vocal_core::{HealthStatus, PluginAdapter, StorageAdapter, VocalError};
use vocal_gateway::{AppState, start_server};
use vocal_identity::SupabaseIdentity;
use vocal_storage::SqliteStorage;
use vocal_studio::Studio;
use vocal_vendor::ElevenLabsVendor;

/// Runs the `vocal serve` command.
pub async fn run_serve(config: VocalConfig) -> Result<(), VocalError> {
    init_tracing(&config.server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting vocal serve");

    let storage = open_storage(&config).await?;
    let identity = Arc::new(SupabaseIdentity::new(&config.identity)?);
    let vendor = Arc::new(ElevenLabsVendor::new(&config.vendor)?);

    let adapters: [&dyn PluginAdapter; 3] = [storage.as_ref(), identity.as_ref(), vendor.as_ref()];
    for adapter in adapters {
        info!(
            adapter = adapter.name(),
            kind = %adapter.adapter_type(),
            version = %adapter.version(),
            "adapter ready"
        );
    }

    let studio = Studio::new(storage.clone(), vendor.clone(), config.pagination.clone());
    let state = AppState {
        studio,
        identity: identity.clone(),
        max_upload_bytes: config.server.max_upload_bytes,
    };

    let served = start_server(
        &config.server.host,
        config.server.port,
        state,
        shutdown_signal(),
    )
    .await;

    for result in [
        identity.shutdown().await,
        vendor.shutdown().await,
        storage.close().await,
    ] {
        if let Err(e) = result {
            warn!(error = %e, "adapter shutdown failed");
        }
    }

    served?;
    info!("vocal serve shutdown complete");
    Ok(())
}

/// Opens and migrates the SQLite database named in the config.
pub async fn open_storage(config: &VocalConfig) -> Result<Arc<SqliteStorage>, VocalError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    match storage.health_check().await? {
        HealthStatus::Healthy => {}
        HealthStatus::Degraded(reason) => warn!(reason = %reason, "storage degraded"),
        HealthStatus::Unhealthy(reason) => {
            return Err(VocalError::storage(format!("storage unhealthy: {reason}")));
        }
    }
    Ok(Arc::new(storage))
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received SIGINT (Ctrl+C), initiating shutdown"),
        _ = terminate => info!("received SIGTERM, initiating shutdown"),
    }
}

/// Initializes the tracing subscriber with the given log level.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("vocal={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
