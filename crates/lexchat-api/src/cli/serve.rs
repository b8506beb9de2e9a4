//! `lexchat serve`: run the REST API until Ctrl+C / SIGTERM.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;
use tracing::{error, info};

use lexchat_infra::config::load_runtime_config;
use lexchat_types::identity::OwnerId;

use crate::cli::OutputMode;
use crate::cli::key::print_issued_key;
use crate::http;
use crate::state::AppState;

pub async fn serve(data_dir: PathBuf, host: &str, port: u16, output: OutputMode) -> Result<()> {
    let runtime = load_runtime_config(&data_dir).await;
    let state = AppState::init(data_dir, runtime).await?;

    // First start: nobody could authenticate, so hand out a key.
    if !state.api_keys.any_issued().await? {
        let issued = state.api_keys.issue(OwnerId::new(), "default").await?;
        print_issued_key(&issued, output)?;
    }

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    if output == OutputMode::Styled {
        println!(
            "  {} lexchat API listening on {}",
            style(">").green().bold(),
            style(format!("http://{addr}")).cyan()
        );
        println!("  Data directory: {}", state.data_dir.display());
        println!();
    }
    info!(%addr, "Server started");

    let router = http::router::build_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if output == OutputMode::Styled {
        println!("\n  Server stopped.");
    }
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
///
/// A signal source that cannot be installed never fires; the other one
/// still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received");
}
