//! `hireloop serve` -- HTTP server hosting both agents.

use anyhow::Result;
use console::style;
use tokio_util::sync::CancellationToken;

use hireloop_types::config::DeploymentMode;

use crate::http::router::build_router;
use crate::runner::spawn_local_agents;
use crate::state::{AppState, ServerState};

pub async fn serve(state: AppState, host: &str, port: u16) -> Result<()> {
    let agents = state.agents()?;

    // In local mode replies travel over the bus, so the agent loops must run
    // alongside the server.
    let cancel = CancellationToken::new();
    let loops = if state.config.mode == DeploymentMode::Local {
        spawn_local_agents(&agents, &state.bus, cancel.clone(), None)
    } else {
        Vec::new()
    };

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    println!(
        "  {} hireloop ({} mode) listening on {}",
        style("⚡").bold(),
        state.config.mode,
        style(format!("http://{addr}")).cyan()
    );
    println!("  {}", style("Press Ctrl+C to stop").dim());

    let router = build_router(ServerState {
        app: state,
        agents,
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    for handle in loops {
        let _ = handle.await;
    }

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
