//! `tourdesk-api` -- HTTP surface for the booking page forms.
//!
//! Each endpoint stands in for one page event (submit, blur, input, close
//! button) and drives the same validation and notification logic the page
//! runs. See [`tourdesk_api::config`] for the environment variables.

use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tourdesk_api::app::{build_router, build_state};
use tourdesk_api::config::{as_millis_u64, FormsConfig, ServerConfig};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "tourdesk_api=debug,tourdesk_events=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid server configuration");
        std::process::exit(1);
    });
    let forms = FormsConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid form configuration");
        std::process::exit(1);
    });
    tracing::info!(
        host = %config.host,
        port = config.port,
        guests_min = forms.validation.guests_min,
        guests_max = forms.validation.guests_max,
        submit_delay_ms = as_millis_u64(forms.submit_delay),
        "Loaded configuration",
    );

    let addr_host = config.host.clone();
    let port = config.port;

    // --- App state and router ---
    let app = build_state(config, &forms)
        .and_then(build_router)
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build application");
            std::process::exit(1);
        });

    // --- Start server ---
    let ip = addr_host.parse().unwrap_or_else(|_| {
        tracing::error!(host = %addr_host, "HOST is not a valid IP address");
        std::process::exit(1);
    });
    let addr = SocketAddr::new(ip, port);
    tracing::info!(%addr, "Starting server");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "Failed to bind to address");
            std::process::exit(1);
        }
    };

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
