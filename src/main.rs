//! capi-ibmcloud-webhooks - admission webhooks for IBM Cloud machine resources.
//!
//! This is the main entry point that:
//! - Initializes structured logging
//! - Reads configuration from the environment
//! - Starts the health server and the TLS webhook server

use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{error, info};

use capi_ibmcloud_webhooks::health::{HealthState, run_health_server};
use capi_ibmcloud_webhooks::{Config, run_webhook_server};

/// Grace period for in-flight admission requests to complete during shutdown
const SHUTDOWN_GRACE_PERIOD_SECS: u64 = 5;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("capi_ibmcloud_webhooks=info".parse()?)
                .add_directive("kube=info".parse()?),
        )
        .json()
        .init();

    info!("Starting capi-ibmcloud-webhooks");

    let config = Config::from_env()?;
    info!(
        webhook_port = config.webhook_port,
        health_port = config.health_port,
        cert_path = %config.cert_path.display(),
        "Loaded configuration"
    );

    if !config.certificates_present() {
        error!(
            cert_path = %config.cert_path.display(),
            key_path = %config.key_path.display(),
            "Webhook certificates not found"
        );
    }

    // Create shared health state
    let health_state = Arc::new(HealthState::new());

    // Start health server immediately (liveness should work before TLS is up)
    let health_handle = {
        let health_state = health_state.clone();
        let port = config.health_port;
        tokio::spawn(async move {
            if let Err(e) = run_health_server(health_state, port).await {
                error!("Health server error: {}", e);
            }
        })
    };

    let webhook_handle = {
        let health_state = health_state.clone();
        let config = config.clone();
        tokio::spawn(async move {
            run_webhook_server(&config, health_state).await
        })
    };

    // Wait for any task to complete (or fail), or shutdown signal
    tokio::select! {
        result = webhook_handle => {
            match result {
                Ok(Ok(())) => info!("Webhook server stopped"),
                Ok(Err(e)) => {
                    error!("Webhook server error: {}", e);
                    return Err(e.into());
                }
                Err(e) => error!("Webhook server task panicked: {}", e),
            }
        }
        result = health_handle => {
            if let Err(e) = result {
                error!("Health server task panicked: {}", e);
            }
        }
        // Handle graceful shutdown on SIGTERM or SIGINT
        _ = shutdown_signal() => {
            info!("Received shutdown signal, initiating graceful shutdown...");

            // Mark as not ready so the Service stops routing admission requests
            health_state.set_ready(false).await;
            info!("Marked webhook server as not ready");

            info!(
                "Waiting {}s for in-flight admission requests to complete...",
                SHUTDOWN_GRACE_PERIOD_SECS
            );
            tokio::time::sleep(Duration::from_secs(SHUTDOWN_GRACE_PERIOD_SECS)).await;

            info!("Grace period complete, shutting down");
        }
    }

    info!("Webhook server exited");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or SIGINT)
///
/// Note: Signal handler setup failures are fatal - the server cannot shut down
/// gracefully without them.
#[allow(clippy::expect_used)]
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
