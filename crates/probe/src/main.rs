//! `comfyprobe` -- manual integration check for ComfyUI progress tracking.
//!
//! Polls the progress and queue routes on ComfyUI and on the Open WebUI
//! proxy, prints what each returned, then prints a simulated progress
//! bar walk-through. Always exits 0; failures are part of the report.
//!
//! # Environment variables
//!
//! | Variable                     | Required | Default                            |
//! |------------------------------|----------|------------------------------------|
//! | `COMFYUI_URL`                | no       | `http://host.docker.internal:8188` |
//! | `OPEN_WEBUI_URL`             | no       | `http://localhost:8080`            |
//! | `PROBE_REQUEST_TIMEOUT_SECS` | no       | no timeout                         |

use std::io;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use comfyprobe::checks::Probe;
use comfyprobe::config::ProbeConfig;
use comfyprobe::session;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "comfyprobe=info,comfyprobe_comfyui=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = ProbeConfig::from_env();
    tracing::info!(
        comfyui_url = %config.comfyui_url,
        open_webui_url = %config.open_webui_url,
        timeout_secs = config.request_timeout.map(|t| t.as_secs()),
        "Loaded probe configuration",
    );

    let client = config.http_client().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });

    let probe = Probe::new(client, config);
    if let Err(e) = session::run_session(&probe, io::stdout(), wait_for_interrupt()).await {
        tracing::error!(error = %e, "Failed to write report");
    }
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn wait_for_interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received SIGINT (Ctrl-C)");
}
