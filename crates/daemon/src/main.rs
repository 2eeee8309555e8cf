// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! klaxond: batch-job failure alerting daemon.
//!
//! Reads NDJSON job-lifecycle events on stdin, mails operators about
//! terminal failures of the tracked job family, and alarms on its own
//! processor health. Runs until stdin EOF or SIGINT/SIGTERM.

use kx_adapters::PipeMailer;
use kx_core::SystemClock;
use kx_daemon::{Config, Engine};
use std::process::ExitCode;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Intake buffer between the stdin reader and the engine loop.
const INTAKE_BUFFER: usize = 256;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "configuration rejected");
            return ExitCode::from(2);
        }
    };
    tracing::info!(
        version = kx_daemon::env::VERSION,
        topics = config.topics.len(),
        notify_topic = %config.notify_topic,
        alert_topic = %config.alert_topic,
        job_name_prefix = %config.criteria.job_name_prefix,
        "klaxond starting"
    );

    let mailer = PipeMailer::new(config.topics.clone());
    let cancel = CancellationToken::new();
    spawn_signal_listener(cancel.clone());

    let (tx, rx) = mpsc::channel(INTAKE_BUFFER);
    let intake = kx_daemon::intake::spawn_stdin(tx);

    let engine = Engine::new(&config, mailer, SystemClock, cancel.clone());
    engine.run(rx).await;

    // The reader may still be parked on a blocking stdin read.
    intake.abort();
    ExitCode::SUCCESS
}

/// Cancel the engine on SIGINT or SIGTERM.
fn spawn_signal_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut term = match signal(SignalKind::terminate()) {
                Ok(term) => term,
                Err(error) => {
                    tracing::error!(%error, "cannot install SIGTERM handler");
                    let _ = ctrl_c.await;
                    cancel.cancel();
                    return;
                }
            };
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }
        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }
        tracing::info!("shutdown signal received");
        cancel.cancel();
    });
}
