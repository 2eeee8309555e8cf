// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! NDJSON event intake.
//!
//! One `JobEvent` per line, parsed exactly once at this boundary; everything
//! downstream trusts the decoded shape. Unparseable lines are warned and
//! skipped so one bad line cannot stall the stream.

use kx_core::JobEvent;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Read events from stdin until EOF or until the engine hangs up.
pub fn spawn_stdin(tx: mpsc::Sender<JobEvent>) -> JoinHandle<()> {
    tokio::spawn(async move {
        read_events(BufReader::new(tokio::io::stdin()), tx).await;
    })
}

/// Forward each parsed event line from `reader` into `tx`.
pub async fn read_events<R>(reader: R, tx: mpsc::Sender<JobEvent>)
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match JobEvent::from_json_line(line) {
                    Ok(event) => {
                        if tx.send(event).await.is_err() {
                            // Engine gone; nothing left to feed.
                            return;
                        }
                    }
                    Err(error) => {
                        tracing::warn!(%error, "skipping unparseable intake line");
                    }
                }
            }
            Ok(None) => {
                tracing::info!("intake stream reached EOF");
                return;
            }
            Err(error) => {
                tracing::error!(%error, "intake read failed");
                return;
            }
        }
    }
}

#[cfg(test)]
#[path = "intake_tests.rs"]
mod tests;
