// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

/// Daemon version (from Cargo.toml)
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Config file path: `KLAXON_CONFIG` > `./klaxon.toml`
pub fn config_path() -> PathBuf {
    std::env::var("KLAXON_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("klaxon.toml"))
}

/// Job-failure topic override. Takes precedence over `notify.topic` from the
/// config file; the deployment sets this to retarget notifications without
/// editing config.
pub fn topic_override() -> Option<String> {
    std::env::var("TOPIC").ok().filter(|s| !s.is_empty())
}

/// Shutdown drain timeout (default 5s, configurable via `KLAXON_DRAIN_TIMEOUT_MS`).
pub fn drain_timeout() -> Duration {
    std::env::var("KLAXON_DRAIN_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}
