// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Logger Initialization
//!
//! Structured logging wiring (spec.md §1's "structured-logging library
//! wiring" — an external collaborator by the spec's own framing, but the
//! wiring code is ambient stack we still own). One `tracing_subscriber`
//! registry, JSON-formatted so run artifacts and log lines share a vocabulary,
//! writing either to stderr or to a rolling file under the configured log
//! directory.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::LogLevel;

/// Initializes the global `tracing` subscriber. Call exactly once, as early
/// as possible in `main`.
pub fn init(level: LogLevel, log_dir: &Path, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let effective_level = if verbose { LogLevel::Debug } else { level };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(effective_level.to_tracing_level().to_string()));

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "workdatahub.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    // Leak the guard deliberately: it must outlive the subscriber, and the
    // subscriber is installed for the life of the process.
    Box::leak(Box::new(guard));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_maps_to_info() {
        assert_eq!(LogLevel::default().to_tracing_level(), tracing::Level::INFO);
    }
}
