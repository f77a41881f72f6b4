// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

//! # WorkDataHub Bootstrap
//!
//! Everything that sits outside the domain/application/infrastructure split:
//! CLI parsing, environment and `.env` resolution, signal handling, logger
//! wiring, and exit code mapping. The `workdatahub` binary crate's `main`
//! calls into this crate first, then hands a validated [`config::RuntimeConfig`]
//! and [`cli::Cli`] down to the application layer.
//!
//! ## Module structure
//!
//! - [`cli`] — the flat flag surface (spec.md §6) plus post-parse validation.
//! - [`config`] — env/`.env`-resolved [`config::RuntimeConfig`], built once and immutable.
//! - [`signals`] — SIGTERM/SIGINT/SIGHUP translated into cooperative cancellation.
//! - [`exit_code`] — the six-code mapping from [`workdatahub_domain::error::WdhError`] to a process exit code.
//! - [`logger`] — `tracing_subscriber` initialization.
//!
//! ## `.env` loading
//!
//! [`load_dotenv`] reads the `.env` file (if present) into a plain map rather
//! than mutating `std::env`, so [`config::RuntimeConfig::load`]'s documented
//! precedence (dotenv file wins over process env) can be applied explicitly
//! instead of relying on `dotenvy`'s own precedence rules.

pub mod cli;
pub mod config;
pub mod exit_code;
pub mod logger;
pub mod signals;

use std::collections::HashMap;
use std::path::Path;

/// Parses a `.env`-format file at `path` into a map, returning an empty map
/// if the file does not exist. Malformed lines are skipped.
pub fn load_dotenv(path: &Path) -> HashMap<String, String> {
    let Ok(iter) = dotenvy::from_path_iter(path) else {
        return HashMap::new();
    };
    iter.filter_map(Result::ok).collect()
}

/// Snapshots the current process environment into a plain map.
pub fn load_process_env() -> HashMap<String, String> {
    std::env::vars().collect()
}
