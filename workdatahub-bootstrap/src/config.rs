// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Runtime Configuration
//!
//! `RuntimeConfig` is the immutable, validated snapshot of everything the
//! orchestrator reads from the process environment (spec.md §6): database
//! URI, an optional legacy read-only database URI, the enrichment HMAC salt,
//! the external lookup provider's base URL and API token, the default sync
//! budget, the enrichment feature flag, log level, and log target directory.
//!
//! It is built once at startup and handed to components by reference — no
//! component reads the environment again after that (spec.md §9, "global
//! mutable state ... confine to one immutable snapshot").
//!
//! ## Precedence
//!
//! Per spec.md §6, "environment variables take precedence only over
//! defaults, not over the loaded env file when both exist": a value present
//! in the `.env` file wins over the same key already set in the process
//! environment, which in turn wins over the built-in default. `load()` takes
//! the parsed `.env` entries and the process environment as two separate
//! maps so this ordering is explicit rather than relying on `dotenvy`'s own
//! (opposite) default behavior of not overwriting existing env vars.

use std::collections::HashMap;
use std::path::PathBuf;

use workdatahub_domain::error::WdhError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl LogLevel {
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    database_uri: String,
    legacy_database_uri: Option<String>,
    enrichment_salt: String,
    enrichment_api_token: Option<String>,
    enrichment_api_base_url: Option<String>,
    sync_budget_default: u32,
    enrichment_enabled: bool,
    log_level: LogLevel,
    log_target_dir: PathBuf,
}

impl RuntimeConfig {
    pub fn database_uri(&self) -> &str {
        &self.database_uri
    }

    pub fn legacy_database_uri(&self) -> Option<&str> {
        self.legacy_database_uri.as_deref()
    }

    pub fn enrichment_salt(&self) -> &str {
        &self.enrichment_salt
    }

    /// Base URL of the external (EQC-class) company lookup provider, spec.md
    /// §4.6 Layer 4. `None` disables Layer 4 regardless of sync budget: the
    /// resolver never reaches the provider without somewhere to call.
    pub fn enrichment_api_base_url(&self) -> Option<&str> {
        self.enrichment_api_base_url.as_deref()
    }

    pub fn enrichment_api_token(&self) -> Option<&str> {
        self.enrichment_api_token.as_deref()
    }

    pub fn sync_budget_default(&self) -> u32 {
        self.sync_budget_default
    }

    pub fn enrichment_enabled(&self) -> bool {
        self.enrichment_enabled
    }

    pub fn log_level(&self) -> LogLevel {
        self.log_level
    }

    pub fn log_target_dir(&self) -> &PathBuf {
        &self.log_target_dir
    }

    /// Resolves a `RuntimeConfig` from the `.env` file entries and the
    /// process environment, per the precedence rule documented on this
    /// module: `dotenv_vars` wins over `process_env` wins over built-in
    /// defaults.
    pub fn load(
        dotenv_vars: &HashMap<String, String>,
        process_env: &HashMap<String, String>,
    ) -> Result<Self, WdhError> {
        let resolve = |key: &str| -> Option<String> {
            dotenv_vars.get(key).or_else(|| process_env.get(key)).cloned()
        };

        let database_uri = resolve("WDH_DATABASE_URL")
            .ok_or_else(|| WdhError::config("environment", "WDH_DATABASE_URL is required"))?;

        let enrichment_salt = resolve("WDH_ENRICHMENT_SALT")
            .ok_or_else(|| WdhError::config("environment", "WDH_ENRICHMENT_SALT is required"))?;

        let sync_budget_default = match resolve("WDH_SYNC_BUDGET_DEFAULT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| WdhError::config("environment", format!("WDH_SYNC_BUDGET_DEFAULT '{raw}' is not a u32")))?,
            None => 100,
        };

        let enrichment_enabled = match resolve("WDH_ENRICHMENT_ENABLED") {
            Some(raw) => !matches!(raw.to_ascii_lowercase().as_str(), "0" | "false" | "no"),
            None => true,
        };

        let log_level = resolve("WDH_LOG_LEVEL")
            .and_then(|raw| LogLevel::parse(&raw))
            .unwrap_or_default();

        let log_target_dir = resolve("WDH_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("logs"));

        Ok(Self {
            database_uri,
            legacy_database_uri: resolve("WDH_LEGACY_DATABASE_URL"),
            enrichment_salt,
            enrichment_api_token: resolve("WDH_ENRICHMENT_API_TOKEN"),
            enrichment_api_base_url: resolve("WDH_ENRICHMENT_API_BASE_URL"),
            sync_budget_default,
            enrichment_enabled,
            log_level,
            log_target_dir,
        })
    }
}
