// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Request
//!
//! [`RunRequest`] is one domain's worth of a CLI invocation (spec.md §6):
//! `--domain` is comma-separated and fans out into one `RunRequest` per
//! domain before anything else happens, so the rest of the orchestrator
//! never has to think about the list.

use std::path::PathBuf;

use chrono::Datelike;
use workdatahub_domain::entities::LoadMode;
use workdatahub_domain::error::WdhError;
use workdatahub_domain::value_objects::Period;

use workdatahub_bootstrap::cli::Cli;

#[derive(Debug, Clone)]
pub struct RunRequest {
    pub domain: String,
    pub period: Period,
    pub file_override: Option<PathBuf>,
    pub plan_only: bool,
    pub load_mode: LoadMode,
    pub no_enrichment: bool,
    pub sync_budget: Option<u32>,
    pub max_files: Option<usize>,
    pub no_post_hooks: bool,
}

impl RunRequest {
    /// Builds one `RunRequest` for `domain` out of the flags the whole
    /// invocation shares. `Cli::validate` already rejected a `--file`
    /// override paired with more than one `--domain`, so `file_override` is
    /// only ever set when `domain` is the CLI's sole entry.
    ///
    /// Open question resolved: spec.md §6 permits `--file` without
    /// `--period`, but every downstream artifact (run summary path, hook SQL
    /// parameters) still needs a period. Absent an explicit one, this uses
    /// the current UTC year and month — the override is for a one-off,
    /// already-known file, so the wall-clock month is the least surprising
    /// default for where its artifacts land.
    pub fn from_cli(cli: &Cli, domain: String) -> Result<Self, WdhError> {
        let period = match &cli.period {
            Some(raw) => raw.parse::<Period>()?,
            None => {
                let now = chrono::Utc::now();
                Period::new(now.year() as u16, now.month() as u8)?
            }
        };

        Ok(Self {
            domain,
            period,
            file_override: cli.file.clone(),
            plan_only: cli.is_plan_only(),
            load_mode: cli.mode.into(),
            no_enrichment: cli.no_enrichment,
            sync_budget: cli.sync_budget,
            max_files: cli.max_files,
            no_post_hooks: cli.no_post_hooks,
        })
    }
}
