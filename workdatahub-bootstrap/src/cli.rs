// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Surface
//!
//! The orchestrator's entire external API (spec.md §6) is this one flat flag
//! set — no subcommands, since every invocation does the same thing (run
//! one or more domain+period ETL jobs) parameterized by flags, with
//! `--check-db` as the sole exception. Parsing is `clap` derive, as the
//! teacher does it; `Cli::validate` is the post-parse pass that rejects
//! flag combinations clap's grammar can't express on its own (mutually
//! exclusive flags, `--file` requiring exactly one domain).

use std::path::PathBuf;

use clap::Parser;
use workdatahub_domain::entities::LoadMode;
use workdatahub_domain::error::WdhError;

#[derive(Parser, Debug, Clone)]
#[command(name = "workdatahub")]
#[command(about = concat!("WorkDataHub ETL orchestrator v", env!("CARGO_PKG_VERSION")))]
#[command(version)]
pub struct Cli {
    /// Domain(s) to run, comma-separated. Required unless --check-db is set.
    #[arg(long, value_delimiter = ',')]
    pub domain: Vec<String>,

    /// Target period, YYYYMM.
    #[arg(long)]
    pub period: Option<String>,

    /// Single-file override; requires exactly one --domain.
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Actually write to the warehouse. Default is --plan-only.
    #[arg(long, conflicts_with = "plan_only")]
    pub execute: bool,

    /// Build the execution plan and stop; nothing is read or written. Default.
    #[arg(long)]
    pub plan_only: bool,

    /// Load mode for the warehouse loader.
    #[arg(long, value_enum, default_value_t = CliLoadMode::Upsert)]
    pub mode: CliLoadMode,

    /// Force Layer 5 (temp id) resolution only; skip layers 1-4.
    #[arg(long)]
    pub no_enrichment: bool,

    /// Override the default external-lookup sync budget for this run.
    #[arg(long)]
    pub sync_budget: Option<u32>,

    /// Cap the number of files discovered per domain.
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Skip post-ETL hooks.
    #[arg(long)]
    pub no_post_hooks: bool,

    /// Sole action: verify database connectivity and exit.
    #[arg(long)]
    pub check_db: bool,

    /// Configuration directory (defaults to ./config).
    #[arg(long)]
    pub config_dir: Option<PathBuf>,

    /// Enable debug-level logging.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliLoadMode {
    Append,
    Upsert,
    DeleteInsert,
}

impl From<CliLoadMode> for LoadMode {
    fn from(mode: CliLoadMode) -> Self {
        match mode {
            CliLoadMode::Append => LoadMode::Append,
            CliLoadMode::Upsert => LoadMode::Upsert,
            CliLoadMode::DeleteInsert => LoadMode::DeleteInsert,
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Rejects flag combinations the clap grammar alone can't express.
    pub fn validate(&self) -> Result<(), WdhError> {
        if self.check_db {
            return Ok(());
        }

        if self.domain.is_empty() {
            return Err(WdhError::config("cli", "--domain is required unless --check-db is set"));
        }

        if self.file.is_some() && self.domain.len() != 1 {
            return Err(WdhError::config(
                "cli",
                "--file requires exactly one --domain",
            ));
        }

        if self.period.is_none() && self.file.is_none() {
            return Err(WdhError::config("cli", "--period is required unless --file is given"));
        }

        if let Some(period) = &self.period {
            period
                .parse::<workdatahub_domain::value_objects::Period>()
                .map_err(|e| WdhError::config("cli", format!("--period: {e}")))?;
        }

        Ok(())
    }

    /// `--plan-only` is the default; `--execute` is the only way to opt out.
    pub fn is_plan_only(&self) -> bool {
        !self.execute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Cli {
        Cli {
            domain: vec!["annuity_performance".into()],
            period: Some("202501".into()),
            file: None,
            execute: false,
            plan_only: false,
            mode: CliLoadMode::Upsert,
            no_enrichment: false,
            sync_budget: None,
            max_files: None,
            no_post_hooks: false,
            check_db: false,
            config_dir: None,
            verbose: false,
        }
    }

    #[test]
    fn valid_invocation_passes() {
        assert!(base().validate().is_ok());
    }

    #[test]
    fn check_db_bypasses_all_other_requirements() {
        let mut cli = base();
        cli.domain.clear();
        cli.period = None;
        cli.check_db = true;
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn file_override_requires_exactly_one_domain() {
        let mut cli = base();
        cli.domain.push("another_domain".into());
        cli.file = Some("ref/monthly/202501/in/V2/年金.xlsx".into());
        assert!(cli.validate().is_err());
    }

    #[test]
    fn file_override_with_single_domain_is_fine_without_period() {
        let mut cli = base();
        cli.period = None;
        cli.file = Some("ref/monthly/202501/in/V2/年金.xlsx".into());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn missing_domain_without_check_db_is_rejected() {
        let mut cli = base();
        cli.domain.clear();
        assert!(cli.validate().is_err());
    }

    #[test]
    fn malformed_period_is_rejected() {
        let mut cli = base();
        cli.period = Some("not-a-period".into());
        assert!(cli.validate().is_err());
    }

    #[test]
    fn plan_only_is_the_default() {
        assert!(base().is_plan_only());
        let mut cli = base();
        cli.execute = true;
        assert!(!cli.is_plan_only());
    }
}
