// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `workdatahub` Binary
//!
//! Wires `workdatahub-bootstrap`'s CLI/env/signal/logger layer to
//! `workdatahub`'s orchestrator (spec.md §3, §6) and maps the final result
//! to a process exit code.

use std::path::PathBuf;

use tokio_util::sync::CancellationToken;
use workdatahub::config_store::AppConfig;
use workdatahub::orchestrator::{self, RunRequest};
use workdatahub_bootstrap::cli::Cli;
use workdatahub_bootstrap::config::RuntimeConfig;
use workdatahub_bootstrap::exit_code::ExitCode;
use workdatahub_bootstrap::{load_dotenv, load_process_env, logger, signals};
use workdatahub_domain::error::WdhError;

#[tokio::main]
async fn main() {
    let code = run().await.map(|()| ExitCode::Success).unwrap_or_else(|err| {
        tracing::error!(error = %err, "run failed");
        eprintln!("workdatahub: {err}");
        ExitCode::from(&err)
    });
    std::process::exit(code.as_i32());
}

async fn run() -> Result<(), WdhError> {
    let cli = Cli::parse_args();
    cli.validate()?;

    let dotenv_vars = load_dotenv(&PathBuf::from(".env"));
    let process_env = load_process_env();
    let runtime = RuntimeConfig::load(&dotenv_vars, &process_env)?;

    logger::init(runtime.log_level(), runtime.log_target_dir(), cli.verbose)
        .map_err(|e| WdhError::internal(format!("logger initialization failed: {e}")))?;

    if cli.check_db {
        return orchestrator::check_db(runtime.database_uri()).await;
    }

    let config_dir = cli.config_dir.clone().unwrap_or_else(|| PathBuf::from("config"));
    let app_config = AppConfig::load_all(&config_dir)?;

    let cancellation = CancellationToken::new();
    let signal_handler = signals::create_signal_handler();
    let watch_token = cancellation.clone();
    tokio::spawn(async move {
        signal_handler.wait_for_signal(watch_token).await;
    });

    let requests: Vec<RunRequest> = cli
        .domain
        .iter()
        .map(|domain| RunRequest::from_cli(&cli, domain.clone()))
        .collect::<Result<_, _>>()?;

    let all_plan_only = requests.iter().all(|r| r.plan_only);
    let pool = if all_plan_only {
        None
    } else {
        Some(orchestrator::connect_pool(runtime.database_uri()).await?)
    };

    let outcomes = orchestrator::run_all(&app_config, &runtime, pool.as_ref(), &requests, &cancellation).await?;

    for outcome in &outcomes {
        tracing::info!(
            domain = %outcome.summary.domain,
            period = %outcome.summary.period,
            status = %outcome.summary.status,
            rows_discovered = outcome.summary.rows_discovered,
            rows_rejected = outcome.summary.rows_rejected,
            duration_ms = outcome.summary.duration_ms,
            "run finished"
        );
    }

    if let Some(pool) = pool {
        pool.close().await;
    }

    Ok(())
}
