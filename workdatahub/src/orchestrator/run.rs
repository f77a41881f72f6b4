// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Execution
//!
//! [`run_once`] is the control flow spec.md §3 describes end to end:
//! `discover → read → process (= pipeline) → (optional) fk_backfill → load →
//! post_hooks`, closing with the run's observability artifacts. A
//! `--plan-only` run takes the same path through discovery and the pipeline
//! — so its row count and column shape are real — but stops before
//! `fk_backfill`, `load`, and `post_hooks` ever open a connection (spec.md
//! §8).

use std::path::PathBuf;
use std::time::Instant;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use workdatahub_bootstrap::config::RuntimeConfig;
use workdatahub_domain::entities::PipelineContext;
use workdatahub_domain::error::WdhError;

use crate::config_store::AppConfig;
use crate::discovery::DiscoveryService;
use crate::hooks::{overall_status, HookOutcome};
use crate::loader;
use crate::observability::{
    export_rejections, export_unknown_companies, rejected_rows_path, run_summary_path, unknown_companies_path, write_run_summary, RunSummary, StepMetricSummary,
};
use crate::registry::validate_registries;
use crate::{backfill, pipeline};

use super::request::RunRequest;
use super::wiring::build_registries;

/// Minimum/maximum pool size for a run's database connection (spec.md
/// §4.8). Never constructed for a plan-only run.
const MIN_POOL_CONNECTIONS: u32 = 2;
const MAX_POOL_CONNECTIONS: u32 = 10;

pub async fn connect_pool(database_uri: &str) -> Result<PgPool, WdhError> {
    PgPoolOptions::new()
        .min_connections(MIN_POOL_CONNECTIONS)
        .max_connections(MAX_POOL_CONNECTIONS)
        .connect(database_uri)
        .await
        .map_err(|e| WdhError::Load { message: format!("could not connect to database: {e}") })
}

/// `--check-db`'s sole action: open a pool and run a trivial round-trip.
pub async fn check_db(database_uri: &str) -> Result<(), WdhError> {
    let pool = connect_pool(database_uri).await?;
    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| WdhError::Load { message: format!("database connectivity check failed: {e}") })?;
    pool.close().await;
    Ok(())
}

/// Where this run's JSON summary and CSV exports land: a `runs` directory
/// alongside the configured log directory (spec.md §6 names only one
/// directory env var, "log target directory" — open question resolved by
/// reusing it as the base for every per-run artifact, not only logs).
fn artifacts_dir(runtime: &RuntimeConfig) -> PathBuf {
    runtime.log_target_dir().join("runs")
}

#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub summary: RunSummary,
    pub hook_outcomes: Vec<HookOutcome>,
}

/// Runs one domain+period to completion and returns its summary. `pool` is
/// `None` exactly for a plan-only run; [`super::wiring::build_registries`]
/// enforces that invariant when choosing a resolver, and this function
/// enforces it again before ever calling `backfill`, `loader::execute`, or
/// the hook runner.
pub async fn run_once(app_config: &AppConfig, runtime: &RuntimeConfig, pool: Option<&PgPool>, request: &RunRequest, cancellation: &CancellationToken) -> Result<RunOutcome, WdhError> {
    let started = Instant::now();

    let (jobs, services, resolver) = super::wiring::build_registries(app_config, runtime, pool, request)?;
    validate_registries(app_config, &jobs, &services)?;

    let job = jobs.get(&request.domain)?;
    let service = services.get(&request.domain)?;
    let domain_config = app_config.get_domain(&request.domain)?;

    if let Some(max_files) = request.max_files {
        if job.capabilities.supports_multi_file {
            tracing::debug!(domain = %request.domain, max_files, "multi-file cap noted, not yet enforced by discovery");
        } else {
            tracing::warn!(domain = %request.domain, max_files, "--max-files has no effect: this domain does not support multi-file input");
        }
    }

    let discovery = DiscoveryService::new();
    let discovered = match &request.file_override {
        Some(explicit) => discovery.discover_with_override(domain_config, explicit)?,
        None => discovery.discover(domain_config, request.period)?,
    };

    let mut context = PipelineContext::new(request.domain.clone(), request.period);
    let processed = pipeline::run(&service.pipeline, discovered.frame, &mut context, cancellation).await?;

    let mut backfill_results = Vec::new();
    let mut load_result = None;
    let mut hook_outcomes = Vec::new();

    if request.plan_only {
        let plan = loader::plan(&processed, domain_config, request.load_mode, loader::DEFAULT_BATCH_SIZE);
        tracing::info!(domain = %request.domain, table = %plan.table, row_count = plan.row_count, batch_count = plan.batch_count, "plan-only run: no connection opened, no rows written");
    } else {
        let pool = pool.ok_or_else(|| WdhError::internal("a non-plan-only run requires a database pool"))?;

        if domain_config.requires_backfill && job.capabilities.supports_backfill {
            let rules = app_config.get_foreign_keys(&request.domain);
            backfill_results = backfill::run_all(pool, &processed, rules).await?;
        }

        load_result = Some(loader::execute(pool, processed, domain_config, request.load_mode, loader::DEFAULT_BATCH_SIZE).await?);

        if !request.no_post_hooks && !service.hooks.is_empty() {
            hook_outcomes = service.hooks.run_all(pool, &context).await;
        }
    }

    let base_dir = artifacts_dir(runtime);
    let finished_at = chrono::Utc::now();

    if !context.rejections.is_empty() {
        export_rejections(&rejected_rows_path(&base_dir, &request.domain, &finished_at), &context.rejections)?;
    }

    let unknown_names = resolver.unknown_names();
    if !unknown_names.is_empty() {
        export_unknown_companies(&unknown_companies_path(&base_dir, &request.domain, &finished_at), &unknown_names)?;
    }

    let status = if request.plan_only {
        "planned".to_string()
    } else if hook_outcomes.is_empty() || overall_status(&hook_outcomes) == "succeeded" {
        "succeeded".to_string()
    } else {
        "succeeded_with_hook_failures".to_string()
    };

    let summary = RunSummary {
        run_id: context.run_id.to_string(),
        domain: request.domain.clone(),
        period: request.period.as_yyyymm(),
        status,
        started_at: context.started_at,
        duration_ms: started.elapsed().as_millis() as u64,
        rows_discovered: discovered.row_count,
        rows_rejected: context.total_rejected(),
        step_metrics: context.step_metrics.iter().map(StepMetricSummary::from).collect(),
        enrichment: resolver.counters(),
        backfill: backfill_results,
        load: load_result,
        hooks: hook_outcomes.clone(),
    };

    write_run_summary(&run_summary_path(&base_dir, &request.domain, &finished_at), &summary)?;

    Ok(RunOutcome { summary, hook_outcomes })
}
