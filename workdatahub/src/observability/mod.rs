// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Run Observability
//!
//! The artifacts a run leaves behind once it finishes (spec.md §6): a JSON
//! summary of counts and durations, plus the rejection and unknown-company
//! CSV exports that `validation::export` and `enrichment::export` already
//! know how to write. This module owns only the path naming and the summary
//! shape; the two CSV writers are re-exported rather than reimplemented.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use workdatahub_domain::entities::{LoadResult, StepMetrics};
use workdatahub_domain::error::WdhError;

pub use crate::enrichment::export_unknown_companies;
pub use crate::validation::export::export_rejections;

use crate::backfill::BackfillRuleResult;
use crate::enrichment::EnrichmentCounterSnapshot;
use crate::hooks::HookOutcome;

/// A serializable projection of [`StepMetrics`], since the domain type holds
/// a [`std::time::Duration`] rather than a plain millisecond count.
#[derive(Debug, Clone, Serialize)]
pub struct StepMetricSummary {
    pub step_name: String,
    pub duration_ms: u64,
    pub input_rows: usize,
    pub output_rows: usize,
    pub rejected_rows: usize,
    pub retries: u32,
    pub skipped: bool,
}

impl From<&StepMetrics> for StepMetricSummary {
    fn from(metrics: &StepMetrics) -> Self {
        Self {
            step_name: metrics.step_name.clone(),
            duration_ms: metrics.duration.as_millis() as u64,
            input_rows: metrics.input_rows,
            output_rows: metrics.output_rows,
            rejected_rows: metrics.rejected_rows,
            retries: metrics.retries,
            skipped: metrics.skipped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: String,
    pub domain: String,
    pub period: String,
    pub status: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub rows_discovered: usize,
    pub rows_rejected: usize,
    pub step_metrics: Vec<StepMetricSummary>,
    pub enrichment: Option<EnrichmentCounterSnapshot>,
    pub backfill: Vec<BackfillRuleResult>,
    pub load: Option<LoadResult>,
    pub hooks: Vec<HookOutcome>,
}

fn artifact_path(base_dir: &Path, prefix: &str, domain: &str, timestamp: &DateTime<Utc>, extension: &str) -> PathBuf {
    base_dir.join(format!("{prefix}_{domain}_{}.{extension}", timestamp.format("%Y%m%dT%H%M%S")))
}

pub fn run_summary_path(base_dir: &Path, domain: &str, timestamp: &DateTime<Utc>) -> PathBuf {
    artifact_path(base_dir, "run_summary", domain, timestamp, "json")
}

pub fn rejected_rows_path(base_dir: &Path, domain: &str, timestamp: &DateTime<Utc>) -> PathBuf {
    artifact_path(base_dir, "rejections", domain, timestamp, "csv")
}

pub fn unknown_companies_path(base_dir: &Path, domain: &str, timestamp: &DateTime<Utc>) -> PathBuf {
    artifact_path(base_dir, "unknown_companies", domain, timestamp, "csv")
}

pub fn write_run_summary(path: &Path, summary: &RunSummary) -> Result<(), WdhError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
