// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Step Contract
//!
//! The pipeline framework (spec §4.5) executes an ordered list of steps
//! against a frame in a single thread of control. Each step is a pure
//! transformation: it receives the current frame and the run context and
//! returns the next frame, never mutating its input in place. `PipelineStep`
//! is the trait every step kind implements; concrete step kinds
//! (`MappingStep`, `ReplacementStep`, `CleansingStep`, ...) live in
//! `workdatahub::infrastructure::pipeline::steps`, since they depend on the
//! cleansing registry and other infrastructure-layer collaborators.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::rejection::RejectionRecord;
use crate::entities::row::Frame;
use crate::error::WdhError;
use crate::value_objects::{Period, RunId};

/// What happens when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// The first failing step aborts the run.
    StopOnError,
    /// Failed rows are moved to a rejection sink; the remainder continue.
    CollectErrors,
}

/// Transient-fault retry tiers (spec §4.5). Classification itself — deciding
/// which tier an error belongs to — is a pure function in
/// `workdatahub::infrastructure::pipeline::retry`; this enum is the shared
/// vocabulary between that classifier and the framework's retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryTier {
    /// Connection resets, socket timeouts, DB "operational" errors. 5 attempts.
    Database,
    /// Generic network faults. 3 attempts, exponential backoff 1s/2s/4s.
    Network,
    /// HTTP 429/503. 3 attempts, exponential backoff 1s/2s/4s.
    HttpThrottled,
    /// HTTP 500/502/504. 2 attempts.
    HttpServerError,
}

impl RetryTier {
    pub fn max_attempts(&self) -> u32 {
        match self {
            RetryTier::Database => 5,
            RetryTier::Network => 3,
            RetryTier::HttpThrottled => 3,
            RetryTier::HttpServerError => 2,
        }
    }

    /// Backoff delay before the given attempt number (1-indexed).
    pub fn backoff(&self, attempt: u32) -> Duration {
        match self {
            RetryTier::Network | RetryTier::HttpThrottled => {
                Duration::from_secs(1u64 << attempt.saturating_sub(1).min(2))
            }
            RetryTier::Database | RetryTier::HttpServerError => Duration::from_millis(500 * attempt as u64),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RetryTier::Database => "database",
            RetryTier::Network => "network",
            RetryTier::HttpThrottled => "http_throttled",
            RetryTier::HttpServerError => "http_server_error",
        }
    }
}

/// Per-step execution metrics, recorded by the pipeline framework after each
/// step completes (spec §4.5).
#[derive(Debug, Clone, Default)]
pub struct StepMetrics {
    pub step_name: String,
    pub duration: Duration,
    pub input_rows: usize,
    pub output_rows: usize,
    pub rejected_rows: usize,
    pub retries: u32,
    pub skipped: bool,
}

/// Carried through every step of one run: identity, timing, and the growing
/// list of per-step metrics.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub run_id: RunId,
    pub domain: String,
    pub period: Period,
    pub started_at: DateTime<Utc>,
    pub step_metrics: Vec<StepMetrics>,
    /// Free-form metadata steps may stash for downstream steps (e.g. the
    /// enrichment step's counters, consumed by observability at run end).
    pub metadata: HashMap<String, String>,
    /// Rows rejected by Bronze/Gold validation steps under `CollectErrors`,
    /// accumulated for the run's rejection export (spec §4.4, §4.8).
    pub rejections: Vec<RejectionRecord>,
}

impl PipelineContext {
    pub fn new(domain: impl Into<String>, period: Period) -> Self {
        Self {
            run_id: RunId::new(),
            domain: domain.into(),
            period,
            started_at: Utc::now(),
            step_metrics: Vec::new(),
            metadata: HashMap::new(),
            rejections: Vec::new(),
        }
    }

    pub fn record_step(&mut self, metrics: StepMetrics) {
        self.step_metrics.push(metrics);
    }

    pub fn push_rejections(&mut self, rejections: impl IntoIterator<Item = RejectionRecord>) {
        self.rejections.extend(rejections);
    }

    pub fn total_rejected(&self) -> usize {
        self.step_metrics.iter().map(|m| m.rejected_rows).sum()
    }
}

/// Contract every pipeline step kind implements. Steps are free of retry
/// logic: the framework owns the retry loop and classifies failures via
/// `RetryTier`; a step simply returns `Err` and lets the caller decide.
#[async_trait]
pub trait PipelineStep: Send + Sync {
    fn name(&self) -> &str;

    /// Whether a failure here may be skipped (logged, then proceed) rather
    /// than aborting the run.
    fn optional(&self) -> bool {
        false
    }

    async fn execute(&self, frame: Frame, context: &mut PipelineContext) -> Result<Frame, WdhError>;
}
