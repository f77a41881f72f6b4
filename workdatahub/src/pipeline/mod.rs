// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Pipeline Execution Framework
//!
//! Runs an ordered list of [`PipelineStep`]s against one frame, in a single
//! thread of control (spec.md §4.5). Steps never retry themselves; the
//! framework classifies a failing step's error via [`retry::classify`] and
//! retries with the tier's backoff before giving up. Cancellation is
//! cooperative: checked at step boundaries, never mid-step.

pub mod retry;
pub mod steps;

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use workdatahub_domain::entities::{ErrorMode, Frame, PipelineContext, PipelineStep, StepMetrics};
use workdatahub_domain::error::WdhError;

/// The ordered list of steps a domain runs its frame through, plus the
/// policy for what happens when one fails (spec.md §3 `PipelineDefinition`).
pub struct PipelineDefinition {
    pub domain: String,
    pub steps: Vec<Arc<dyn PipelineStep>>,
    pub error_mode: ErrorMode,
}

async fn execute_with_retry(
    step: &dyn PipelineStep,
    frame: Frame,
    context: &mut PipelineContext,
) -> (Result<Frame, WdhError>, u32) {
    let mut attempt = 1u32;
    loop {
        match step.execute(frame.clone(), context).await {
            Ok(out) => return (Ok(out), attempt - 1),
            Err(err) => match retry::classify(&err) {
                Some(tier) if attempt < tier.max_attempts() => {
                    warn!(step = step.name(), attempt, tier = tier.name(), "transient failure, retrying");
                    tokio::time::sleep(tier.backoff(attempt)).await;
                    attempt += 1;
                }
                _ => return (Err(err), attempt - 1),
            },
        }
    }
}

/// Runs `definition.steps` against `frame` in order, stopping early if
/// `cancellation` has been triggered at a step boundary. Optional steps that
/// fail are logged and skipped rather than aborting the run.
pub async fn run(
    definition: &PipelineDefinition,
    mut frame: Frame,
    context: &mut PipelineContext,
    cancellation: &CancellationToken,
) -> Result<Frame, WdhError> {
    for (index, step) in definition.steps.iter().enumerate() {
        if cancellation.is_cancelled() {
            return Err(WdhError::pipeline(step.name(), index, "run was cancelled before this step started"));
        }

        let input_rows = frame.len();
        let started = Instant::now();
        let (result, retries) = execute_with_retry(step.as_ref(), frame.clone(), context).await;

        match result {
            Ok(next_frame) => {
                context.record_step(StepMetrics {
                    step_name: step.name().to_string(),
                    duration: started.elapsed(),
                    input_rows,
                    output_rows: next_frame.len(),
                    rejected_rows: input_rows.saturating_sub(next_frame.len()),
                    retries,
                    skipped: false,
                });
                info!(step = step.name(), input_rows, output_rows = next_frame.len(), retries, "step completed");
                frame = next_frame;
            }
            Err(err) => {
                if step.optional() {
                    warn!(step = step.name(), error = %err, "optional step failed, skipping");
                    context.record_step(StepMetrics {
                        step_name: step.name().to_string(),
                        duration: started.elapsed(),
                        input_rows,
                        output_rows: input_rows,
                        rejected_rows: 0,
                        retries,
                        skipped: true,
                    });
                    continue;
                }

                return match definition.error_mode {
                    ErrorMode::StopOnError | ErrorMode::CollectErrors => {
                        Err(WdhError::pipeline(step.name(), index, err.to_string()))
                    }
                };
            }
        }
    }

    Ok(frame)
}
