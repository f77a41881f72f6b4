// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Rejection Records
//!
//! A `RejectionRecord` captures one row that failed Bronze or Gold
//! validation under `CollectErrors` mode (spec §4.4): the pipeline continues
//! with the remaining rows, and every rejection is exported to a CSV
//! alongside the run's artifacts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::row::Row;
use crate::entities::pipeline_step::ErrorMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectionRecord {
    pub run_id: String,
    pub step_name: String,
    pub row_index: usize,
    pub field: Option<String>,
    pub reason: String,
    pub rejected_at: DateTime<Utc>,
    /// The offending row itself, so the CSV export is self-contained and an
    /// operator can diagnose without re-running the job.
    pub row: Row,
}

impl RejectionRecord {
    /// `CollectErrors` mode is the only mode under which rejections
    /// accumulate instead of aborting the run.
    pub fn applies_under(mode: ErrorMode) -> bool {
        matches!(mode, ErrorMode::CollectErrors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_only_accumulate_in_collect_errors_mode() {
        assert!(RejectionRecord::applies_under(ErrorMode::CollectErrors));
        assert!(!RejectionRecord::applies_under(ErrorMode::StopOnError));
    }
}
