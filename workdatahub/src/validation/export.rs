// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Rejection Export
//!
//! Writes [`RejectionRecord`]s to a CSV artifact alongside a run's other
//! observability output (spec.md §4.4, §4.8). The offending row is flattened
//! into a single `row_json` column so the export stays a fixed-width CSV
//! regardless of the source domain's column set.

use std::path::Path;

use workdatahub_domain::entities::RejectionRecord;
use workdatahub_domain::error::WdhError;

fn stage_error(message: impl Into<String>) -> WdhError {
    WdhError::internal(message.into())
}

/// Writes `rejections` to `path` as CSV, creating parent directories as
/// needed. A no-op write (header only) is still produced for an empty slice,
/// so downstream tooling can rely on the file always existing after a run.
pub fn export_rejections(path: &Path, rejections: &[RejectionRecord]) -> Result<(), WdhError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| stage_error(format!("could not create {}: {e}", parent.display())))?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| stage_error(format!("could not open {}: {e}", path.display())))?;
    writer
        .write_record(["run_id", "step_name", "row_index", "field", "reason", "rejected_at", "row_json"])
        .map_err(|e| stage_error(format!("could not write header: {e}")))?;

    for record in rejections {
        let row_json = serde_json::to_string(&record.row).map_err(|e| stage_error(format!("could not serialize row: {e}")))?;
        writer
            .write_record([
                record.run_id.as_str(),
                record.step_name.as_str(),
                &record.row_index.to_string(),
                record.field.as_deref().unwrap_or(""),
                record.reason.as_str(),
                &record.rejected_at.to_rfc3339(),
                &row_json,
            ])
            .map_err(|e| stage_error(format!("could not write row {}: {e}", record.row_index)))?;
    }

    writer.flush().map_err(|e| stage_error(format!("could not flush {}: {e}", path.display())))?;
    Ok(())
}
