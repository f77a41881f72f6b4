// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Warehouse Load Entities
//!
//! `LoadMode` and `LoadResult` describe how the Gold frame is written to the
//! warehouse and what happened when it was (spec §3, §4.8).

use serde::{Deserialize, Serialize};

/// How rows are reconciled against what is already in the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadMode {
    /// Insert all rows; never touches existing rows.
    Append,
    /// Insert new rows, update existing rows matched on the primary key.
    Upsert,
    /// Delete rows matching the composite delete key, then insert the frame.
    /// This is what makes re-running a month idempotent.
    DeleteInsert,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadResult {
    pub table: String,
    pub rows_inserted: usize,
    pub rows_updated: usize,
    pub rows_deleted: usize,
    /// Rows the loader declined to write without raising an error, e.g. an
    /// empty projected batch. Most runs leave this at zero.
    pub rows_skipped: usize,
    pub batches_executed: usize,
    pub duration_ms: u64,
}

impl LoadResult {
    pub fn total_rows_written(&self) -> usize {
        self.rows_inserted + self.rows_updated
    }
}
