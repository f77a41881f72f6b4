// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Warehouse Loader
//!
//! Writes a Gold-validated frame to its target table inside a single
//! transaction (spec.md §4.8): introspects the table's live column set,
//! projects the frame onto it, then writes in batches according to the
//! domain's [`LoadMode`]. `plan()` never opens a connection — it is the only
//! code path reachable when a run is `plan_only`, which is how that
//! invariant is kept (spec.md §6, §9 Open Question "how literally does
//! plan-only avoid all database work").

mod introspection;
mod writer;

pub use introspection::{introspect_columns, project_frame};
pub use writer::execute;

use workdatahub_domain::entities::{DomainConfig, Frame, LoadMode};

/// Default batch size for parameterized inserts (spec.md §4.8, §5).
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// What `execute()` would do against `frame`, computed without a database
/// connection. Used for `--plan-only` runs and operator dry-runs.
#[derive(Debug, Clone, serde::Serialize)]
pub struct LoaderPlan {
    pub table: String,
    pub mode: LoadMode,
    pub row_count: usize,
    /// The frame's own column set. Unlike `execute()`, this is not narrowed
    /// to the live table's columns — plan-only never queries the database
    /// to find out what those are.
    pub planned_columns: Vec<String>,
    pub batch_count: usize,
}

/// Builds a [`LoaderPlan`] for `frame` against `domain`, with no I/O at all.
pub fn plan(frame: &Frame, domain: &DomainConfig, mode: LoadMode, batch_size: usize) -> LoaderPlan {
    let batch_size = batch_size.max(1);
    let batch_count = frame.len().div_ceil(batch_size);
    LoaderPlan {
        table: domain.qualified_table(),
        mode,
        row_count: frame.len(),
        planned_columns: frame.column_names(),
        batch_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::{CellValue, Row, SheetSelector, VersionFallback, VersionStrategy};

    fn domain() -> DomainConfig {
        DomainConfig {
            domain_name: "annuity_performance".into(),
            base_path_template: "unused".into(),
            include_patterns: vec![],
            exclude_patterns: vec![],
            sheet_selector: SheetSelector::Index(0),
            version_strategy: VersionStrategy::HighestNumber,
            version_fallback: VersionFallback::Error,
            table_name: "annuity_performance".into(),
            schema_name: "public".into(),
            primary_key_columns: vec!["id".into()],
            composite_delete_key_columns: vec!["月度".into(), "计划代码".into()],
            requires_backfill: true,
            supports_enrichment: true,
        }
    }

    #[test]
    fn plan_counts_batches_without_touching_a_connection() {
        let mut row = Row::new();
        row.insert("计划代码".to_string(), CellValue::Text("P1".into()));
        let frame = Frame::new(vec![row; 2500]);

        let result = plan(&frame, &domain(), LoadMode::Upsert, 1000);
        assert_eq!(result.table, "public.annuity_performance");
        assert_eq!(result.row_count, 2500);
        assert_eq!(result.batch_count, 3);
    }

    #[test]
    fn empty_frame_plans_zero_batches() {
        let frame = Frame::empty();
        let result = plan(&frame, &domain(), LoadMode::Append, 1000);
        assert_eq!(result.batch_count, 0);
    }
}
