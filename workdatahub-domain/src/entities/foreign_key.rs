// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Foreign Key Backfill Rules
//!
//! A `ForeignKeyRule` describes one parent/child relationship the backfill
//! engine maintains after a load completes (spec §4.7): rows landed in a
//! child table reference a parent row by a natural key, and the engine
//! either finds the matching parent row or inserts a new one built from
//! aggregated child data.

use serde::{Deserialize, Serialize};

/// How child-row values are combined into a single parent column value when
/// a new parent row must be inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationType {
    /// Take the value from the first child row encountered.
    First,
    /// Take the value from the child row with the maximum value of `by`.
    MaxBy,
    /// Concatenate distinct values, comma-separated, in first-seen order.
    ConcatDistinct,
}

/// One column of the parent row to populate from child data when inserting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregationSpec {
    pub target_column: String,
    pub source_column: String,
    pub aggregation: AggregationType,
    /// Required when `aggregation` is `MaxBy`: the column whose maximum
    /// determines which child row's `source_column` wins.
    pub order_by: Option<String>,
    /// Used only by `ConcatDistinct`: joiner between distinct values.
    pub separator: Option<String>,
    /// Used only by `ConcatDistinct`: sort the distinct values before joining.
    pub sort: bool,
}

/// A column on the child table that must reference a column on the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillColumn {
    pub child_column: String,
    pub parent_natural_key_column: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRule {
    pub name: String,
    pub child_table: String,
    pub parent_table: String,
    pub parent_schema: String,
    pub natural_key_columns: Vec<BackfillColumn>,
    pub parent_id_column: String,
    pub child_fk_column: String,
    pub aggregations: Vec<AggregationSpec>,
    /// Names of other rules (within the same domain) that must run first.
    /// Resolved into execution order once, at config-load time.
    pub depends_on: Vec<String>,
    /// Drop candidate rows whose natural-key columns are blank before
    /// considering them for a parent insert.
    pub skip_blank_values: bool,
}

impl ForeignKeyRule {
    pub fn qualified_parent_table(&self) -> String {
        format!("{}.{}", self.parent_schema, self.parent_table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rule() -> ForeignKeyRule {
        ForeignKeyRule {
            name: "portfolio_parent".into(),
            child_table: "annuity_performance".into(),
            parent_table: "portfolio".into(),
            parent_schema: "public".into(),
            natural_key_columns: vec![BackfillColumn {
                child_column: "计划代码".into(),
                parent_natural_key_column: "plan_code".into(),
            }],
            parent_id_column: "id".into(),
            child_fk_column: "portfolio_id".into(),
            aggregations: vec![
                AggregationSpec {
                    target_column: "plan_name".into(),
                    source_column: "计划名称".into(),
                    aggregation: AggregationType::First,
                    order_by: None,
                    separator: None,
                    sort: false,
                },
                AggregationSpec {
                    target_column: "latest_scale".into(),
                    source_column: "规模".into(),
                    aggregation: AggregationType::MaxBy,
                    order_by: Some("月度".into()),
                    separator: None,
                    sort: false,
                },
            ],
            depends_on: vec![],
            skip_blank_values: true,
        }
    }

    #[test]
    fn qualified_parent_table_joins_schema_and_table() {
        assert_eq!(sample_rule().qualified_parent_table(), "public.portfolio");
    }

    #[test]
    fn max_by_aggregation_requires_an_order_by_column() {
        let rule = sample_rule();
        let max_by = rule
            .aggregations
            .iter()
            .find(|a| a.aggregation == AggregationType::MaxBy)
            .unwrap();
        assert!(max_by.order_by.is_some());
    }
}
