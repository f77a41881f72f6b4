// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Configuration Entity
//!
//! `DomainConfig` is the validated, immutable description of one entry in
//! `data_sources.yml` (spec §3, §4.1). It is built once at startup by the
//! config store and handed to every other component by reference; nothing
//! downstream mutates it.

use serde::{Deserialize, Serialize};

/// How the file discovery service chooses among sibling `V<digits>` folders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionStrategy {
    HighestNumber,
    LatestModified,
    Manual,
}

/// What happens when `VersionStrategy` can't resolve a single winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionFallback {
    Error,
    UseLatestModified,
}

/// How the target sheet of an Excel workbook is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetSelector {
    Name(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainConfig {
    pub domain_name: String,
    pub base_path_template: String,
    pub include_patterns: Vec<String>,
    pub exclude_patterns: Vec<String>,
    pub sheet_selector: SheetSelector,
    pub version_strategy: VersionStrategy,
    pub version_fallback: VersionFallback,
    pub table_name: String,
    pub schema_name: String,
    pub primary_key_columns: Vec<String>,
    pub composite_delete_key_columns: Vec<String>,
    pub requires_backfill: bool,
    pub supports_enrichment: bool,
}

impl DomainConfig {
    /// Target table qualified with its schema, as used by the loader and the
    /// FK backfill engine's introspection queries.
    pub fn qualified_table(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DomainConfig {
        DomainConfig {
            domain_name: "annuity_performance".into(),
            base_path_template: "ref/monthly/{YYYYMM}/in".into(),
            include_patterns: vec!["*年金*.xlsx".into()],
            exclude_patterns: vec![],
            sheet_selector: SheetSelector::Name("规模明细".into()),
            version_strategy: VersionStrategy::HighestNumber,
            version_fallback: VersionFallback::Error,
            table_name: "annuity_performance".into(),
            schema_name: "public".into(),
            primary_key_columns: vec!["id".into()],
            composite_delete_key_columns: vec!["月度".into(), "计划代码".into(), "company_id".into()],
            requires_backfill: true,
            supports_enrichment: true,
        }
    }

    #[test]
    fn qualified_table_joins_schema_and_table() {
        assert_eq!(sample().qualified_table(), "public.annuity_performance");
    }
}
