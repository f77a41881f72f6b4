// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Raw YAML Shapes
//!
//! `serde_yaml`-deserializable mirrors of `data_sources.yml`, `foreign_keys.yml`,
//! `company_mapping.yml`, and `eqc_confidence.yml` (spec.md §6). Kept separate
//! from the domain entities they're converted into (`config_store::build`) so
//! a YAML-shape change never has to touch the pure domain crate.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSourcesFile {
    pub domains: IndexMap<String, RawDomain>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawDomain {
    pub base_path: String,
    pub file_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    pub sheet_name: Option<String>,
    pub sheet_index: Option<usize>,
    pub version_strategy: String,
    pub fallback: String,
    #[serde(default)]
    pub requires_backfill: bool,
    #[serde(default)]
    pub supports_enrichment: bool,
    pub output: RawOutput,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOutput {
    pub table: String,
    #[serde(default = "default_schema")]
    pub schema_name: String,
    pub pk: Vec<String>,
    #[serde(default)]
    pub composite_delete_key: Vec<String>,
}

fn default_schema() -> String {
    "public".to_string()
}

/// `foreign_keys.yml`: domain name -> ordered list of rules.
pub type ForeignKeysFile = HashMap<String, Vec<RawForeignKeyRule>>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawForeignKeyRule {
    pub name: String,
    pub child_table: String,
    pub parent_table: String,
    #[serde(default = "default_schema")]
    pub parent_schema: String,
    pub natural_key_columns: Vec<RawBackfillColumn>,
    pub parent_id_column: String,
    pub child_fk_column: String,
    #[serde(default)]
    pub aggregations: Vec<RawAggregationSpec>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default = "default_true")]
    pub skip_blank_values: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawBackfillColumn {
    pub child_column: String,
    pub parent_natural_key_column: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawAggregationSpec {
    pub target_column: String,
    pub source_column: String,
    pub aggregation: String,
    pub order_by: Option<String>,
    #[serde(default)]
    pub separator: Option<String>,
    #[serde(default)]
    pub sort: bool,
}

/// `company_mapping.yml`: lookup type -> lookup key -> company_id. Layer 1 of
/// enrichment (spec.md §4.6).
pub type CompanyMappingFile = HashMap<String, HashMap<String, String>>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EqcConfidenceFile {
    pub eqc_match_confidence: HashMap<String, f64>,
    pub default: f64,
    pub min_confidence_for_cache: f64,
}
