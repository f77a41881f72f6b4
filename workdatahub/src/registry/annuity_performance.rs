// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # `annuity_performance` Pipeline Wiring
//!
//! The one domain wired end to end, as the concrete reference every other
//! domain's registry entry follows (spec.md §3, §4.9). Four steps: Bronze
//! validation, extra name cleansing ahead of resolution, company ID
//! resolution, and the Gold projection check.

use std::sync::Arc;

use indexmap::IndexMap;
use workdatahub_domain::entities::{ErrorMode, PipelineStep};

use crate::cleansing::{CleansingDomainConfig, CleansingRegistry};
use crate::hooks::{HookRunner, SqlHook};
use crate::pipeline::steps::{CleansingStep, CompanyIdResolutionStep, CompanyResolver, GoldProjectionStep, SchemaValidationStep};
use crate::pipeline::PipelineDefinition;
use crate::validation::schema::{BronzeSchema, FieldKind, FieldSpec, GoldSchema};

/// Bronze-layer field shape for `annuity_performance` (spec.md §3): the
/// month and plan code must be present on every row, the rest coerce but
/// aren't required until the Gold projection runs.
fn bronze_schema() -> BronzeSchema {
    BronzeSchema::new(vec![
        FieldSpec::required("月度", FieldKind::Date),
        FieldSpec::required("计划代码", FieldKind::Text),
        FieldSpec::optional("组合代码", FieldKind::Text),
        FieldSpec::optional("组合名称", FieldKind::Text),
        FieldSpec::optional("客户名称", FieldKind::Text),
        FieldSpec::optional("年金账户号", FieldKind::Text),
        FieldSpec::optional("期初资产规模", FieldKind::Decimal),
        FieldSpec::optional("期末资产规模", FieldKind::Decimal),
        FieldSpec::optional("供款", FieldKind::Decimal),
        FieldSpec::optional("待遇支付", FieldKind::Decimal),
    ])
}

fn gold_schema() -> GoldSchema {
    GoldSchema::new(
        vec!["计划代码".to_string(), "company_id".to_string()],
        vec!["期初资产规模".to_string(), "期末资产规模".to_string(), "供款".to_string(), "待遇支付".to_string()],
        vec!["月度".to_string(), "计划代码".to_string(), "组合代码".to_string(), "company_id".to_string()],
    )
}

/// Cleansing rules applied during Bronze coercion: monetary fields strip
/// currency symbols and thousands separators, name fields are trimmed and
/// normalized before resolution ever sees them (spec.md §4.2, §4.6).
fn bronze_field_rules() -> CleansingDomainConfig {
    let mut rules: CleansingDomainConfig = IndexMap::new();
    for money_field in ["期初资产规模", "期末资产规模", "供款", "待遇支付"] {
        rules.insert(
            money_field.to_string(),
            vec!["trim_whitespace".to_string(), "remove_currency_symbols".to_string(), "clean_comma_separated_number".to_string()],
        );
    }
    for name_field in ["客户名称", "组合名称"] {
        rules.insert(name_field.to_string(), vec!["trim_whitespace".to_string(), "normalize_company_name".to_string()]);
    }
    rules
}

/// A second normalization pass on `客户名称` alone, run as its own step right
/// before resolution so a cleansing rule added later for this field doesn't
/// have to be threaded through the Bronze step's shared field-rule map.
fn pre_resolution_field_rules() -> CleansingDomainConfig {
    let mut rules: CleansingDomainConfig = IndexMap::new();
    rules.insert("客户名称".to_string(), vec!["trim_whitespace".to_string(), "normalize_company_name".to_string()]);
    rules
}

/// Builds the wired pipeline for `annuity_performance`. `cleansing` and
/// `resolver` are injected so the registry controls their lifetimes (the
/// resolver in particular owns a database pool and an HTTP client).
pub fn build(cleansing: Arc<CleansingRegistry>, resolver: Box<dyn CompanyResolver>) -> PipelineDefinition {
    let steps: Vec<Arc<dyn PipelineStep>> = vec![
        Arc::new(SchemaValidationStep {
            name: "bronze_validation".to_string(),
            schema: bronze_schema(),
            registry: Arc::clone(&cleansing),
            field_rules: bronze_field_rules(),
        }),
        Arc::new(CleansingStep {
            name: "pre_resolution_cleansing".to_string(),
            registry: cleansing,
            field_rules: pre_resolution_field_rules(),
        }),
        Arc::new(CompanyIdResolutionStep {
            name: "company_id_resolution".to_string(),
            plan_code_field: "计划代码".to_string(),
            customer_name_field: "客户名称".to_string(),
            account_name_field: "组合名称".to_string(),
            account_number_field: "年金账户号".to_string(),
            existing_company_id_field: None,
            resolver,
        }),
        Arc::new(GoldProjectionStep {
            name: "gold_projection".to_string(),
            schema: gold_schema(),
        }),
    ];

    PipelineDefinition {
        domain: "annuity_performance".to_string(),
        steps,
        error_mode: ErrorMode::CollectErrors,
    }
}

/// This domain's post-ETL hooks, run in order after a successful load
/// (spec.md §4.9: "contract-status sync must precede monthly snapshot
/// refresh"). Spec.md §9 leaves the monthly snapshot table's exact schema
/// unspecified ("an implementer should read its target schema before wiring
/// the hook"); absent that schema, both statements assume a companion table
/// keyed by `(domain, period)`, the same key every other per-run artifact in
/// this crate uses.
pub fn hooks() -> HookRunner {
    HookRunner::new(vec![
        Box::new(SqlHook {
            name: "sync_contract_status".to_string(),
            statement: "UPDATE annuity_contracts SET status = 'settled', status_synced_at = now() \
                        WHERE domain = $1 AND period = $2 AND status <> 'settled'"
                .to_string(),
        }),
        Box::new(SqlHook {
            name: "refresh_monthly_snapshot".to_string(),
            statement: "INSERT INTO annuity_performance_monthly_snapshot (domain, period, refreshed_at) \
                        VALUES ($1, $2, now()) \
                        ON CONFLICT (domain, period) DO UPDATE SET refreshed_at = EXCLUDED.refreshed_at"
                .to_string(),
        }),
    ])
}
