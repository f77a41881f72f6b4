// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Raw-to-Domain Config Conversion
//!
//! Converts the `serde_yaml`-deserializable shapes in [`super::yaml`] into
//! the validated domain entities in `workdatahub_domain::entities`. This is
//! the one place a YAML string like `"highest_number"` turns into a typed
//! `VersionStrategy::HighestNumber`, and the one place an unrecognized value
//! becomes a `ConfigError` naming the offending dotted path (spec.md §4.1).

use std::collections::{HashMap, HashSet};
use std::path::Path;

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

use workdatahub_domain::entities::{
    AggregationSpec, AggregationType, BackfillColumn, DomainConfig, ForeignKeyRule, LookupType, SheetSelector,
    VersionFallback, VersionStrategy,
};
use workdatahub_domain::error::WdhError;

use super::yaml::{
    CompanyMappingFile, DataSourcesFile, EqcConfidenceFile, ForeignKeysFile, RawAggregationSpec, RawForeignKeyRule,
};
use super::{CompanyMapping, EqcConfidenceConfig};

pub fn read_yaml<T: DeserializeOwned>(config_dir: &Path, file_name: &str) -> Result<T, WdhError> {
    let path = config_dir.join(file_name);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| WdhError::config(file_name, format!("could not read {}: {e}", path.display())))?;
    serde_yaml::from_str(&contents).map_err(|e| WdhError::config(file_name, format!("invalid YAML: {e}")))
}

fn parse_version_strategy(domain: &str, raw: &str) -> Result<VersionStrategy, WdhError> {
    match raw {
        "highest_number" => Ok(VersionStrategy::HighestNumber),
        "latest_modified" => Ok(VersionStrategy::LatestModified),
        "manual" => Ok(VersionStrategy::Manual),
        other => Err(WdhError::config(
            format!("domains.{domain}.version_strategy"),
            format!("unrecognized version_strategy '{other}', expected one of highest_number|latest_modified|manual"),
        )),
    }
}

fn parse_version_fallback(domain: &str, raw: &str) -> Result<VersionFallback, WdhError> {
    match raw {
        "error" => Ok(VersionFallback::Error),
        "use_latest_modified" => Ok(VersionFallback::UseLatestModified),
        other => Err(WdhError::config(
            format!("domains.{domain}.fallback"),
            format!("unrecognized fallback '{other}', expected one of error|use_latest_modified"),
        )),
    }
}

pub fn build_domains(file: DataSourcesFile) -> Result<IndexMap<String, DomainConfig>, WdhError> {
    let mut out = IndexMap::new();
    for (name, raw) in file.domains {
        if raw.base_path.trim().is_empty() {
            return Err(WdhError::config(format!("domains.{name}.base_path"), "must not be empty"));
        }
        if raw.file_patterns.is_empty() {
            return Err(WdhError::config(
                format!("domains.{name}.file_patterns"),
                "at least one include pattern is required",
            ));
        }
        let sheet_selector = match (raw.sheet_name, raw.sheet_index) {
            (Some(n), _) => SheetSelector::Name(n),
            (None, Some(i)) => SheetSelector::Index(i),
            (None, None) => {
                return Err(WdhError::config(
                    format!("domains.{name}.sheet_name"),
                    "sheet_name (or sheet_index) is required",
                ))
            }
        };
        if raw.output.table.trim().is_empty() {
            return Err(WdhError::config(format!("domains.{name}.output.table"), "must not be empty"));
        }
        if raw.output.pk.is_empty() {
            return Err(WdhError::config(
                format!("domains.{name}.output.pk"),
                "at least one primary key column is required",
            ));
        }

        let domain = DomainConfig {
            domain_name: name.clone(),
            base_path_template: raw.base_path,
            include_patterns: raw.file_patterns,
            exclude_patterns: raw.exclude_patterns,
            sheet_selector,
            version_strategy: parse_version_strategy(&name, &raw.version_strategy)?,
            version_fallback: parse_version_fallback(&name, &raw.fallback)?,
            table_name: raw.output.table,
            schema_name: raw.output.schema_name,
            primary_key_columns: raw.output.pk,
            composite_delete_key_columns: raw.output.composite_delete_key,
            requires_backfill: raw.requires_backfill,
            supports_enrichment: raw.supports_enrichment,
        };
        out.insert(name, domain);
    }
    Ok(out)
}

fn parse_aggregation_type(rule: &str, raw: &RawAggregationSpec) -> Result<AggregationType, WdhError> {
    match raw.aggregation.as_str() {
        "first" => Ok(AggregationType::First),
        "max_by" => Ok(AggregationType::MaxBy),
        "concat_distinct" => Ok(AggregationType::ConcatDistinct),
        other => Err(WdhError::config(
            format!("foreign_keys.{rule}.aggregations"),
            format!("unrecognized aggregation type '{other}'"),
        )),
    }
}

fn build_rule(domain: &str, raw: RawForeignKeyRule) -> Result<ForeignKeyRule, WdhError> {
    if raw.natural_key_columns.is_empty() {
        return Err(WdhError::config(
            format!("foreign_keys.{domain}.{}", raw.name),
            "at least one natural key column is required",
        ));
    }
    let mut aggregations = Vec::with_capacity(raw.aggregations.len());
    for agg in &raw.aggregations {
        let aggregation = parse_aggregation_type(&raw.name, agg)?;
        if aggregation == AggregationType::MaxBy && agg.order_by.is_none() {
            return Err(WdhError::config(
                format!("foreign_keys.{domain}.{}.aggregations", raw.name),
                "max_by aggregation requires order_by",
            ));
        }
        aggregations.push(AggregationSpec {
            target_column: agg.target_column.clone(),
            source_column: agg.source_column.clone(),
            aggregation,
            order_by: agg.order_by.clone(),
            separator: agg.separator.clone(),
            sort: agg.sort,
        });
    }

    Ok(ForeignKeyRule {
        name: raw.name,
        child_table: raw.child_table,
        parent_table: raw.parent_table,
        parent_schema: raw.parent_schema,
        natural_key_columns: raw
            .natural_key_columns
            .into_iter()
            .map(|c| BackfillColumn {
                child_column: c.child_column,
                parent_natural_key_column: c.parent_natural_key_column,
            })
            .collect(),
        parent_id_column: raw.parent_id_column,
        child_fk_column: raw.child_fk_column,
        aggregations,
        depends_on: raw.depends_on,
        skip_blank_values: raw.skip_blank_values,
    })
}

/// Topologically sorts one domain's rules so every rule appears after its
/// `depends_on` (spec.md §4.1). Kahn's algorithm; a cycle is a config error
/// rather than a silent arbitrary order.
fn topo_sort(domain: &str, rules: Vec<ForeignKeyRule>) -> Result<Vec<ForeignKeyRule>, WdhError> {
    let by_name: HashMap<String, ForeignKeyRule> = rules.into_iter().map(|r| (r.name.clone(), r)).collect();
    for rule in by_name.values() {
        for dep in &rule.depends_on {
            if !by_name.contains_key(dep) {
                return Err(WdhError::config(
                    format!("foreign_keys.{domain}.{}.depends_on", rule.name),
                    format!("depends_on references unknown rule '{dep}'"),
                ));
            }
        }
    }

    let mut ordered = Vec::with_capacity(by_name.len());
    let mut resolved: HashSet<String> = HashSet::new();
    let mut remaining: Vec<&str> = by_name.keys().map(String::as_str).collect();
    remaining.sort_unstable();

    while !remaining.is_empty() {
        let ready: Vec<String> = remaining
            .iter()
            .filter(|name| by_name[**name].depends_on.iter().all(|d| resolved.contains(d)))
            .map(|s| s.to_string())
            .collect();

        if ready.is_empty() {
            return Err(WdhError::config(
                format!("foreign_keys.{domain}"),
                "cyclic depends_on among foreign key rules",
            ));
        }

        for name in &ready {
            resolved.insert(name.clone());
            ordered.push(by_name[name.as_str()].clone());
        }
        remaining.retain(|n| !ready.contains(&n.to_string()));
    }

    Ok(ordered)
}

pub fn build_foreign_keys(file: ForeignKeysFile) -> Result<HashMap<String, Vec<ForeignKeyRule>>, WdhError> {
    let mut out = HashMap::new();
    for (domain, raw_rules) in file {
        let rules: Result<Vec<ForeignKeyRule>, WdhError> =
            raw_rules.into_iter().map(|r| build_rule(&domain, r)).collect();
        out.insert(domain.clone(), topo_sort(&domain, rules?)?);
    }
    Ok(out)
}

fn parse_lookup_type(raw: &str) -> Option<LookupType> {
    match raw {
        "plan_code" => Some(LookupType::PlanCode),
        "account_name" => Some(LookupType::AccountName),
        "account_number" => Some(LookupType::AccountNumber),
        "customer_name" => Some(LookupType::CustomerName),
        "plan_customer" => Some(LookupType::PlanCustomer),
        _ => None,
    }
}

pub fn build_company_mapping(file: CompanyMappingFile) -> Result<CompanyMapping, WdhError> {
    let mut out: CompanyMapping = HashMap::new();
    for (lookup_type_raw, keys) in file {
        let lookup_type = parse_lookup_type(&lookup_type_raw).ok_or_else(|| {
            WdhError::config(
                format!("company_mapping.{lookup_type_raw}"),
                format!("unrecognized lookup type '{lookup_type_raw}'"),
            )
        })?;
        out.insert(lookup_type, keys);
    }
    Ok(out)
}

pub fn build_eqc_confidence(file: EqcConfidenceFile) -> EqcConfidenceConfig {
    EqcConfidenceConfig {
        match_confidence: file.eqc_match_confidence,
        default: file.default,
        min_confidence_for_cache: file.min_confidence_for_cache,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(name: &str, depends_on: &[&str]) -> ForeignKeyRule {
        ForeignKeyRule {
            name: name.to_string(),
            child_table: "child".into(),
            parent_table: "parent".into(),
            parent_schema: "public".into(),
            natural_key_columns: vec![BackfillColumn {
                child_column: "code".into(),
                parent_natural_key_column: "code".into(),
            }],
            parent_id_column: "id".into(),
            child_fk_column: "parent_id".into(),
            aggregations: vec![],
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            skip_blank_values: true,
        }
    }

    #[test]
    fn topo_sort_orders_dependencies_first() {
        let rules = vec![rule("b", &["a"]), rule("a", &[]), rule("c", &["b"])];
        let ordered = topo_sort("domain", rules).unwrap();
        let names: Vec<&str> = ordered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn topo_sort_detects_cycles() {
        let rules = vec![rule("a", &["b"]), rule("b", &["a"])];
        assert!(topo_sort("domain", rules).is_err());
    }

    #[test]
    fn topo_sort_rejects_unknown_dependency() {
        let rules = vec![rule("a", &["ghost"])];
        assert!(topo_sort("domain", rules).is_err());
    }

    #[test]
    fn lookup_type_roundtrip() {
        assert_eq!(parse_lookup_type("plan_code"), Some(LookupType::PlanCode));
        assert_eq!(parse_lookup_type("plan_customer"), Some(LookupType::PlanCustomer));
        assert_eq!(parse_lookup_type("bogus"), None);
    }
}
