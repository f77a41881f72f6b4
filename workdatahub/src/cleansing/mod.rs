// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Cleansing Registry
//!
//! A named catalog of pure, side-effect-free value-level rules invoked by
//! validators and the pipeline's [`crate::pipeline::steps::CleansingStep`]
//! (spec.md §4.3). Rules are registered once at startup and never modified;
//! unknown rule names fail immediately rather than being silently skipped.

mod rules;

use std::collections::HashMap;

use workdatahub_domain::entities::CellValue;
use workdatahub_domain::error::WdhError;

pub type CleansingFn = fn(&CellValue) -> CellValue;

/// Per-domain field cleansing configuration: field name -> ordered list of
/// rule names, applied left-to-right (spec.md §3 `CleansingDomainConfig`).
/// Built in code by each domain's pipeline definition (§4.9's "dynamic
/// dispatch by domain name" design note — domain specifics are data on a
/// registry entry, not a user-editable config file).
pub type CleansingDomainConfig = indexmap::IndexMap<String, Vec<String>>;

pub struct CleansingRegistry {
    rules: HashMap<&'static str, CleansingFn>,
}

impl Default for CleansingRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CleansingRegistry {
    pub fn new() -> Self {
        let mut rules: HashMap<&'static str, CleansingFn> = HashMap::new();
        rules.insert("trim_whitespace", rules::trim_whitespace);
        rules.insert("normalize_company_name", rules::normalize_company_name);
        rules.insert("standardize_null_values", rules::standardize_null_values);
        rules.insert("remove_currency_symbols", rules::remove_currency_symbols);
        rules.insert("clean_comma_separated_number", rules::clean_comma_separated_number);
        Self { rules }
    }

    pub fn register(&mut self, name: &'static str, rule: CleansingFn) {
        self.rules.insert(name, rule);
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Applies each named rule in order, failing immediately on an unknown
    /// rule name (spec.md §4.3).
    pub fn apply(&self, value: &CellValue, rule_names: &[String]) -> Result<CellValue, WdhError> {
        let mut current = value.clone();
        for name in rule_names {
            let rule = self
                .rules
                .get(name.as_str())
                .ok_or_else(|| WdhError::internal(format!("unknown cleansing rule '{name}'")))?;
            current = rule(&current);
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_rule_name_fails_immediately() {
        let registry = CleansingRegistry::new();
        let err = registry
            .apply(&CellValue::Text("x".into()), &["does_not_exist".to_string()])
            .unwrap_err();
        assert_eq!(err.category(), "internal");
    }

    #[test]
    fn rules_apply_left_to_right() {
        let registry = CleansingRegistry::new();
        let value = CellValue::Text("  1,234  ".into());
        let result = registry
            .apply(
                &value,
                &["trim_whitespace".to_string(), "clean_comma_separated_number".to_string()],
            )
            .unwrap();
        assert_eq!(result, CellValue::Text("1234".into()));
    }

    #[test]
    fn all_standard_rules_are_idempotent() {
        let registry = CleansingRegistry::new();
        let samples = vec![
            CellValue::Text("  Acme Co., Ltd.  ".into()),
            CellValue::Text("N/A".into()),
            CellValue::Text("¥1,234.56".into()),
            CellValue::Null,
            CellValue::Int(42),
        ];
        for rule_name in [
            "trim_whitespace",
            "normalize_company_name",
            "standardize_null_values",
            "remove_currency_symbols",
            "clean_comma_separated_number",
        ] {
            for sample in &samples {
                let once = registry.apply(sample, &[rule_name.to_string()]).unwrap();
                let twice = registry.apply(&once, &[rule_name.to_string()]).unwrap();
                assert_eq!(once, twice, "rule {rule_name} is not idempotent for {sample:?}");
            }
        }
    }
}
