// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Config Store
//!
//! Loads `data_sources.yml`, `foreign_keys.yml`, `company_mapping.yml`, and
//! `eqc_confidence.yml` once at startup, validates them structurally, and
//! exposes an immutable [`AppConfig`] snapshot to every other component
//! (spec.md §4.1). Nothing downstream re-reads these files or the
//! environment after `load_all` returns.

mod build;
pub mod yaml;

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use workdatahub_domain::entities::{DomainConfig, ForeignKeyRule};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::entities::LookupType;

/// `company_mapping.yml`, layer 1 of enrichment: lookup type -> lookup key ->
/// canonical company id.
pub type CompanyMapping = HashMap<LookupType, HashMap<String, String>>;

/// `eqc_confidence.yml`: Chinese match-type label -> confidence, a default
/// for unlabeled candidates, and the minimum confidence a cache row must
/// carry before Layer 2 will return it.
#[derive(Debug, Clone)]
pub struct EqcConfidenceConfig {
    pub match_confidence: HashMap<String, f64>,
    pub default: f64,
    pub min_confidence_for_cache: f64,
}

impl EqcConfidenceConfig {
    /// Confidence for one EQC candidate's Chinese match-type label, falling
    /// back to `default` for unrecognized labels (spec.md §4.6 Layer 4).
    pub fn confidence_for(&self, match_type: &str) -> f64 {
        self.match_confidence.get(match_type).copied().unwrap_or(self.default)
    }
}

/// The merged, validated configuration snapshot. Built once by [`load_all`]
/// and handed to every component by reference; immutable thereafter
/// (spec.md §9: "confine to one immutable snapshot loaded at startup").
#[derive(Debug, Clone)]
pub struct AppConfig {
    domains: IndexMap<String, DomainConfig>,
    foreign_keys: HashMap<String, Vec<ForeignKeyRule>>,
    company_mapping: CompanyMapping,
    eqc_confidence: EqcConfidenceConfig,
}

impl AppConfig {
    /// Loads and validates all four configuration files from `config_dir`.
    /// Any structural error is fatal before any work begins (spec.md §4.1).
    pub fn load_all(config_dir: &Path) -> Result<Self, WdhError> {
        let data_sources = build::read_yaml::<yaml::DataSourcesFile>(config_dir, "data_sources.yml")?;
        let foreign_keys_raw = build::read_yaml::<yaml::ForeignKeysFile>(config_dir, "foreign_keys.yml")?;
        let company_mapping_raw = build::read_yaml::<yaml::CompanyMappingFile>(config_dir, "company_mapping.yml")?;
        let eqc_confidence_raw = build::read_yaml::<yaml::EqcConfidenceFile>(config_dir, "eqc_confidence.yml")?;

        let domains = build::build_domains(data_sources)?;
        let foreign_keys = build::build_foreign_keys(foreign_keys_raw)?;
        let company_mapping = build::build_company_mapping(company_mapping_raw)?;
        let eqc_confidence = build::build_eqc_confidence(eqc_confidence_raw);

        Ok(Self {
            domains,
            foreign_keys,
            company_mapping,
            eqc_confidence,
        })
    }

    /// Builds an `AppConfig` directly from already-parsed pieces, for tests
    /// that want to avoid touching the filesystem.
    pub fn from_parts(
        domains: IndexMap<String, DomainConfig>,
        foreign_keys: HashMap<String, Vec<ForeignKeyRule>>,
        company_mapping: CompanyMapping,
        eqc_confidence: EqcConfidenceConfig,
    ) -> Self {
        Self {
            domains,
            foreign_keys,
            company_mapping,
            eqc_confidence,
        }
    }

    pub fn get_domain(&self, name: &str) -> Result<&DomainConfig, WdhError> {
        self.domains
            .get(name)
            .ok_or_else(|| WdhError::UnknownDomain(name.to_string()))
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Ordered so every rule appears after everything in its `depends_on`
    /// (spec.md §4.1). Returns an empty slice for domains with no rules.
    pub fn get_foreign_keys(&self, domain: &str) -> &[ForeignKeyRule] {
        self.foreign_keys.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn company_mapping(&self) -> &CompanyMapping {
        &self.company_mapping
    }

    pub fn eqc_confidence(&self) -> &EqcConfidenceConfig {
        &self.eqc_confidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write(dir: &Path, name: &str, contents: &str) {
        let mut f = std::fs::File::create(dir.join(name)).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn load_all_reads_and_validates_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "data_sources.yml",
            r#"
domains:
  annuity_performance:
    base_path: "ref/monthly/{YYYYMM}/in"
    file_patterns: ["*年金*.xlsx"]
    exclude_patterns: []
    sheet_name: "规模明细"
    sheet_index: null
    version_strategy: highest_number
    fallback: error
    requires_backfill: true
    supports_enrichment: true
    output:
      table: annuity_performance
      schema_name: public
      pk: ["id"]
      composite_delete_key: ["月度", "计划代码", "company_id"]
"#,
        );
        write(dir.path(), "foreign_keys.yml", "{}\n");
        write(dir.path(), "company_mapping.yml", "{}\n");
        write(
            dir.path(),
            "eqc_confidence.yml",
            r#"
eqc_match_confidence:
  全称精确匹配: 1.0
  模糊匹配: 0.8
  拼音: 0.6
default: 0.7
min_confidence_for_cache: 0.6
"#,
        );

        let config = AppConfig::load_all(dir.path()).unwrap();
        let domain = config.get_domain("annuity_performance").unwrap();
        assert_eq!(domain.table_name, "annuity_performance");
        assert!(config.get_domain("nonexistent").is_err());
        assert_eq!(config.eqc_confidence().confidence_for("拼音"), 0.6);
        assert_eq!(config.eqc_confidence().confidence_for("unknown_label"), 0.7);
    }

    #[test]
    fn missing_file_is_a_fatal_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_all(dir.path()).unwrap_err();
        assert_eq!(err.category(), "config");
    }
}
