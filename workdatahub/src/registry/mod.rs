// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Registry
//!
//! Two lookup tables the orchestrator dispatches through by domain name
//! rather than branching on it in code (spec.md §4.9): [`JobRegistry`]
//! carries what a domain's job is allowed to do (backfill, enrichment,
//! multi-file input), and [`DomainServiceRegistry`] carries how to actually
//! run it — a wired [`PipelineDefinition`]. Adding a domain means adding an
//! entry to both, never a new `match domain_name` arm in the orchestrator.
//!
//! [`annuity_performance`] is the one domain wired all the way through, as
//! the concrete reference every other domain's registry entry follows.

pub mod annuity_performance;

use std::collections::HashMap;
use std::sync::Arc;

use workdatahub_domain::entities::{SheetSelector, VersionFallback, VersionStrategy};
use workdatahub_domain::error::WdhError;

use crate::config_store::AppConfig;
use crate::hooks::HookRunner;
use crate::pipeline::PipelineDefinition;

#[derive(Debug, Clone, Copy)]
pub struct JobCapabilities {
    pub supports_backfill: bool,
    pub supports_enrichment: bool,
    /// Whether this domain's job accepts more than one input file per run.
    /// When true, the orchestrator concatenates every discovered file's rows
    /// into one frame before Bronze validation runs (spec.md §9 Open
    /// Question: "multi-file jobs validate the concatenated frame, not each
    /// file separately" — chosen so a uniqueness violation spanning two
    /// files is still caught).
    pub supports_multi_file: bool,
}

pub struct JobEntry {
    pub capabilities: JobCapabilities,
}

pub struct JobRegistry {
    entries: HashMap<String, JobEntry>,
}

impl JobRegistry {
    pub fn new(entries: HashMap<String, JobEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, domain: &str) -> Result<&JobEntry, WdhError> {
        self.entries.get(domain).ok_or_else(|| WdhError::UnknownDomain(domain.to_string()))
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

pub struct DomainServiceEntry {
    pub display_name: String,
    pub supports_enrichment: bool,
    pub pipeline: Arc<PipelineDefinition>,
    /// This domain's ordered post-ETL hooks (spec.md §4.9). Built once
    /// alongside the pipeline since a hook's SQL is as fixed at compile time
    /// as a pipeline step's wiring — unlike the pipeline, it is never
    /// re-wired per resolver, so the orchestrator reuses one instance across
    /// every run of this domain.
    pub hooks: Arc<HookRunner>,
}

pub struct DomainServiceRegistry {
    entries: HashMap<String, DomainServiceEntry>,
}

impl DomainServiceRegistry {
    pub fn new(entries: HashMap<String, DomainServiceEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, domain: &str) -> Result<&DomainServiceEntry, WdhError> {
        self.entries.get(domain).ok_or_else(|| WdhError::UnknownDomain(domain.to_string()))
    }

    pub fn domain_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Startup cross-validation (spec.md §4.9): every domain `data_sources.yml`
/// declares must have a registry entry on both sides, or the process fails
/// fast before any run starts. A registry entry with no corresponding
/// `data_sources.yml` domain is only a warning — it just means that domain's
/// code is currently unreachable, not that configuration is broken.
pub fn validate_registries(app_config: &AppConfig, jobs: &JobRegistry, services: &DomainServiceRegistry) -> Result<(), WdhError> {
    for domain in app_config.domain_names() {
        if jobs.get(domain).is_err() {
            return Err(WdhError::config("registry", format!("domain '{domain}' has no JobRegistry entry")));
        }
        if services.get(domain).is_err() {
            return Err(WdhError::config("registry", format!("domain '{domain}' has no DomainServiceRegistry entry")));
        }
    }

    let known: std::collections::HashSet<&str> = app_config.domain_names().collect();
    for registered in jobs.domain_names() {
        if !known.contains(registered) {
            tracing::warn!(domain = registered, "JobRegistry entry has no corresponding data_sources.yml domain");
        }
    }
    for registered in services.domain_names() {
        if !known.contains(registered) {
            tracing::warn!(domain = registered, "DomainServiceRegistry entry has no corresponding data_sources.yml domain");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;

    fn empty_app_config() -> AppConfig {
        AppConfig::from_parts(
            IndexMap::new(),
            HashMap::new(),
            HashMap::new(),
            crate::config_store::EqcConfidenceConfig {
                match_confidence: HashMap::new(),
                default: 0.5,
                min_confidence_for_cache: 0.5,
            },
        )
    }

    fn sample_domain() -> workdatahub_domain::entities::DomainConfig {
        workdatahub_domain::entities::DomainConfig {
            domain_name: "annuity_performance".into(),
            base_path_template: "annuity_performance/{year}{month}".into(),
            include_patterns: vec!["*.xlsx".into()],
            exclude_patterns: vec![],
            sheet_selector: SheetSelector::Index(0),
            version_strategy: VersionStrategy::HighestNumber,
            version_fallback: VersionFallback::Error,
            table_name: "annuity_performance".into(),
            schema_name: "gold".into(),
            primary_key_columns: vec!["月度".into(), "计划代码".into(), "组合代码".into(), "company_id".into()],
            composite_delete_key_columns: vec!["月度".into(), "计划代码".into()],
            requires_backfill: true,
            supports_enrichment: true,
        }
    }

    #[test]
    fn unregistered_domain_is_a_fatal_config_error() {
        let mut domains = IndexMap::new();
        domains.insert("annuity_performance".to_string(), sample_domain());
        let app_config = AppConfig::from_parts(
            domains,
            HashMap::new(),
            HashMap::new(),
            crate::config_store::EqcConfidenceConfig {
                match_confidence: HashMap::new(),
                default: 0.5,
                min_confidence_for_cache: 0.5,
            },
        );
        let jobs = JobRegistry::new(HashMap::new());
        let services = DomainServiceRegistry::new(HashMap::new());
        let err = validate_registries(&app_config, &jobs, &services).unwrap_err();
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn an_empty_app_config_validates_trivially() {
        let jobs = JobRegistry::new(HashMap::new());
        let services = DomainServiceRegistry::new(HashMap::new());
        assert!(validate_registries(&empty_app_config(), &jobs, &services).is_ok());
    }
}
