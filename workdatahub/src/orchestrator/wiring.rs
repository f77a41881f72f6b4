// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Registry Wiring
//!
//! Builds the [`JobRegistry`]/[`DomainServiceRegistry`] pair for one run
//! (spec.md §4.9). Which [`CompanyResolver`] a domain's pipeline gets wired
//! with depends on the run itself, not just the domain, so this is done per
//! run rather than once at process startup: a `--plan-only` run gets
//! [`LocalOnlyResolver`] (spec.md §8's "no network connection is opened, no
//! rows inserted anywhere"), `--no-enrichment` gets [`Layer5OnlyResolver`],
//! and everything else gets the full five-layer [`CompanyEnrichmentResolver`].

use std::collections::HashMap;
use std::sync::Arc;

use sqlx::PgPool;
use workdatahub_bootstrap::config::RuntimeConfig;
use workdatahub_domain::error::WdhError;

use crate::config_store::AppConfig;
use crate::enrichment::{CompanyEnrichmentResolver, EnrichmentCounterSnapshot, HttpEqcProvider, Layer5OnlyResolver, LocalOnlyResolver};
use crate::hooks::HookRunner;
use crate::pipeline::steps::CompanyResolver;
use crate::registry::{annuity_performance, DomainServiceEntry, DomainServiceRegistry, JobCapabilities, JobEntry, JobRegistry};

use super::request::RunRequest;

/// The concrete resolver a run's pipeline was wired with, kept around after
/// the pipeline consumes a type-erased clone of it so the orchestrator can
/// still read its counters and unknown-name set once the run finishes.
pub enum ResolverHandle {
    Full(Arc<CompanyEnrichmentResolver>),
    Layer5Only(Arc<Layer5OnlyResolver>),
    LocalOnly(Arc<LocalOnlyResolver>),
}

impl ResolverHandle {
    /// A type-erased handle the pipeline step can own, built from a clone of
    /// the `Arc` this handle already holds (see the blanket
    /// `CompanyResolver` impl on `Arc<T>` in `pipeline::steps`).
    pub fn as_company_resolver(&self) -> Box<dyn CompanyResolver> {
        match self {
            ResolverHandle::Full(resolver) => Box::new(Arc::clone(resolver)),
            ResolverHandle::Layer5Only(resolver) => Box::new(Arc::clone(resolver)),
            ResolverHandle::LocalOnly(resolver) => Box::new(Arc::clone(resolver)),
        }
    }

    /// `None` for a plan-only run: [`LocalOnlyResolver`] never queues an
    /// enrichment request or touches `enrichment_index`, so it has no
    /// counters worth reporting.
    pub fn counters(&self) -> Option<EnrichmentCounterSnapshot> {
        match self {
            ResolverHandle::Full(resolver) => Some(resolver.counters().snapshot()),
            ResolverHandle::Layer5Only(resolver) => Some(resolver.counters().snapshot()),
            ResolverHandle::LocalOnly(_) => None,
        }
    }

    pub fn unknown_names(&self) -> HashMap<String, u32> {
        match self {
            ResolverHandle::Full(resolver) => resolver.unknown_names_snapshot(),
            ResolverHandle::Layer5Only(_) | ResolverHandle::LocalOnly(_) => HashMap::new(),
        }
    }
}

/// Picks the resolver this run's flags call for (spec.md §6, §8).
/// `pool` is `None` exactly when the run is plan-only, since that is the
/// only case in which no database connection may exist yet.
fn build_resolver(app_config: &AppConfig, runtime: &RuntimeConfig, pool: Option<&PgPool>, request: &RunRequest) -> Result<ResolverHandle, WdhError> {
    if request.plan_only {
        let resolver = LocalOnlyResolver::new(app_config.company_mapping().clone(), runtime.enrichment_salt());
        return Ok(ResolverHandle::LocalOnly(Arc::new(resolver)));
    }

    let pool = pool.ok_or_else(|| WdhError::internal("a non-plan-only run requires a database pool"))?;

    if request.no_enrichment || !runtime.enrichment_enabled() {
        let resolver = Layer5OnlyResolver::new(pool.clone(), runtime.enrichment_salt());
        return Ok(ResolverHandle::Layer5Only(Arc::new(resolver)));
    }

    let base_url = runtime
        .enrichment_api_base_url()
        .ok_or_else(|| WdhError::config("environment", "WDH_ENRICHMENT_API_BASE_URL is required when enrichment is enabled"))?;
    let api_token = runtime
        .enrichment_api_token()
        .ok_or_else(|| WdhError::config("environment", "WDH_ENRICHMENT_API_TOKEN is required when enrichment is enabled"))?;
    let provider = HttpEqcProvider::new(base_url, api_token)?;

    let sync_budget = request.sync_budget.unwrap_or_else(|| runtime.sync_budget_default());
    let resolver = CompanyEnrichmentResolver::new(
        pool.clone(),
        app_config.company_mapping().clone(),
        app_config.eqc_confidence().clone(),
        Box::new(provider),
        runtime.enrichment_salt(),
        sync_budget,
    );
    Ok(ResolverHandle::Full(Arc::new(resolver)))
}

/// Every domain this build knows how to run, independent of what
/// `data_sources.yml` declares (spec.md §4.9's cross-validation catches a
/// mismatch either way). `annuity_performance` is the one domain wired all
/// the way through; adding a new domain means adding an entry here, never a
/// `match domain_name` arm in [`super::run`].
fn job_entries() -> HashMap<String, JobEntry> {
    let mut entries = HashMap::new();
    entries.insert(
        "annuity_performance".to_string(),
        JobEntry {
            capabilities: JobCapabilities {
                supports_backfill: true,
                supports_enrichment: true,
                supports_multi_file: false,
            },
        },
    );
    entries
}

/// Builds this run's [`JobRegistry`]/[`DomainServiceRegistry`] pair and the
/// [`ResolverHandle`] the orchestrator reads back from after the run.
pub fn build_registries(
    app_config: &AppConfig,
    runtime: &RuntimeConfig,
    pool: Option<&PgPool>,
    request: &RunRequest,
) -> Result<(JobRegistry, DomainServiceRegistry, ResolverHandle), WdhError> {
    let jobs = JobRegistry::new(job_entries());

    let resolver = build_resolver(app_config, runtime, pool, request)?;

    let mut services = HashMap::new();
    let cleansing = Arc::new(crate::cleansing::CleansingRegistry::new());
    let pipeline = annuity_performance::build(Arc::clone(&cleansing), resolver.as_company_resolver());
    services.insert(
        "annuity_performance".to_string(),
        DomainServiceEntry {
            display_name: "Annuity Performance".to_string(),
            supports_enrichment: true,
            pipeline: Arc::new(pipeline),
            hooks: Arc::new(annuity_performance::hooks()),
        },
    );

    Ok((jobs, DomainServiceRegistry::new(services), resolver))
}
