// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Five-Layer Company Resolver
//!
//! [`CompanyEnrichmentResolver`] implements [`CompanyResolver`] by trying,
//! in order, a YAML override map, the warehouse's own cache table, the
//! row's own `company_id` column, an external lookup API, and finally a
//! deterministic temporary id (spec.md §4.6). The first layer to produce a
//! match wins; nothing downstream is consulted.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;
use workdatahub_domain::entities::{LookupType, ResolutionRequest, ResolutionResult, ResolutionSource};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::services::temp_id;
use workdatahub_domain::value_objects::{CompanyId, Confidence};

use crate::config_store::{CompanyMapping, EqcConfidenceConfig};
use crate::enrichment::counters::EnrichmentCounters;
use crate::enrichment::provider::EqcProvider;
use crate::pipeline::steps::CompanyResolver;

/// Row shape of `enrichment_index`, used only for the Layer 2 query (spec.md §6).
#[derive(Debug, sqlx::FromRow)]
struct CacheRow {
    company_id: String,
    confidence: f64,
}

pub struct CompanyEnrichmentResolver {
    pool: PgPool,
    yaml: CompanyMapping,
    eqc_confidence: EqcConfidenceConfig,
    provider: Box<dyn EqcProvider>,
    provider_disabled: AtomicBool,
    salt: String,
    sync_budget_remaining: Mutex<i64>,
    counters: EnrichmentCounters,
    unknown_names: Mutex<HashMap<String, u32>>,
}

impl CompanyEnrichmentResolver {
    pub fn new(
        pool: PgPool,
        yaml: CompanyMapping,
        eqc_confidence: EqcConfidenceConfig,
        provider: Box<dyn EqcProvider>,
        salt: impl Into<String>,
        sync_budget: u32,
    ) -> Self {
        Self {
            pool,
            yaml,
            eqc_confidence,
            provider,
            provider_disabled: AtomicBool::new(false),
            salt: salt.into(),
            sync_budget_remaining: Mutex::new(sync_budget as i64),
            counters: EnrichmentCounters::default(),
            unknown_names: Mutex::new(HashMap::new()),
        }
    }

    pub fn counters(&self) -> &EnrichmentCounters {
        &self.counters
    }

    /// Names that fell through to Layer 5 this run, with occurrence counts,
    /// for the unknown-companies CSV export (spec.md §4.6, §6).
    pub fn unknown_names_snapshot(&self) -> HashMap<String, u32> {
        self.unknown_names.lock().expect("unknown_names mutex poisoned").clone()
    }

    fn layer1_yaml(&self, request: &ResolutionRequest) -> Option<ResolutionResult> {
        for lookup_type in LookupType::YAML_PRIORITY {
            let Some(key) = request.value_for(lookup_type) else {
                continue;
            };
            if let Some(company_id) = self.yaml.get(&lookup_type).and_then(|table| table.get(&key)) {
                let company_id = CompanyId::new(company_id.clone()).ok()?;
                self.counters.yaml_hits.fetch_add(1, Ordering::Relaxed);
                return Some(ResolutionResult {
                    company_id,
                    source: ResolutionSource::YamlOverride,
                    match_type: None,
                    confidence: Confidence::new(1.0).expect("1.0 is within range"),
                    needs_review: false,
                });
            }
        }
        None
    }

    async fn layer2_cache(&self, request: &ResolutionRequest) -> Result<Option<ResolutionResult>, WdhError> {
        for lookup_type in LookupType::CACHE_PRIORITY {
            let Some(key) = request.value_for(lookup_type) else {
                continue;
            };
            let row: Option<CacheRow> = sqlx::query_as(
                "SELECT company_id, confidence FROM enrichment_index WHERE lookup_key = $1 AND lookup_type = $2",
            )
            .bind(&key)
            .bind(lookup_type_str(lookup_type))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| WdhError::internal(format!("enrichment_index lookup failed: {e}")))?;

            let Some(row) = row else { continue };
            let confidence = Confidence::new(row.confidence).unwrap_or(Confidence::ZERO);
            if !confidence.meets_minimum(Confidence::new(self.min_confidence_for_cache()).unwrap_or(Confidence::ZERO)) {
                continue;
            }

            let pool = self.pool.clone();
            let key_for_touch = key.clone();
            let lookup_type_str = lookup_type_str(lookup_type);
            tokio::spawn(async move {
                let _ = sqlx::query(
                    "UPDATE enrichment_index SET hit_count = hit_count + 1, last_hit_at = now() \
                     WHERE lookup_key = $1 AND lookup_type = $2",
                )
                .bind(&key_for_touch)
                .bind(lookup_type_str)
                .execute(&pool)
                .await;
            });

            let company_id = CompanyId::new(row.company_id)
                .map_err(|e| WdhError::internal(format!("cached company_id malformed: {e}")))?;
            self.counters.cache_hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Some(ResolutionResult {
                company_id,
                source: ResolutionSource::WarehouseCache,
                match_type: None,
                confidence,
                needs_review: false,
            }));
        }
        Ok(None)
    }

    fn layer3_existing(&self, request: &ResolutionRequest) -> Option<ResolutionResult> {
        let existing = request.existing_company_id.as_deref()?.trim();
        if existing.is_empty() {
            return None;
        }
        let company_id = CompanyId::new(existing).ok()?;
        self.counters.existing_hits.fetch_add(1, Ordering::Relaxed);
        Some(ResolutionResult {
            company_id,
            source: ResolutionSource::ExistingColumn,
            match_type: None,
            confidence: Confidence::new(0.90).expect("0.90 is within range"),
            needs_review: false,
        })
    }

    fn min_confidence_for_cache(&self) -> f64 {
        self.eqc_confidence.min_confidence_for_cache
    }

    /// Consumes one unit of sync budget if any remains, returning whether
    /// the call should proceed. Budget is decremented on every attempt,
    /// successful or not (spec.md §4.6), so this is called once per row
    /// before the API is ever reached.
    fn take_budget(&self) -> bool {
        let mut remaining = self.sync_budget_remaining.lock().expect("sync budget mutex poisoned");
        if *remaining <= 0 {
            return false;
        }
        *remaining -= 1;
        true
    }

    async fn layer4_api(&self, name: &str) -> Result<Option<ResolutionResult>, WdhError> {
        if self.provider_disabled.load(Ordering::Relaxed) {
            return Ok(None);
        }
        if !self.take_budget() {
            return Ok(None);
        }

        self.counters.api_calls.fetch_add(1, Ordering::Relaxed);
        self.counters.api_budget_used.fetch_add(1, Ordering::Relaxed);

        let candidates = match self.provider.lookup(name).await {
            Ok(candidates) => candidates,
            Err(err) => {
                self.counters.api_failures.fetch_add(1, Ordering::Relaxed);
                if is_auth_failure(&err) {
                    warn!("lookup provider auth failure, disabling for remainder of run");
                    self.provider_disabled.store(true, Ordering::Relaxed);
                    return Ok(None);
                }
                return Err(err);
            }
        };

        let best = candidates
            .into_iter()
            .map(|candidate| {
                let confidence = self.eqc_confidence.confidence_for(&candidate.match_type);
                (candidate, confidence)
            })
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let Some((candidate, confidence_value)) = best else {
            return Ok(None);
        };
        let confidence = Confidence::new(confidence_value).unwrap_or(Confidence::ZERO);
        if !confidence.meets_minimum(Confidence::new(self.min_confidence_for_cache()).unwrap_or(Confidence::ZERO)) {
            return Ok(None);
        }

        let company_id = CompanyId::new(candidate.company_id.clone())
            .map_err(|e| WdhError::internal(format!("API returned malformed company_id: {e}")))?;

        sqlx::query(
            "INSERT INTO enrichment_index (lookup_key, lookup_type, company_id, confidence, source, hit_count, last_hit_at) \
             VALUES ($1, 'customer_name', $2, $3, 'eqc_api', 1, now()) \
             ON CONFLICT (lookup_key, lookup_type) DO UPDATE SET \
                 company_id = EXCLUDED.company_id, confidence = EXCLUDED.confidence, \
                 hit_count = enrichment_index.hit_count + 1, last_hit_at = now()",
        )
        .bind(name)
        .bind(candidate.company_id.as_str())
        .bind(confidence.value())
        .execute(&self.pool)
        .await
        .map_err(|e| WdhError::internal(format!("could not cache API resolution: {e}")))?;

        Ok(Some(ResolutionResult {
            company_id,
            source: ResolutionSource::ExternalApi,
            match_type: Some(candidate.match_type),
            confidence,
            needs_review: false,
        }))
    }

    async fn layer5_temp_id(&self, name: &str) -> Result<ResolutionResult, WdhError> {
        let company_id = temp_id::generate(&self.salt, name)?;
        let normalized = temp_id::normalize_name(name);

        sqlx::query(
            "INSERT INTO enrichment_requests (raw_name, normalized_name, temp_id, status, attempts) \
             VALUES ($1, $2, $3, 'pending', 0) \
             ON CONFLICT (normalized_name) WHERE status IN ('pending', 'processing') DO NOTHING",
        )
        .bind(name)
        .bind(&normalized)
        .bind(company_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| WdhError::internal(format!("could not queue enrichment request: {e}")))?;

        self.counters.temp_ids_generated.fetch_add(1, Ordering::Relaxed);
        self.counters.queued_new.fetch_add(1, Ordering::Relaxed);
        *self
            .unknown_names
            .lock()
            .expect("unknown_names mutex poisoned")
            .entry(name.to_string())
            .or_insert(0) += 1;

        Ok(ResolutionResult {
            company_id,
            source: ResolutionSource::TempId,
            match_type: None,
            confidence: Confidence::ZERO,
            needs_review: true,
        })
    }
}

fn lookup_type_str(lookup_type: LookupType) -> &'static str {
    match lookup_type {
        LookupType::PlanCode => "plan_code",
        LookupType::AccountName => "account_name",
        LookupType::AccountNumber => "account_number",
        LookupType::CustomerName => "customer_name",
        LookupType::PlanCustomer => "plan_customer",
    }
}

fn is_auth_failure(error: &WdhError) -> bool {
    matches!(error, WdhError::EnrichmentProvider { message } if message.contains("401") || message.contains("403"))
}

/// The field used to key Layer 4's API call and Layer 5's temp id, in
/// priority order: a company name is more useful to a human reviewer than a
/// plan or account code, so prefer it when present.
fn representative_name(request: &ResolutionRequest) -> Option<&str> {
    request
        .customer_name
        .as_deref()
        .or(request.account_name.as_deref())
        .or(request.plan_code.as_deref())
        .or(request.account_number.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

#[async_trait]
impl CompanyResolver for CompanyEnrichmentResolver {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
        if let Some(result) = self.layer1_yaml(&request) {
            return Ok(result);
        }
        if let Some(result) = self.layer2_cache(&request).await? {
            return Ok(result);
        }
        if let Some(result) = self.layer3_existing(&request) {
            return Ok(result);
        }

        let name = representative_name(&request).ok_or_else(|| {
            WdhError::internal("resolution request carries no field usable as a company name")
        })?;

        if let Some(result) = self.layer4_api(name).await? {
            return Ok(result);
        }
        self.layer5_temp_id(name).await
    }
}
