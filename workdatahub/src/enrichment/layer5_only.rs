// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Layer-5-Only Resolver (`--no-enrichment`)
//!
//! Spec.md §6's `--no-enrichment` flag "forces Layer 5 only": every row
//! skips straight to the deterministic temporary id, bypassing the YAML
//! override, warehouse cache, existing-column, and external-API layers
//! entirely (spec.md §4.6). It still queues a `pending` `enrichment_requests`
//! row exactly like [`super::resolver::CompanyEnrichmentResolver`]'s own
//! Layer 5 does, since the async resolver job downstream doesn't
//! distinguish how a temp id was produced.

use async_trait::async_trait;
use sqlx::PgPool;
use workdatahub_domain::entities::{ResolutionRequest, ResolutionResult, ResolutionSource};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::services::temp_id;
use workdatahub_domain::value_objects::Confidence;

use crate::enrichment::counters::EnrichmentCounters;
use crate::pipeline::steps::CompanyResolver;

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

pub struct Layer5OnlyResolver {
    pool: PgPool,
    salt: String,
    counters: EnrichmentCounters,
}

impl Layer5OnlyResolver {
    pub fn new(pool: PgPool, salt: impl Into<String>) -> Self {
        Self {
            pool,
            salt: salt.into(),
            counters: EnrichmentCounters::default(),
        }
    }

    pub fn counters(&self) -> &EnrichmentCounters {
        &self.counters
    }
}

#[async_trait]
impl CompanyResolver for Layer5OnlyResolver {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
        let name = representative_name(&request)
            .ok_or_else(|| WdhError::internal("resolution request carries no field usable as a company name"))?;

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

        self.counters.temp_ids_generated.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        self.counters.queued_new.fetch_add(1, std::sync::atomic::Ordering::Relaxed);

        Ok(ResolutionResult {
            company_id,
            source: ResolutionSource::TempId,
            match_type: None,
            confidence: Confidence::ZERO,
            needs_review: true,
        })
    }
}
