// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Local-Only Resolver (`--plan-only`)
//!
//! Spec.md §8's testable property for `plan_only` runs is absolute: "no
//! network connection is opened; no rows are inserted anywhere." A plan-only
//! run still executes the pipeline to produce a realistic row count and
//! column shape for the loader's plan, so company resolution can't simply be
//! skipped — but it can't touch `enrichment_index`, `enrichment_requests`,
//! or the external lookup API either. This resolver tries only the two
//! layers that need no I/O (YAML override, existing column) and falls back
//! to a temp id computed in memory, never queued (open question resolved:
//! a plan-only temp id is for estimation only; the real run that follows
//! with `--execute` queues it for real).

use async_trait::async_trait;
use workdatahub_domain::entities::{ResolutionRequest, ResolutionResult, ResolutionSource};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::services::temp_id;
use workdatahub_domain::value_objects::{CompanyId, Confidence};

use crate::config_store::CompanyMapping;
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

pub struct LocalOnlyResolver {
    yaml: CompanyMapping,
    salt: String,
}

impl LocalOnlyResolver {
    pub fn new(yaml: CompanyMapping, salt: impl Into<String>) -> Self {
        Self { yaml, salt: salt.into() }
    }

    fn layer1_yaml(&self, request: &ResolutionRequest) -> Option<ResolutionResult> {
        use workdatahub_domain::entities::LookupType;
        for lookup_type in LookupType::YAML_PRIORITY {
            let Some(key) = request.value_for(lookup_type) else {
                continue;
            };
            if let Some(company_id) = self.yaml.get(&lookup_type).and_then(|table| table.get(&key)) {
                let company_id = CompanyId::new(company_id.clone()).ok()?;
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

    fn layer3_existing(&self, request: &ResolutionRequest) -> Option<ResolutionResult> {
        let existing = request.existing_company_id.as_deref()?.trim();
        if existing.is_empty() {
            return None;
        }
        let company_id = CompanyId::new(existing).ok()?;
        Some(ResolutionResult {
            company_id,
            source: ResolutionSource::ExistingColumn,
            match_type: None,
            confidence: Confidence::new(0.90).expect("0.90 is within range"),
            needs_review: false,
        })
    }
}

#[async_trait]
impl CompanyResolver for LocalOnlyResolver {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
        if let Some(result) = self.layer1_yaml(&request) {
            return Ok(result);
        }
        if let Some(result) = self.layer3_existing(&request) {
            return Ok(result);
        }

        let name = representative_name(&request)
            .ok_or_else(|| WdhError::internal("resolution request carries no field usable as a company name"))?;
        let company_id = temp_id::generate(&self.salt, name)?;
        Ok(ResolutionResult {
            company_id,
            source: ResolutionSource::TempId,
            match_type: None,
            confidence: Confidence::ZERO,
            needs_review: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use workdatahub_domain::entities::LookupType;

    #[tokio::test]
    async fn yaml_hit_wins_over_temp_id() {
        let mut yaml: CompanyMapping = HashMap::new();
        let mut plan_codes = HashMap::new();
        plan_codes.insert("P1".to_string(), "C1".to_string());
        yaml.insert(LookupType::PlanCode, plan_codes);

        let resolver = LocalOnlyResolver::new(yaml, "testsalt");
        let request = ResolutionRequest::new(Some("P1".into()), None, None, None, None).unwrap();
        let result = resolver.resolve(request).await.unwrap();
        assert_eq!(result.source, ResolutionSource::YamlOverride);
        assert_eq!(result.company_id.as_str(), "C1");
    }

    #[tokio::test]
    async fn falls_back_to_a_deterministic_temp_id_without_any_io() {
        let resolver = LocalOnlyResolver::new(HashMap::new(), "testsalt");
        let request = ResolutionRequest::new(None, Some("新公司XYZ".into()), None, None, None).unwrap();
        let result = resolver.resolve(request).await.unwrap();
        assert_eq!(result.source, ResolutionSource::TempId);
        assert!(result.company_id.is_temporary());
    }
}
