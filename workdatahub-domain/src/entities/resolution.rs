// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Company Enrichment Resolution
//!
//! `ResolutionRequest`/`ResolutionResult` are the input/output pair of the
//! five-layer company resolver (spec §4.6): a row's identifying fields go
//! in, a `CompanyId` plus provenance comes out. The five layers are tried in
//! order and the first hit wins; `ResolutionSource` records which one it was,
//! both for observability and because layer 5 (temp id) is the only source
//! that is never a confident match.

use serde::{Deserialize, Serialize};

use crate::error::WdhError;
use crate::value_objects::{CompanyId, Confidence};

/// One of the five lookup key shapes an `enrichment_index` row may be keyed
/// by (spec §3 `EnrichmentIndexRow.lookup_type`). Layers 1 and 2 try these in
/// priority order: plan code, account name, account number, customer name,
/// then the combined plan+customer key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupType {
    PlanCode,
    AccountName,
    AccountNumber,
    CustomerName,
    PlanCustomer,
}

impl LookupType {
    /// Priority order used by Layer 1 (yaml) and Layer 2 (warehouse cache),
    /// spec §4.6: "plan_code, account_name, account_number, customer_name"
    /// (Layer 2 additionally tries `plan_customer` last).
    pub const YAML_PRIORITY: [LookupType; 4] = [
        LookupType::PlanCode,
        LookupType::AccountName,
        LookupType::AccountNumber,
        LookupType::CustomerName,
    ];

    pub const CACHE_PRIORITY: [LookupType; 5] = [
        LookupType::PlanCode,
        LookupType::AccountName,
        LookupType::AccountNumber,
        LookupType::CustomerName,
        LookupType::PlanCustomer,
    ];
}

/// The identifying fields of one row headed into company enrichment. At
/// least one field must be present (spec §3: "at least one field required").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub plan_code: Option<String>,
    pub customer_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: Option<String>,
    /// Layer 3: a `company_id` the row already carries, if any.
    pub existing_company_id: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl ResolutionRequest {
    pub fn new(
        plan_code: Option<String>,
        customer_name: Option<String>,
        account_name: Option<String>,
        account_number: Option<String>,
        existing_company_id: Option<String>,
    ) -> Result<Self, WdhError> {
        let request = Self {
            plan_code,
            customer_name,
            account_name,
            account_number,
            existing_company_id,
        };
        if !request.has_any_field() {
            return Err(WdhError::internal(
                "resolution request must carry at least one identifying field",
            ));
        }
        Ok(request)
    }

    pub fn has_any_field(&self) -> bool {
        [
            &self.plan_code,
            &self.customer_name,
            &self.account_name,
            &self.account_number,
        ]
        .iter()
        .any(|v| non_blank(v).is_some())
    }

    /// The value for `lookup_type`, if this request carries one. `PlanCustomer`
    /// combines plan code and customer name, matching the warehouse cache's
    /// composite key shape.
    pub fn value_for(&self, lookup_type: LookupType) -> Option<String> {
        match lookup_type {
            LookupType::PlanCode => non_blank(&self.plan_code).map(str::to_string),
            LookupType::AccountName => non_blank(&self.account_name).map(str::to_string),
            LookupType::AccountNumber => non_blank(&self.account_number).map(str::to_string),
            LookupType::CustomerName => non_blank(&self.customer_name).map(str::to_string),
            LookupType::PlanCustomer => {
                let plan = non_blank(&self.plan_code)?;
                let customer = non_blank(&self.customer_name)?;
                Some(format!("{plan}|{customer}"))
            }
        }
    }
}

/// Which of the five layers produced a `ResolutionResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionSource {
    /// Layer 1: static `company_id_mapping.yml`.
    YamlOverride,
    /// Layer 2: the warehouse's own cached mapping table.
    WarehouseCache,
    /// Layer 3: an existing `company_id` column already on the row.
    ExistingColumn,
    /// Layer 4: an external lookup API.
    ExternalApi,
    /// Layer 5: deterministic temporary id, no real match found.
    TempId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub company_id: CompanyId,
    pub source: ResolutionSource,
    /// Sub-classification of the match, e.g. the EQC candidate's Chinese
    /// match-type label (spec §4.6 Layer 4) or `None` for sources that don't
    /// distinguish match quality beyond their fixed confidence.
    pub match_type: Option<String>,
    pub confidence: Confidence,
    /// True when a human should double-check this mapping before it's
    /// treated as authoritative; always true for `TempId`.
    pub needs_review: bool,
}

impl ResolutionResult {
    /// Invariant (spec §4.6): a temp-id result always carries zero
    /// confidence and always produces a company id matching the temp-id
    /// shape, and nothing else does.
    pub fn is_consistent(&self) -> bool {
        let claims_temp = self.source == ResolutionSource::TempId;
        let looks_temp = self.company_id.is_temporary();
        let zero_confidence = self.confidence == Confidence::ZERO;
        claims_temp == looks_temp && (!claims_temp || zero_confidence) && (!claims_temp || self.needs_review)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_id_result_is_zero_confidence_and_temp_shaped() {
        let result = ResolutionResult {
            company_id: CompanyId::new("INABCDEFGHIJKLMN").unwrap(),
            source: ResolutionSource::TempId,
            match_type: None,
            confidence: Confidence::ZERO,
            needs_review: true,
        };
        assert!(result.is_consistent());
    }

    #[test]
    fn yaml_override_with_a_temp_shaped_id_is_inconsistent() {
        let result = ResolutionResult {
            company_id: CompanyId::new("INABCDEFGHIJKLMN").unwrap(),
            source: ResolutionSource::YamlOverride,
            match_type: None,
            confidence: Confidence::new(1.0).unwrap(),
            needs_review: false,
        };
        assert!(!result.is_consistent());
    }

    #[test]
    fn temp_id_result_with_nonzero_confidence_is_inconsistent() {
        let result = ResolutionResult {
            company_id: CompanyId::new("INABCDEFGHIJKLMN").unwrap(),
            source: ResolutionSource::TempId,
            match_type: None,
            confidence: Confidence::new(0.5).unwrap(),
            needs_review: true,
        };
        assert!(!result.is_consistent());
    }

    #[test]
    fn request_requires_at_least_one_field() {
        assert!(ResolutionRequest::new(None, None, None, None, None).is_err());
        assert!(ResolutionRequest::new(Some("P1".into()), None, None, None, None).is_ok());
    }

    #[test]
    fn plan_customer_combines_both_fields() {
        let req = ResolutionRequest::new(
            Some("P1".into()),
            Some("Acme".into()),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            req.value_for(LookupType::PlanCustomer),
            Some("P1|Acme".to_string())
        );
        assert_eq!(req.value_for(LookupType::AccountName), None);
    }
}
