// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Resolves `company_id` for every row via the five-layer resolver
//! (spec.md §4.6). The step itself only knows the [`CompanyResolver`] port —
//! `workdatahub::enrichment` provides the concrete implementation, so this
//! module has no dependency on `sqlx` or any HTTP client.

use async_trait::async_trait;
use std::sync::Arc;
use workdatahub_domain::entities::{CellValue, Frame, PipelineContext, PipelineStep, Row};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::entities::{ResolutionRequest, ResolutionResult};

/// Port implemented by `workdatahub::enrichment::CompanyEnrichmentResolver`.
/// Kept separate from the concrete resolver so unit tests for this step can
/// supply a stub without touching a database or an HTTP client.
#[async_trait]
pub trait CompanyResolver: Send + Sync {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError>;
}

/// Lets the orchestrator keep its own `Arc<ConcreteResolver>` (to read
/// counters back out after the run) while handing the step a type-erased
/// `Box<dyn CompanyResolver>` built from a clone of that same `Arc`.
#[async_trait]
impl<T: CompanyResolver + ?Sized> CompanyResolver for Arc<T> {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
        (**self).resolve(request).await
    }
}

pub struct CompanyIdResolutionStep {
    pub name: String,
    pub plan_code_field: String,
    pub customer_name_field: String,
    pub account_name_field: String,
    pub account_number_field: String,
    pub existing_company_id_field: Option<String>,
    pub resolver: Box<dyn CompanyResolver>,
}

fn text_field(row: &Row, field: &str) -> Option<String> {
    row.get(field).and_then(CellValue::as_text).map(str::to_string)
}

fn build_request(row: &Row, step: &CompanyIdResolutionStep) -> Result<ResolutionRequest, WdhError> {
    ResolutionRequest::new(
        text_field(row, &step.plan_code_field),
        text_field(row, &step.customer_name_field),
        text_field(row, &step.account_name_field),
        text_field(row, &step.account_number_field),
        step.existing_company_id_field.as_deref().and_then(|f| text_field(row, f)),
    )
}

#[async_trait]
impl PipelineStep for CompanyIdResolutionStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let mut rows = Vec::with_capacity(frame.len());
        for row in frame.into_rows() {
            let request = build_request(&row, self)?;
            let result = self.resolver.resolve(request).await?;
            let mut out = row;
            out.insert("company_id".to_string(), CellValue::Text(result.company_id.as_str().to_string()));
            out.insert("company_id_source".to_string(), CellValue::Text(format!("{:?}", result.source)));
            rows.push(out);
        }
        Ok(Frame::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::value_objects::{CompanyId, Confidence};
    use workdatahub_domain::entities::ResolutionSource;
    use workdatahub_domain::value_objects::Period;

    struct StubResolver;

    #[async_trait]
    impl CompanyResolver for StubResolver {
        async fn resolve(&self, _request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
            Ok(ResolutionResult {
                company_id: CompanyId::new("C1").unwrap(),
                source: ResolutionSource::YamlOverride,
                match_type: None,
                confidence: Confidence::new(1.0).unwrap(),
                needs_review: false,
            })
        }
    }

    #[tokio::test]
    async fn resolves_company_id_for_every_row() {
        let step = CompanyIdResolutionStep {
            name: "resolve_company_id".into(),
            plan_code_field: "plan_code".into(),
            customer_name_field: "customer_name".into(),
            account_name_field: "account_name".into(),
            account_number_field: "account_number".into(),
            existing_company_id_field: None,
            resolver: Box::new(StubResolver),
        };
        let mut row = Row::new();
        row.insert("plan_code".to_string(), CellValue::Text("P1".into()));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.rows()[0]["company_id"], CellValue::Text("C1".into()));
    }
}
