//! Runs the `annuity_performance` pipeline end to end — Bronze validation,
//! pre-resolution cleansing, company ID resolution, Gold projection — over a
//! small multi-row frame, against a stub resolver so no database is needed.
//! Checks the universal invariant every domain's Gold output must satisfy:
//! every row carries a non-empty `company_id` and the composite key is
//! unique.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;
use workdatahub::cleansing::CleansingRegistry;
use workdatahub::pipeline::steps::CompanyResolver;
use workdatahub::registry::annuity_performance;
use workdatahub_domain::entities::{CellValue, Frame, PipelineContext, ResolutionRequest, ResolutionResult, ResolutionSource, Row};
use workdatahub_domain::error::WdhError;
use workdatahub_domain::value_objects::{CompanyId, Confidence, Period};

/// Assigns a deterministic company id from the plan code alone, as if every
/// row already had a YAML override on file.
struct StubResolver;

#[async_trait]
impl CompanyResolver for StubResolver {
    async fn resolve(&self, request: ResolutionRequest) -> Result<ResolutionResult, WdhError> {
        let id = format!("C-{}", request.plan_code.unwrap_or_default());
        Ok(ResolutionResult {
            company_id: CompanyId::new(id).unwrap(),
            source: ResolutionSource::YamlOverride,
            match_type: None,
            confidence: Confidence::new(1.0).unwrap(),
            needs_review: false,
        })
    }
}

fn row(month: &str, plan: &str, portfolio: &str, customer: &str, opening: &str) -> Row {
    let mut row: Row = IndexMap::new();
    row.insert("月度".to_string(), CellValue::Text(month.to_string()));
    row.insert("计划代码".to_string(), CellValue::Text(plan.to_string()));
    row.insert("组合代码".to_string(), CellValue::Text(portfolio.to_string()));
    row.insert("组合名称".to_string(), CellValue::Text("示范组合".to_string()));
    row.insert("客户名称".to_string(), CellValue::Text(format!("  {customer} 有限公司 ")));
    row.insert("年金账户号".to_string(), CellValue::Text("ACC001".to_string()));
    row.insert("期初资产规模".to_string(), CellValue::Text(opening.to_string()));
    row.insert("期末资产规模".to_string(), CellValue::Text(opening.to_string()));
    row.insert("供款".to_string(), CellValue::Null);
    row.insert("待遇支付".to_string(), CellValue::Null);
    row
}

#[tokio::test]
async fn every_gold_row_has_a_company_id_and_the_composite_key_stays_unique() {
    let cleansing = Arc::new(CleansingRegistry::new());
    let definition = annuity_performance::build(cleansing, Box::new(StubResolver));

    let frame = Frame::new(vec![
        row("202501", "P001", "F01", "Acme", "¥1,234,567.00"),
        row("202501", "P002", "F01", "Beta", "100000.00"),
    ]);

    let mut context = PipelineContext::new("annuity_performance", Period::new(2025, 1).unwrap());
    let cancellation = CancellationToken::new();
    let result = workdatahub::pipeline::run(&definition, frame, &mut context, &cancellation).await.unwrap();

    assert_eq!(result.len(), 2);

    let mut seen_keys: HashMap<String, usize> = HashMap::new();
    for out_row in result.rows() {
        let company_id = out_row.get("company_id").and_then(CellValue::as_text);
        assert!(company_id.map(|s| !s.is_empty()).unwrap_or(false), "every row must resolve a company id");

        let key = format!(
            "{}|{}|{}|{}",
            out_row.get("月度").unwrap(),
            out_row.get("计划代码").unwrap(),
            out_row.get("组合代码").unwrap(),
            out_row.get("company_id").unwrap(),
        );
        *seen_keys.entry(key).or_insert(0) += 1;
    }
    assert!(seen_keys.values().all(|count| *count == 1), "composite key must be unique");

    let opening = result.rows()[0].get("期初资产规模").and_then(CellValue::as_decimal).unwrap();
    assert_eq!(opening, Decimal::new(123456700, 2));

    let customer_name = result.rows()[0].get("客户名称").and_then(CellValue::as_text).unwrap();
    assert_eq!(customer_name, "Acme", "cleansing must strip whitespace and the corporate suffix before resolution");
}

#[tokio::test]
async fn a_bronze_required_field_violation_is_rejected_not_silently_dropped() {
    let cleansing = Arc::new(CleansingRegistry::new());
    let definition = annuity_performance::build(cleansing, Box::new(StubResolver));

    let mut bad_row = row("202501", "P001", "F01", "Acme", "100.00");
    bad_row.insert("计划代码".to_string(), CellValue::Null);
    let frame = Frame::new(vec![bad_row, row("202501", "P002", "F01", "Beta", "200.00")]);

    let mut context = PipelineContext::new("annuity_performance", Period::new(2025, 1).unwrap());
    let cancellation = CancellationToken::new();
    let result = workdatahub::pipeline::run(&definition, frame, &mut context, &cancellation).await.unwrap();

    assert_eq!(result.len(), 1, "the row missing a required field is rejected, the good row still gets through");
    assert_eq!(context.total_rejected(), 1);
}
