// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Derives one output field from a pure function over the rest of the row
//! (spec.md §4.5, e.g. "management_fee = balance * fee_rate"). The function
//! itself is supplied by each domain's registry entry rather than parsed
//! from a config expression language — there is no expression evaluator in
//! this platform.

use async_trait::async_trait;
use workdatahub_domain::entities::{Frame, PipelineContext, PipelineStep, Row};
use workdatahub_domain::error::WdhError;

pub type CalculationFn = Arc<dyn Fn(&Row) -> Result<workdatahub_domain::entities::CellValue, WdhError> + Send + Sync>;

use std::sync::Arc;

pub struct CalculationStep {
    pub name: String,
    pub output_field: String,
    pub compute: CalculationFn,
}

#[async_trait]
impl PipelineStep for CalculationStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let mut rows = Vec::with_capacity(frame.len());
        for row in frame.into_rows() {
            let value = (self.compute)(&row)?;
            let mut out = row;
            out.insert(self.output_field.clone(), value);
            rows.push(out);
        }
        Ok(Frame::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::CellValue;
    use workdatahub_domain::value_objects::Period;

    #[tokio::test]
    async fn derives_a_field_from_the_computation() {
        let step = CalculationStep {
            name: "calc_fee".into(),
            output_field: "fee".into(),
            compute: Arc::new(|row: &Row| {
                let balance = row.get("balance").and_then(CellValue::as_decimal).unwrap_or_default();
                Ok(CellValue::Decimal(balance * rust_decimal::Decimal::new(1, 2)))
            }),
        };
        let mut row = Row::new();
        row.insert("balance".to_string(), CellValue::Decimal(rust_decimal::Decimal::new(10000, 2)));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.rows()[0]["fee"], CellValue::Decimal(rust_decimal::Decimal::new(100, 2)));
    }
}
