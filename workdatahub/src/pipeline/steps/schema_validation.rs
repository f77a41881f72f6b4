// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Wraps [`crate::validation::bronze::validate_and_coerce`] as a pipeline
//! step: coerces RowIn to RowOut, stashing every rejection on the run
//! context rather than dropping it (spec.md §4.4, §4.5).

use async_trait::async_trait;
use std::sync::Arc;
use workdatahub_domain::entities::{Frame, PipelineContext, PipelineStep};
use workdatahub_domain::error::WdhError;

use crate::cleansing::{CleansingDomainConfig, CleansingRegistry};
use crate::validation::bronze;
use crate::validation::schema::BronzeSchema;

pub struct SchemaValidationStep {
    pub name: String,
    pub schema: BronzeSchema,
    pub registry: Arc<CleansingRegistry>,
    pub field_rules: CleansingDomainConfig,
}

#[async_trait]
impl PipelineStep for SchemaValidationStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let run_id = context.run_id.to_string();
        let (coerced, rejections) = bronze::validate_and_coerce(frame, &self.schema, &self.registry, &self.field_rules, &run_id)?;
        context.push_rejections(rejections);
        Ok(coerced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use workdatahub_domain::entities::{CellValue, Row};
    use workdatahub_domain::value_objects::Period;
    use crate::validation::schema::{FieldKind, FieldSpec};

    #[tokio::test]
    async fn rejections_land_on_the_context_not_the_output_frame() {
        let step = SchemaValidationStep {
            name: "bronze_validation".into(),
            schema: BronzeSchema::new(vec![FieldSpec::required("name", FieldKind::Text)]),
            registry: Arc::new(CleansingRegistry::new()),
            field_rules: IndexMap::new(),
        };
        let mut ok_row = Row::new();
        ok_row.insert("name".to_string(), CellValue::Text("Acme".into()));
        let mut bad_row = Row::new();
        bad_row.insert("name".to_string(), CellValue::Null);

        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![ok_row, bad_row]), &mut ctx).await.unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(ctx.rejections.len(), 1);
    }
}
