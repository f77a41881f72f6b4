// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Wraps [`crate::validation::gold::validate`] as the pipeline's final
//! gate before a frame is handed to the loader (spec.md §4.4, §4.5). Unlike
//! Bronze validation this step never drops rows — a Gold violation fails the
//! whole step, since by this point every row is supposed to already be
//! individually well-formed and the remaining checks are frame-wide
//! (uniqueness) or a sign of an upstream calculation bug (negative amounts).

use async_trait::async_trait;
use workdatahub_domain::entities::{Frame, PipelineContext, PipelineStep};
use workdatahub_domain::error::WdhError;

use crate::validation::gold;
use crate::validation::schema::GoldSchema;

pub struct GoldProjectionStep {
    pub name: String,
    pub schema: GoldSchema,
}

#[async_trait]
impl PipelineStep for GoldProjectionStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        gold::validate(&frame, &self.schema)?;
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::{CellValue, Row};
    use workdatahub_domain::value_objects::Period;

    #[tokio::test]
    async fn passes_through_a_clean_frame_unchanged() {
        let step = GoldProjectionStep {
            name: "gold_validation".into(),
            schema: GoldSchema::new(vec!["id".into()], vec![], vec!["id".into()]),
        };
        let mut row = Row::new();
        row.insert("id".to_string(), CellValue::Text("1".into()));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn fails_the_step_on_a_violation() {
        let step = GoldProjectionStep {
            name: "gold_validation".into(),
            schema: GoldSchema::new(vec!["id".into()], vec![], vec![]),
        };
        let row = Row::new();
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        assert!(step.execute(Frame::new(vec![row]), &mut ctx).await.is_err());
    }
}
