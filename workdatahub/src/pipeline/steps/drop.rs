// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Drops columns that a domain reads from its source but never loads to the
//! warehouse (spec.md §4.5) — staging/helper columns, merged-cell artifacts,
//! and the like.

use async_trait::async_trait;
use workdatahub_domain::entities::{Frame, PipelineContext, PipelineStep};
use workdatahub_domain::error::WdhError;

pub struct DropStep {
    pub name: String,
    pub columns: Vec<String>,
}

#[async_trait]
impl PipelineStep for DropStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let rows = frame
            .into_rows()
            .into_iter()
            .map(|mut row| {
                for column in &self.columns {
                    row.shift_remove(column);
                }
                row
            })
            .collect();
        Ok(Frame::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::{CellValue, Row};
    use workdatahub_domain::value_objects::Period;

    #[tokio::test]
    async fn drops_the_configured_columns() {
        let step = DropStep {
            name: "drop_staging_columns".into(),
            columns: vec!["_raw_row".into()],
        };
        let mut row = Row::new();
        row.insert("keep".to_string(), CellValue::Text("a".into()));
        row.insert("_raw_row".to_string(), CellValue::Text("b".into()));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.rows()[0].keys().collect::<Vec<_>>(), vec!["keep"]);
    }
}
