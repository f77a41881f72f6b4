// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Runs a single regex find-and-replace over one field's text value across
//! every row. Unlike [`super::mapping::MappingStep`], the matcher isn't a
//! fixed dictionary lookup — it's used for free-form cleanup such as
//! stripping a recurring footnote marker (spec.md §4.5).

use async_trait::async_trait;
use regex::Regex;
use workdatahub_domain::entities::{CellValue, Frame, PipelineContext, PipelineStep};
use workdatahub_domain::error::WdhError;

pub struct ReplacementStep {
    pub name: String,
    pub field: String,
    pub pattern: Regex,
    pub replacement: String,
}

#[async_trait]
impl PipelineStep for ReplacementStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let rows = frame
            .into_rows()
            .into_iter()
            .map(|mut row| {
                if let Some(CellValue::Text(s)) = row.get(&self.field) {
                    let replaced = self.pattern.replace_all(s, self.replacement.as_str()).into_owned();
                    row.insert(self.field.clone(), CellValue::Text(replaced));
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
    use workdatahub_domain::entities::Row;
    use workdatahub_domain::value_objects::Period;

    #[tokio::test]
    async fn replaces_matches_within_a_field() {
        let step = ReplacementStep {
            name: "strip_footnote".into(),
            field: "name".into(),
            pattern: Regex::new(r"\*\d+$").unwrap(),
            replacement: String::new(),
        };
        let mut row = Row::new();
        row.insert("name".to_string(), CellValue::Text("Acme Corp*1".into()));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.rows()[0]["name"], CellValue::Text("Acme Corp".into()));
    }
}
