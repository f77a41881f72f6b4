// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Applies a domain's ordered per-field cleansing rule lists to every row,
//! via [`CleansingRegistry`] (spec.md §4.3, §4.5).

use std::sync::Arc;

use async_trait::async_trait;
use workdatahub_domain::entities::{Frame, PipelineContext, PipelineStep};
use workdatahub_domain::error::WdhError;

use crate::cleansing::{CleansingDomainConfig, CleansingRegistry};

pub struct CleansingStep {
    pub name: String,
    pub registry: Arc<CleansingRegistry>,
    pub field_rules: CleansingDomainConfig,
}

#[async_trait]
impl PipelineStep for CleansingStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let mut rows = Vec::with_capacity(frame.len());
        for row in frame.into_rows() {
            let mut out = row.clone();
            for (field, rule_names) in &self.field_rules {
                if let Some(value) = row.get(field) {
                    let cleansed = self.registry.apply(value, rule_names)?;
                    out.insert(field.clone(), cleansed);
                }
            }
            rows.push(out);
        }
        Ok(Frame::new(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use workdatahub_domain::entities::{CellValue, Row};
    use workdatahub_domain::value_objects::Period;

    #[tokio::test]
    async fn applies_configured_rules_per_field() {
        let mut rules: CleansingDomainConfig = IndexMap::new();
        rules.insert("name".to_string(), vec!["trim_whitespace".to_string(), "normalize_company_name".to_string()]);

        let step = CleansingStep {
            name: "cleanse".into(),
            registry: Arc::new(CleansingRegistry::new()),
            field_rules: rules,
        };

        let mut row = Row::new();
        row.insert("name".to_string(), CellValue::Text("  Acme 有限公司 ".into()));
        let mut ctx = PipelineContext::new("d", Period::new(2025, 1).unwrap());
        let result = step.execute(Frame::new(vec![row]), &mut ctx).await.unwrap();
        assert_eq!(result.rows()[0]["name"], CellValue::Text("Acme".into()));
    }
}
