// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Looks a field's raw text value up in a fixed dictionary (e.g. a plan-type
//! code to its display label) and replaces it with the mapped value.
//! Unmapped values fall through to `default`, or are left untouched when no
//! default is configured (spec.md §4.5 standard step kinds).

use async_trait::async_trait;
use indexmap::IndexMap;
use workdatahub_domain::entities::{CellValue, Frame, PipelineContext, PipelineStep, Row};
use workdatahub_domain::error::WdhError;

pub struct MappingStep {
    pub name: String,
    pub field: String,
    pub mapping: IndexMap<String, CellValue>,
    pub default: Option<CellValue>,
}

fn map_row(row: &Row, field: &str, mapping: &IndexMap<String, CellValue>, default: &Option<CellValue>) -> Row {
    let mut out = row.clone();
    if let Some(raw) = row.get(field).and_then(CellValue::as_text) {
        if let Some(mapped) = mapping.get(raw) {
            out.insert(field.to_string(), mapped.clone());
        } else if let Some(fallback) = default {
            out.insert(field.to_string(), fallback.clone());
        }
    }
    out
}

#[async_trait]
impl PipelineStep for MappingStep {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, frame: Frame, _context: &mut PipelineContext) -> Result<Frame, WdhError> {
        let rows = frame
            .into_rows()
            .into_iter()
            .map(|row| map_row(&row, &self.field, &self.mapping, &self.default))
            .collect();
        Ok(Frame::new(rows))
    }
}
