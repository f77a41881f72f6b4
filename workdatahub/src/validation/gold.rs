// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Gold Validation
//!
//! The last check before a frame is handed to the loader (spec.md §4.4):
//! required fields carry no nulls, monetary fields carry no negative values,
//! and the composite key is unique. Violations are collected and reported
//! together rather than one at a time, up to `GoldSchema::max_listed_collisions`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use workdatahub_domain::entities::Frame;
use workdatahub_domain::error::{Stage, WdhError};

use super::schema::GoldSchema;

fn key_for(row: &workdatahub_domain::entities::Row, columns: &[String]) -> String {
    columns
        .iter()
        .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
        .collect::<Vec<_>>()
        .join("\u{1f}")
}

/// Validates `frame` against `schema`, returning every violation found
/// (not just the first) as a single [`WdhError::Validation`].
pub fn validate(frame: &Frame, schema: &GoldSchema) -> Result<(), WdhError> {
    let mut violations: Vec<String> = Vec::new();

    for (row_index, row) in frame.rows().iter().enumerate() {
        for field in &schema.required_fields {
            let is_missing = row.get(field).map(|v| v.is_null()).unwrap_or(true);
            if is_missing {
                violations.push(format!("row {row_index}: required field '{field}' is null"));
            }
        }
        for field in &schema.non_negative_fields {
            if let Some(value) = row.get(field).and_then(|v| v.as_decimal()) {
                if value < Decimal::ZERO {
                    violations.push(format!("row {row_index}: monetary field '{field}' is negative ({value})"));
                }
            }
        }
    }

    if !schema.unique_key_columns.is_empty() {
        let mut seen: HashMap<String, Vec<usize>> = HashMap::new();
        for (row_index, row) in frame.rows().iter().enumerate() {
            let key = key_for(row, &schema.unique_key_columns);
            seen.entry(key).or_default().push(row_index);
        }
        for (key, indices) in seen {
            if indices.len() > 1 {
                violations.push(format!(
                    "composite key ({}) = '{key}' is duplicated at rows {indices:?}",
                    schema.unique_key_columns.join(", ")
                ));
            }
        }
    }

    if violations.is_empty() {
        return Ok(());
    }

    let truncated = violations.len() > schema.max_listed_collisions;
    violations.truncate(schema.max_listed_collisions);
    let mut message = format!("Gold validation failed with {} violation(s): {}", violations.len(), violations.join("; "));
    if truncated {
        message.push_str(" (additional violations omitted)");
    }

    Err(WdhError::validation(Stage::GoldValidation, None, message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::{CellValue, Row};

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn passes_a_clean_frame() {
        let frame = Frame::new(vec![row(&[
            ("id", CellValue::Text("1".into())),
            ("amount", CellValue::Decimal(Decimal::new(1000, 2))),
        ])]);
        let schema = GoldSchema::new(vec!["id".into()], vec!["amount".into()], vec!["id".into()]);
        assert!(validate(&frame, &schema).is_ok());
    }

    #[test]
    fn detects_negative_monetary_value() {
        let frame = Frame::new(vec![row(&[("amount", CellValue::Decimal(Decimal::new(-500, 2)))])]);
        let schema = GoldSchema::new(vec![], vec!["amount".into()], vec![]);
        let err = validate(&frame, &schema).unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn detects_duplicate_composite_key() {
        let frame = Frame::new(vec![
            row(&[("plan", CellValue::Text("P1".into())), ("month", CellValue::Text("202501".into()))]),
            row(&[("plan", CellValue::Text("P1".into())), ("month", CellValue::Text("202501".into()))]),
        ]);
        let schema = GoldSchema::new(vec![], vec![], vec!["plan".into(), "month".into()]);
        let err = validate(&frame, &schema).unwrap_err();
        assert!(err.to_string().contains("duplicated"));
    }

    #[test]
    fn detects_required_null_field() {
        let frame = Frame::new(vec![row(&[("id", CellValue::Null)])]);
        let schema = GoldSchema::new(vec!["id".into()], vec![], vec![]);
        let err = validate(&frame, &schema).unwrap_err();
        assert!(err.to_string().contains("is null"));
    }
}
