// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Bronze Validation
//!
//! Coerces a raw, normalized frame (RowIn) into a typed frame (RowOut) per a
//! [`BronzeSchema`] (spec.md §4.4). Cleansing rules run first, field by
//! field, then each cleansed value is coerced to its declared `FieldKind`.
//! A row with any required-field failure is rejected rather than dropped
//! silently; rejections accumulate and the run aborts only if their share of
//! the input exceeds the schema's failure threshold.

use std::str::FromStr;

use chrono::Utc;
use rust_decimal::Decimal;
use workdatahub_domain::entities::{CellValue, Frame, RejectionRecord, Row};
use workdatahub_domain::error::{Stage, WdhError};

use crate::cleansing::{CleansingDomainConfig, CleansingRegistry};

use super::date_parser;
use super::schema::{BronzeSchema, FieldKind};

const STEP_NAME: &str = "bronze_validation";

fn coerce(field_name: &str, kind: FieldKind, value: CellValue) -> Result<CellValue, String> {
    match (kind, value) {
        (_, CellValue::Null) => Ok(CellValue::Null),
        (FieldKind::Text, CellValue::Text(s)) => Ok(CellValue::Text(s)),
        (FieldKind::Text, other) => Ok(CellValue::Text(other.to_string())),
        (FieldKind::Int, CellValue::Int(i)) => Ok(CellValue::Int(i)),
        (FieldKind::Int, CellValue::Text(s)) => s
            .trim()
            .parse::<i64>()
            .map(CellValue::Int)
            .map_err(|_| format!("field '{field_name}': '{s}' is not an integer")),
        (FieldKind::Decimal, CellValue::Decimal(d)) => Ok(CellValue::Decimal(d)),
        (FieldKind::Decimal, CellValue::Int(i)) => Ok(CellValue::Decimal(Decimal::from(i))),
        (FieldKind::Decimal, CellValue::Text(s)) => Decimal::from_str(s.trim())
            .map(CellValue::Decimal)
            .map_err(|_| format!("field '{field_name}': '{s}' is not a decimal")),
        (FieldKind::Date, CellValue::Date(d)) => Ok(CellValue::Date(d)),
        (FieldKind::Date, CellValue::Text(s)) => date_parser::parse(&s)
            .map(CellValue::Date)
            .map_err(|e| e.to_string()),
        (kind, other) => Err(format!("field '{field_name}': cannot coerce {other:?} to {kind:?}")),
    }
}

fn rejection(run_id: &str, row_index: usize, field: Option<String>, reason: String, row: Row) -> RejectionRecord {
    RejectionRecord {
        run_id: run_id.to_string(),
        step_name: STEP_NAME.to_string(),
        row_index,
        field,
        reason,
        rejected_at: Utc::now(),
        row,
    }
}

/// Validates and coerces every row of `frame` against `schema`, applying
/// `field_rules` through `cleansing` first. Returns the surviving rows as a
/// new [`Frame`] plus one [`RejectionRecord`] per row that failed.
pub fn validate_and_coerce(
    frame: Frame,
    schema: &BronzeSchema,
    cleansing: &CleansingRegistry,
    field_rules: &CleansingDomainConfig,
    run_id: &str,
) -> Result<(Frame, Vec<RejectionRecord>), WdhError> {
    let total_rows = frame.len();
    let mut good_rows = Vec::with_capacity(total_rows);
    let mut rejections = Vec::new();

    for (row_index, row) in frame.into_rows().into_iter().enumerate() {
        let mut out_row: Row = Row::new();
        let mut failure: Option<(Option<String>, String)> = None;

        for spec in &schema.fields {
            let raw = row.get(&spec.name).cloned().unwrap_or(CellValue::Null);
            let cleansed = match field_rules.get(&spec.name) {
                Some(rule_names) => match cleansing.apply(&raw, rule_names) {
                    Ok(value) => value,
                    Err(e) => {
                        failure = Some((Some(spec.name.clone()), e.to_string()));
                        break;
                    }
                },
                None => raw,
            };

            if spec.required && cleansed.is_null() {
                failure = Some((Some(spec.name.clone()), format!("field '{}' is required but null", spec.name)));
                break;
            }

            match coerce(&spec.name, spec.kind, cleansed) {
                Ok(value) => {
                    out_row.insert(spec.name.clone(), value);
                }
                Err(reason) => {
                    failure = Some((Some(spec.name.clone()), reason));
                    break;
                }
            }
        }

        match failure {
            Some((field, reason)) => rejections.push(rejection(run_id, row_index, field, reason, row)),
            None => good_rows.push(out_row),
        }
    }

    if total_rows > 0 {
        let ratio = rejections.len() as f64 / total_rows as f64;
        if ratio > schema.failure_threshold {
            return Err(WdhError::validation(
                Stage::BronzeValidation,
                None,
                format!(
                    "{} of {} rows ({:.1}%) failed Bronze validation, exceeding the {:.1}% threshold",
                    rejections.len(),
                    total_rows,
                    ratio * 100.0,
                    schema.failure_threshold * 100.0
                ),
            ));
        }
    }

    Ok((Frame::new(good_rows), rejections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::FieldSpec;
    use indexmap::IndexMap;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn coerces_text_int_and_decimal_fields() {
        let frame = Frame::new(vec![row(&[
            ("name", CellValue::Text("Acme".into())),
            ("count", CellValue::Text("12".into())),
            ("amount", CellValue::Text("1,234.50".into())),
        ])]);
        let schema = BronzeSchema::new(vec![
            FieldSpec::required("name", FieldKind::Text),
            FieldSpec::required("count", FieldKind::Int),
            FieldSpec::required("amount", FieldKind::Decimal),
        ]);
        let registry = CleansingRegistry::new();
        let mut rules: CleansingDomainConfig = IndexMap::new();
        rules.insert("amount".to_string(), vec!["clean_comma_separated_number".to_string()]);

        let (good, rejections) = validate_and_coerce(frame, &schema, &registry, &rules, "run-1").unwrap();
        assert!(rejections.is_empty());
        assert_eq!(good.rows()[0]["amount"], CellValue::Decimal(Decimal::new(123450, 2)));
        assert_eq!(good.rows()[0]["count"], CellValue::Int(12));
    }

    #[test]
    fn required_null_field_is_rejected_not_dropped_silently() {
        let frame = Frame::new(vec![row(&[("name", CellValue::Null)])]);
        let schema = BronzeSchema::new(vec![FieldSpec::required("name", FieldKind::Text)]);
        let registry = CleansingRegistry::new();
        let rules: CleansingDomainConfig = IndexMap::new();

        let (good, rejections) = validate_and_coerce(frame, &schema, &registry, &rules, "run-1").unwrap();
        assert!(good.is_empty());
        assert_eq!(rejections.len(), 1);
        assert_eq!(rejections[0].field.as_deref(), Some("name"));
    }

    #[test]
    fn failure_threshold_aborts_the_run() {
        let frame = Frame::new(vec![
            row(&[("name", CellValue::Null)]),
            row(&[("name", CellValue::Null)]),
            row(&[("name", CellValue::Text("ok".into()))]),
        ]);
        let schema = BronzeSchema::new(vec![FieldSpec::required("name", FieldKind::Text)]).with_failure_threshold(0.10);
        let registry = CleansingRegistry::new();
        let rules: CleansingDomainConfig = IndexMap::new();

        let err = validate_and_coerce(frame, &schema, &registry, &rules, "run-1").unwrap_err();
        assert_eq!(err.category(), "validation");
    }

    #[test]
    fn date_field_parses_through_shared_date_parser() {
        let frame = Frame::new(vec![row(&[("月度", CellValue::Text("202501".into()))])]);
        let schema = BronzeSchema::new(vec![FieldSpec::required("月度", FieldKind::Date)]);
        let registry = CleansingRegistry::new();
        let rules: CleansingDomainConfig = IndexMap::new();

        let (good, rejections) = validate_and_coerce(frame, &schema, &registry, &rules, "run-1").unwrap();
        assert!(rejections.is_empty());
        assert!(good.rows()[0]["月度"].as_date().is_some());
    }
}
