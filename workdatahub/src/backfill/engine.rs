// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Foreign-Key Backfill Engine
//!
//! Before a Gold frame is loaded, every parent row it references must
//! exist. For each [`ForeignKeyRule`] (already topologically ordered by
//! `AppConfig::get_foreign_keys`), this groups the frame by the rule's
//! natural key, computes any configured aggregations for rows that need a
//! new parent, and inserts only the parent rows that don't already exist —
//! existing parent rows are never updated (spec.md §4.7).

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use workdatahub_domain::entities::{AggregationSpec, AggregationType, CellValue, ForeignKeyRule, Frame, Row};
use workdatahub_domain::error::WdhError;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct BackfillRuleResult {
    pub rule_name: String,
    pub considered: usize,
    pub inserted: usize,
}

fn is_blank(value: &CellValue) -> bool {
    match value {
        CellValue::Null => true,
        CellValue::Text(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn key_for(values: &[CellValue]) -> String {
    values.iter().map(CellValue::to_string).collect::<Vec<_>>().join("\u{1f}")
}

/// The candidate natural-key projection for one row, or `None` if
/// `skip_blank_values` is set and any component is blank.
fn candidate_key(row: &Row, rule: &ForeignKeyRule) -> Option<Vec<CellValue>> {
    let mut key = Vec::with_capacity(rule.natural_key_columns.len());
    for column in &rule.natural_key_columns {
        let value = row.get(&column.child_column).cloned().unwrap_or(CellValue::Null);
        if rule.skip_blank_values && is_blank(&value) {
            return None;
        }
        key.push(value);
    }
    Some(key)
}

/// Orders two cells for `max_by`: numeric comparison when both sides parse
/// as a decimal, date comparison when both parse as a date, otherwise a
/// plain string comparison.
fn compare_cells(a: &CellValue, b: &CellValue) -> std::cmp::Ordering {
    if let (Some(a), Some(b)) = (a.as_decimal(), b.as_decimal()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_date(), b.as_date()) {
        return a.cmp(&b);
    }
    a.to_string().cmp(&b.to_string())
}

fn aggregate(spec: &AggregationSpec, group: &[&Row]) -> CellValue {
    match spec.aggregation {
        AggregationType::First => group
            .first()
            .and_then(|row| row.get(&spec.source_column))
            .cloned()
            .unwrap_or(CellValue::Null),
        AggregationType::MaxBy => {
            let order_by = spec.order_by.as_deref().unwrap_or(&spec.source_column);
            group
                .iter()
                .max_by(|a, b| {
                    let av = a.get(order_by).cloned().unwrap_or(CellValue::Null);
                    let bv = b.get(order_by).cloned().unwrap_or(CellValue::Null);
                    compare_cells(&av, &bv)
                })
                .and_then(|row| row.get(&spec.source_column))
                .cloned()
                .unwrap_or(CellValue::Null)
        }
        AggregationType::ConcatDistinct => {
            let mut seen = HashSet::new();
            let mut values: Vec<String> = Vec::new();
            for row in group {
                if let Some(value) = row.get(&spec.source_column) {
                    if is_blank(value) {
                        continue;
                    }
                    let text = value.to_string();
                    if seen.insert(text.clone()) {
                        values.push(text);
                    }
                }
            }
            if spec.sort {
                values.sort();
            }
            let separator = spec.separator.as_deref().unwrap_or(",");
            CellValue::Text(values.join(separator))
        }
    }
}

fn push_cell_bind<'a>(builder: &mut QueryBuilder<'a, Postgres>, value: CellValue) {
    match value {
        CellValue::Null => {
            builder.push_bind(Option::<String>::None);
        }
        CellValue::Bool(b) => {
            builder.push_bind(b);
        }
        CellValue::Int(i) => {
            builder.push_bind(i);
        }
        CellValue::Decimal(d) => {
            builder.push_bind(d);
        }
        CellValue::Text(s) => {
            builder.push_bind(s);
        }
        CellValue::Date(d) => {
            builder.push_bind(d);
        }
    }
}

async fn existing_keys(
    pool: &PgPool,
    rule: &ForeignKeyRule,
) -> Result<HashSet<String>, WdhError> {
    let columns: Vec<&str> = rule
        .natural_key_columns
        .iter()
        .map(|c| c.parent_natural_key_column.as_str())
        .collect();

    let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
    builder.push(columns.join(", "));
    builder.push(" FROM ");
    builder.push(rule.qualified_parent_table());

    let rows = builder
        .build()
        .fetch_all(pool)
        .await
        .map_err(|e| WdhError::Backfill {
            rule_name: rule.name.clone(),
            message: format!("could not read existing parent keys: {e}"),
        })?;

    let mut keys = HashSet::new();
    for row in rows {
        use sqlx::{Column, Row as SqlxRow, TypeInfo, ValueRef};
        let mut parts = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            let raw = row.try_get_raw(index).map_err(|e| WdhError::Backfill {
                rule_name: rule.name.clone(),
                message: format!("could not read column {}: {e}", columns[index]),
            })?;
            let text = if raw.is_null() {
                String::new()
            } else {
                match row.column(index).type_info().name() {
                    "INT8" | "INT4" | "INT2" => row
                        .try_get::<i64, _>(index)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    "NUMERIC" => row
                        .try_get::<Decimal, _>(index)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    "DATE" => row
                        .try_get::<chrono::NaiveDate, _>(index)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    "BOOL" => row
                        .try_get::<bool, _>(index)
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                    _ => row.try_get::<String, _>(index).unwrap_or_default(),
                }
            };
            parts.push(text);
        }
        keys.insert(parts.join("\u{1f}"));
    }
    Ok(keys)
}

async fn insert_missing(
    pool: &PgPool,
    rule: &ForeignKeyRule,
    missing: Vec<(Vec<CellValue>, Vec<(String, CellValue)>)>,
) -> Result<usize, WdhError> {
    if missing.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await.map_err(|e| WdhError::Backfill {
        rule_name: rule.name.clone(),
        message: format!("could not open transaction: {e}"),
    })?;

    let key_columns: Vec<&str> = rule
        .natural_key_columns
        .iter()
        .map(|c| c.parent_natural_key_column.as_str())
        .collect();

    for (key_values, aggregated) in &missing {
        let mut all_columns: Vec<String> = key_columns.iter().map(|s| s.to_string()).collect();
        all_columns.extend(aggregated.iter().map(|(c, _)| c.clone()));

        let mut builder = QueryBuilder::<Postgres>::new("INSERT INTO ");
        builder.push(rule.qualified_parent_table());
        builder.push(" (");
        builder.push(all_columns.join(", "));
        builder.push(") VALUES (");

        let values = key_values.iter().cloned().chain(aggregated.iter().map(|(_, v)| v.clone()));
        for (index, value) in values.enumerate() {
            if index > 0 {
                builder.push(", ");
            }
            push_cell_bind(&mut builder, value);
        }
        builder.push(")");

        builder.build().execute(&mut *tx).await.map_err(|e| WdhError::Backfill {
            rule_name: rule.name.clone(),
            message: format!("insert failed: {e}"),
        })?;
    }

    tx.commit().await.map_err(|e| WdhError::Backfill {
        rule_name: rule.name.clone(),
        message: format!("could not commit transaction: {e}"),
    })?;

    Ok(missing.len())
}

/// Runs one rule's backfill: groups `frame` by the rule's natural key,
/// computes aggregations for candidate parent rows, and inserts those that
/// don't already exist. Each rule runs in its own transaction.
pub async fn run_rule(pool: &PgPool, frame: &Frame, rule: &ForeignKeyRule) -> Result<BackfillRuleResult, WdhError> {
    let mut groups: HashMap<String, (Vec<CellValue>, Vec<&Row>)> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for row in frame.rows() {
        let Some(key_values) = candidate_key(row, rule) else {
            continue;
        };
        let key = key_for(&key_values);
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_insert_with(|| (key_values, Vec::new())).1.push(row);
    }

    let considered = order.len();
    let existing = existing_keys(pool, rule).await?;

    let mut missing = Vec::new();
    for key in &order {
        if existing.contains(key) {
            continue;
        }
        let (key_values, rows) = &groups[key];
        let aggregated = rule
            .aggregations
            .iter()
            .map(|spec| (spec.target_column.clone(), aggregate(spec, rows)))
            .collect();
        missing.push((key_values.clone(), aggregated));
    }

    let inserted = insert_missing(pool, rule, missing).await?;

    Ok(BackfillRuleResult {
        rule_name: rule.name.clone(),
        considered,
        inserted,
    })
}

/// Runs every rule in `rules`, in the order given (the config store
/// presents them already sorted so each rule follows its dependencies). The
/// first rule to fail aborts the remaining rules and the caller's run.
pub async fn run_all(pool: &PgPool, frame: &Frame, rules: &[ForeignKeyRule]) -> Result<Vec<BackfillRuleResult>, WdhError> {
    let mut results = Vec::with_capacity(rules.len());
    for rule in rules {
        results.push(run_rule(pool, frame, rule).await?);
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::BackfillColumn;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    fn sample_rule() -> ForeignKeyRule {
        ForeignKeyRule {
            name: "portfolio_parent".into(),
            child_table: "annuity_performance".into(),
            parent_table: "portfolio".into(),
            parent_schema: "public".into(),
            natural_key_columns: vec![BackfillColumn {
                child_column: "计划代码".into(),
                parent_natural_key_column: "plan_code".into(),
            }],
            parent_id_column: "id".into(),
            child_fk_column: "portfolio_id".into(),
            aggregations: vec![AggregationSpec {
                target_column: "plan_name".into(),
                source_column: "计划名称".into(),
                aggregation: AggregationType::First,
                order_by: None,
                separator: None,
                sort: false,
            }],
            depends_on: vec![],
            skip_blank_values: true,
        }
    }

    #[test]
    fn candidate_key_skips_blank_when_configured() {
        let rule = sample_rule();
        let blank_row = row(&[("计划代码", CellValue::Text("  ".into()))]);
        assert!(candidate_key(&blank_row, &rule).is_none());

        let present_row = row(&[("计划代码", CellValue::Text("P1".into()))]);
        assert_eq!(candidate_key(&present_row, &rule), Some(vec![CellValue::Text("P1".into())]));
    }

    #[test]
    fn first_aggregation_takes_the_first_rows_value() {
        let spec = AggregationSpec {
            target_column: "plan_name".into(),
            source_column: "计划名称".into(),
            aggregation: AggregationType::First,
            order_by: None,
            separator: None,
            sort: false,
        };
        let r1 = row(&[("计划名称", CellValue::Text("Alpha".into()))]);
        let r2 = row(&[("计划名称", CellValue::Text("Beta".into()))]);
        let group = vec![&r1, &r2];
        assert_eq!(aggregate(&spec, &group), CellValue::Text("Alpha".into()));
    }

    #[test]
    fn max_by_aggregation_picks_the_row_with_the_highest_order_column() {
        let spec = AggregationSpec {
            target_column: "latest_scale".into(),
            source_column: "规模".into(),
            aggregation: AggregationType::MaxBy,
            order_by: Some("月度".into()),
            separator: None,
            sort: false,
        };
        let r1 = row(&[
            ("月度", CellValue::Text("202501".into())),
            ("规模", CellValue::Decimal(Decimal::new(100, 0))),
        ]);
        let r2 = row(&[
            ("月度", CellValue::Text("202502".into())),
            ("规模", CellValue::Decimal(Decimal::new(200, 0))),
        ]);
        let group = vec![&r1, &r2];
        assert_eq!(aggregate(&spec, &group), CellValue::Decimal(Decimal::new(200, 0)));
    }

    #[test]
    fn concat_distinct_joins_unique_values_in_first_seen_order() {
        let spec = AggregationSpec {
            target_column: "codes".into(),
            source_column: "code".into(),
            aggregation: AggregationType::ConcatDistinct,
            order_by: None,
            separator: Some("|".into()),
            sort: false,
        };
        let r1 = row(&[("code", CellValue::Text("B".into()))]);
        let r2 = row(&[("code", CellValue::Text("A".into()))]);
        let r3 = row(&[("code", CellValue::Text("B".into()))]);
        let group = vec![&r1, &r2, &r3];
        assert_eq!(aggregate(&spec, &group), CellValue::Text("B|A".into()));
    }

    #[test]
    fn concat_distinct_sorts_when_requested() {
        let spec = AggregationSpec {
            target_column: "codes".into(),
            source_column: "code".into(),
            aggregation: AggregationType::ConcatDistinct,
            order_by: None,
            separator: Some(",".into()),
            sort: true,
        };
        let r1 = row(&[("code", CellValue::Text("B".into()))]);
        let r2 = row(&[("code", CellValue::Text("A".into()))]);
        let group = vec![&r1, &r2];
        assert_eq!(aggregate(&spec, &group), CellValue::Text("A,B".into()));
    }
}
