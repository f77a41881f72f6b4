// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Transactional Batch Writer
//!
//! The part of the loader that actually touches the database (spec.md
//! §4.8): one transaction per run, batched parameterized inserts, and a
//! mode-specific reconciliation strategy (`append`/`upsert`/`delete_insert`).
//! A transient failure rolls the whole transaction back and the caller
//! retries the run from scratch, since a half-applied batch inside an
//! aborted Postgres transaction can't be resumed mid-statement.

use std::time::Instant;

use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use workdatahub_domain::entities::{CellValue, DomainConfig, Frame, LoadMode, LoadResult, Row};
use workdatahub_domain::error::WdhError;

use super::introspection::{introspect_columns, log_dropped_columns, project_frame};
use crate::pipeline::retry;

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

fn chunks(rows: Vec<Row>, batch_size: usize) -> Vec<Vec<Row>> {
    let mut batches = Vec::new();
    let mut current = Vec::with_capacity(batch_size);
    for row in rows {
        current.push(row);
        if current.len() == batch_size {
            batches.push(std::mem::replace(&mut current, Vec::with_capacity(batch_size)));
        }
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

async fn insert_append(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    columns: &[String],
    batch: &[Row],
) -> Result<usize, WdhError> {
    if batch.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {table} ("));
    builder.push(columns.join(", "));
    builder.push(") ");
    builder.push_values(batch, |mut b, row| {
        for column in columns {
            push_cell_bind(&mut b, row.get(column).cloned().unwrap_or(CellValue::Null));
        }
    });

    let result = builder
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| WdhError::Load { message: format!("insert into {table} failed: {e}") })?;
    Ok(result.rows_affected() as usize)
}

/// `ON CONFLICT (pk) DO UPDATE`, reporting the insert/update split via the
/// classic `xmax = 0` trick: a row whose `xmax` is zero was just inserted by
/// this statement, not updated from an existing tuple.
async fn upsert_batch(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    columns: &[String],
    primary_key: &[String],
    batch: &[Row],
) -> Result<(usize, usize), WdhError> {
    if batch.is_empty() {
        return Ok((0, 0));
    }

    let non_key: Vec<&String> = columns.iter().filter(|c| !primary_key.contains(c)).collect();

    let mut builder = QueryBuilder::<Postgres>::new(format!("INSERT INTO {table} ("));
    builder.push(columns.join(", "));
    builder.push(") ");
    builder.push_values(batch, |mut b, row| {
        for column in columns {
            push_cell_bind(&mut b, row.get(column).cloned().unwrap_or(CellValue::Null));
        }
    });
    builder.push(" ON CONFLICT (");
    builder.push(primary_key.join(", "));
    builder.push(") DO UPDATE SET ");
    if non_key.is_empty() {
        // Every column is part of the key; a harmless self-assignment keeps
        // the statement valid and RETURNING still fires for matched rows.
        builder.push(format!("{} = EXCLUDED.{}", primary_key[0], primary_key[0]));
    } else {
        let assignments: Vec<String> = non_key.iter().map(|c| format!("{c} = EXCLUDED.{c}")).collect();
        builder.push(assignments.join(", "));
    }
    builder.push(" RETURNING (xmax = 0) AS inserted");

    let rows: Vec<(bool,)> = builder
        .build_query_as()
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| WdhError::Load { message: format!("upsert into {table} failed: {e}") })?;

    let inserted = rows.iter().filter(|(is_new,)| *is_new).count();
    let updated = rows.len() - inserted;
    Ok((inserted, updated))
}

/// Deletes every row in `table` matching one of the distinct
/// `delete_key_columns` tuples present in `frame`, returning the number of
/// rows removed. Re-running the same month is idempotent because this scope
/// is always deleted before its replacement rows are inserted (spec.md §4.8).
async fn delete_scope(
    tx: &mut Transaction<'_, Postgres>,
    table: &str,
    delete_key_columns: &[String],
    frame: &Frame,
) -> Result<usize, WdhError> {
    let mut seen = std::collections::HashSet::new();
    let mut tuples: Vec<Vec<CellValue>> = Vec::new();
    for row in frame.rows() {
        let tuple: Vec<CellValue> = delete_key_columns.iter().map(|c| row.get(c).cloned().unwrap_or(CellValue::Null)).collect();
        let key = tuple.iter().map(CellValue::to_string).collect::<Vec<_>>().join("\u{1f}");
        if seen.insert(key) {
            tuples.push(tuple);
        }
    }
    if tuples.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(format!("DELETE FROM {table} WHERE ("));
    builder.push(delete_key_columns.join(", "));
    builder.push(") IN (");
    builder.push_tuples(tuples, |mut b, tuple| {
        for value in tuple {
            push_cell_bind(&mut b, value);
        }
    });
    builder.push(")");

    let result = builder
        .build()
        .execute(&mut **tx)
        .await
        .map_err(|e| WdhError::Load { message: format!("delete scope on {table} failed: {e}") })?;
    Ok(result.rows_affected() as usize)
}

async fn execute_once(
    pool: &PgPool,
    frame: Frame,
    domain: &DomainConfig,
    mode: LoadMode,
    batch_size: usize,
    columns: &[String],
) -> Result<LoadResult, WdhError> {
    let table = domain.qualified_table();
    let mut tx = pool.begin().await.map_err(|e| WdhError::Load { message: format!("could not open transaction: {e}") })?;

    let mut rows_deleted = 0;
    if mode == LoadMode::DeleteInsert {
        rows_deleted = delete_scope(&mut tx, &table, &domain.composite_delete_key_columns, &frame).await?;
    }

    let batches = chunks(frame.into_rows(), batch_size.max(1));
    let mut rows_inserted = 0;
    let mut rows_updated = 0;
    for batch in &batches {
        match mode {
            LoadMode::Append | LoadMode::DeleteInsert => {
                rows_inserted += insert_append(&mut tx, &table, columns, batch).await?;
            }
            LoadMode::Upsert => {
                let (inserted, updated) = upsert_batch(&mut tx, &table, columns, &domain.primary_key_columns, batch).await?;
                rows_inserted += inserted;
                rows_updated += updated;
            }
        }
    }

    tx.commit().await.map_err(|e| WdhError::Load { message: format!("could not commit transaction: {e}") })?;

    Ok(LoadResult {
        table,
        rows_inserted,
        rows_updated,
        rows_deleted,
        rows_skipped: 0,
        batches_executed: batches.len(),
        duration_ms: 0,
    })
}

/// Writes `frame` to `domain`'s table under `mode`, in batches of
/// `batch_size` rows, inside one transaction. Retries the whole operation on
/// a classified transient failure (spec.md §4.8, §7); never called when the
/// run is `plan_only` (see [`super::plan`]).
pub async fn execute(pool: &PgPool, frame: Frame, domain: &DomainConfig, mode: LoadMode, batch_size: usize) -> Result<LoadResult, WdhError> {
    let started = Instant::now();
    let live_columns = introspect_columns(pool, &domain.schema_name, &domain.table_name).await?;
    let (projected, dropped) = project_frame(frame, &live_columns);
    log_dropped_columns(&domain.qualified_table(), &dropped);

    let mut attempt = 1u32;
    loop {
        match execute_once(pool, projected.clone(), domain, mode, batch_size, &live_columns).await {
            Ok(mut result) => {
                result.duration_ms = started.elapsed().as_millis() as u64;
                return Ok(result);
            }
            Err(err) => match retry::classify(&err) {
                Some(tier) if attempt < tier.max_attempts() => {
                    tracing::warn!(attempt, tier = tier.name(), error = %err, "transient load failure, retrying");
                    tokio::time::sleep(tier.backoff(attempt)).await;
                    attempt += 1;
                }
                _ => return Err(err),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use workdatahub_domain::entities::CellValue;

    fn row(pairs: &[(&str, CellValue)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn chunks_splits_rows_into_batches_of_the_requested_size() {
        let rows = vec![row(&[("id", CellValue::Int(1))]); 7];
        let batches = chunks(rows, 3);
        assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![3, 3, 1]);
    }

    #[test]
    fn chunks_of_an_empty_input_is_empty() {
        assert!(chunks(Vec::new(), 100).is_empty());
    }
}
