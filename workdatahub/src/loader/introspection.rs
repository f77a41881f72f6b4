// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Schema Introspection & Projection
//!
//! Reads a target table's live column set from `information_schema.columns`
//! once per run, then narrows a frame to that set before any write happens
//! (spec.md §4.8) — a schema drift in the warehouse never surfaces as a
//! `sqlx` column-mismatch panic, only as a logged projection.

use std::collections::HashSet;

use sqlx::PgPool;
use workdatahub_domain::entities::{Frame, Row};
use workdatahub_domain::error::WdhError;

/// Columns a dropped-column warning starts listing individually above this
/// count (spec.md §4.8: "log a warning enumerating removed columns when
/// more than five are dropped").
const WARN_LIST_THRESHOLD: usize = 5;

/// Columns returned here are exactly the ones the loader may name in an
/// `INSERT`/`UPSERT` statement: identity and generated columns are excluded
/// at the query level, not filtered out afterward, since spec.md §6 states
/// the synthetic `id` column "must not be supplied on insert" — naming it at
/// all (even binding `NULL`) raises Postgres error `428C9` without
/// `OVERRIDING SYSTEM VALUE`.
pub async fn introspect_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<String>, WdhError> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT column_name FROM information_schema.columns \
         WHERE table_schema = $1 AND table_name = $2 \
           AND is_identity = 'NO' AND is_generated = 'NEVER' \
         ORDER BY ordinal_position",
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|e| WdhError::Load {
        message: format!("could not introspect {schema}.{table}: {e}"),
    })?;

    if rows.is_empty() {
        return Err(WdhError::Load {
            message: format!("table {schema}.{table} has no columns (does it exist?)"),
        });
    }

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Narrows `frame` to `columns`, returning the projected frame plus the list
/// of columns the frame carried but `columns` does not.
pub fn project_frame(frame: Frame, columns: &[String]) -> (Frame, Vec<String>) {
    let allowed: HashSet<&str> = columns.iter().map(String::as_str).collect();
    let dropped: Vec<String> = frame
        .column_names()
        .into_iter()
        .filter(|name| !allowed.contains(name.as_str()))
        .collect();

    let projected: Vec<Row> = frame
        .into_rows()
        .into_iter()
        .map(|row| row.into_iter().filter(|(key, _)| allowed.contains(key.as_str())).collect())
        .collect();

    (Frame::new(projected), dropped)
}

pub fn log_dropped_columns(table: &str, dropped: &[String]) {
    if dropped.is_empty() {
        return;
    }
    if dropped.len() > WARN_LIST_THRESHOLD {
        tracing::warn!(table, count = dropped.len(), columns = ?dropped, "projecting away columns not present in the target table");
    } else {
        tracing::debug!(table, columns = ?dropped, "projecting away columns not present in the target table");
    }
}
