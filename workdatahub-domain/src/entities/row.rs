// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Row / Frame Value Model
//!
//! Because domains are config-driven (spec §3: "RowIn/RowOut: per-domain
//! tagged records"), the shape of a row isn't known to the compiler — it's
//! whatever columns the source workbook has. `Frame` models the Bronze,
//! Silver, and Gold tiers uniformly as an ordered list of `Row`s, each `Row`
//! an order-preserving map from column name to `CellValue`. Typed domain
//! validation (RowIn → RowOut, spec §4.4) is layered on top as a set of
//! per-domain coercion functions rather than per-domain Rust structs, since
//! the set of domains is itself data (`data_sources.yml`), not a compile-time
//! enum.

use std::fmt;

use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One cell's value after Bronze-layer type coercion.
///
/// Monetary columns use `Decimal` rather than `f64` so that repeated
/// `delete_insert` runs over the same input produce byte-identical output
/// (spec §1's bit-identical-parity requirement extends to numeric formatting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Date(NaiveDate),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Decimal(d) => Some(*d),
            CellValue::Int(i) => Some(Decimal::from(*i)),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            CellValue::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, ""),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Decimal(d) => write!(f, "{}", d),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A single record. Column order is preserved for CSV round-tripping and for
/// stable diagnostics (rejection exports list fields in source order).
pub type Row = IndexMap<String, CellValue>;

/// An ordered collection of rows sharing a column set. Frames are passed
/// between pipeline steps by value; each step receives the current frame and
/// returns the next one (spec §4.5 — "the prior frame is not mutated").
#[derive(Debug, Clone, Default)]
pub struct Frame {
    rows: Vec<Row>,
}

impl Frame {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names observed across the frame, in first-seen order.
    pub fn column_names(&self) -> Vec<String> {
        let mut seen = IndexMap::new();
        for row in &self.rows {
            for key in row.keys() {
                seen.entry(key.clone()).or_insert(());
            }
        }
        seen.into_keys().collect()
    }
}

impl IntoIterator for Frame {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

impl FromIterator<Row> for Frame {
    fn from_iter<T: IntoIterator<Item = Row>>(iter: T) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}
