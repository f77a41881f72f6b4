// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Column Name Normalization
//!
//! Trims, folds full-width spaces to half-width, collapses runs of
//! whitespace, and turns newlines/tabs into spaces (spec.md §4.2 step 7).
//! Empty names become `Unnamed_N`; duplicates after normalization get `_1`,
//! `_2` suffixes and a warning for each rename.

use std::collections::HashMap;

use indexmap::IndexMap;
use workdatahub_domain::entities::{CellValue, Frame};

fn normalize_one(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .map(|c| match c {
            '\u{3000}' | '\n' | '\r' | '\t' => ' ',
            other => other,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renames every row's columns in place according to a name mapping derived
/// from the frame's first-seen column order. Returns the renamed frame and
/// a list of human-readable warnings for any duplicate rename.
pub fn normalize_columns(frame: Frame) -> (Frame, Vec<String>) {
    let original_order = frame.column_names();

    let mut counts: HashMap<String, u32> = HashMap::new();
    let mut mapping: IndexMap<String, String> = IndexMap::new();
    let mut warnings = Vec::new();
    let mut unnamed_counter = 0u32;

    for original in &original_order {
        let mut normalized = normalize_one(original);
        if normalized.is_empty() {
            unnamed_counter += 1;
            normalized = format!("Unnamed_{unnamed_counter}");
        }

        let count = counts.entry(normalized.clone()).or_insert(0);
        *count += 1;
        let final_name = if *count > 1 {
            let suffixed = format!("{normalized}_{}", *count - 1);
            warnings.push(format!(
                "duplicate column name '{normalized}' (from '{original}') renamed to '{suffixed}'"
            ));
            suffixed
        } else {
            normalized
        };
        mapping.insert(original.clone(), final_name);
    }

    let rows = frame
        .into_rows()
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|(k, v): (String, CellValue)| {
                    let renamed = mapping.get(&k).cloned().unwrap_or(k);
                    (renamed, v)
                })
                .collect()
        })
        .collect();

    (Frame::new(rows), warnings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, &str)]) -> IndexMap<String, CellValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), CellValue::Text(v.to_string())))
            .collect()
    }

    #[test]
    fn trims_and_folds_full_width_spaces() {
        let frame = Frame::new(vec![row(&["  计\u{3000}划代码 \n", "b"])]);
        let (normalized, warnings) = normalize_columns(frame);
        assert!(warnings.is_empty());
        assert_eq!(normalized.column_names(), vec!["计 划代码", "b"]);
    }

    #[test]
    fn empty_name_becomes_unnamed() {
        let frame = Frame::new(vec![row(&["", "b"])]);
        let (normalized, _) = normalize_columns(frame);
        assert_eq!(normalized.column_names(), vec!["Unnamed_1", "b"]);
    }

    #[test]
    fn duplicate_names_get_suffixed_with_a_warning() {
        let frame = Frame::new(vec![row(&["a", "a"])]);
        let (normalized, warnings) = normalize_columns(frame);
        assert_eq!(normalized.column_names(), vec!["a", "a_1"]);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn collapses_consecutive_whitespace() {
        let frame = Frame::new(vec![row(&["a   b\t\tc", "x"])]);
        let (normalized, _) = normalize_columns(frame);
        assert_eq!(normalized.column_names(), vec!["a b c", "x"]);
    }
}
