// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Frame Reading
//!
//! Reads the requested sheet of an Excel workbook (`calamine`) or a CSV file
//! (`csv`, UTF-8 with optional BOM) into a raw [`Frame`] (spec.md §4.2 steps
//! 6-7, before column-name normalization). Empty rows are skipped.

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use indexmap::IndexMap;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use workdatahub_domain::entities::{CellValue, Frame, Row};
use workdatahub_domain::entities::SheetSelector;
use workdatahub_domain::error::{Stage, WdhError};

use super::stage_error;

pub fn read_frame(domain: &str, path: &Path, sheet_selector: &SheetSelector) -> Result<Frame, WdhError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => read_csv(domain, path),
        "xlsx" | "xls" | "xlsm" => read_excel(domain, path, sheet_selector),
        other => Err(stage_error(
            domain,
            Stage::SheetReading,
            format!("unsupported file extension '{other}' for {}", path.display()),
        )),
    }
}

fn cell_from_calamine(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Null,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => match Decimal::from_f64(*f) {
            Some(d) => CellValue::Decimal(d),
            None => CellValue::Text(f.to_string()),
        },
        Data::Bool(b) => CellValue::Bool(*b),
        // Dates/durations are deferred to the validation engine's date
        // parser, which already accepts native date values alongside
        // several string formats (spec.md §4.4).
        other => {
            let text = other.to_string();
            if text.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(text)
            }
        }
    }
}

fn row_is_empty(row: &Row) -> bool {
    row.values().all(CellValue::is_null)
}

fn read_excel(domain: &str, path: &Path, sheet_selector: &SheetSelector) -> Result<Frame, WdhError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| stage_error(domain, Stage::SheetReading, format!("could not open workbook: {e}")))?;

    let sheet_name = match sheet_selector {
        SheetSelector::Name(name) => name.clone(),
        SheetSelector::Index(index) => {
            let names = workbook.sheet_names();
            names
                .get(*index)
                .cloned()
                .ok_or_else(|| stage_error(domain, Stage::SheetReading, format!("no sheet at index {index}")))?
        }
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| stage_error(domain, Stage::SheetReading, format!("could not read sheet '{sheet_name}': {e}")))?;

    let mut rows_iter = range.rows();
    let header_cells = rows_iter.next().ok_or_else(|| {
        stage_error(domain, Stage::SheetReading, format!("sheet '{sheet_name}' has no header row"))
    })?;
    let headers: Vec<String> = header_cells.iter().map(|c| c.to_string()).collect();

    let mut rows = Vec::new();
    for record in rows_iter {
        let mut row: Row = IndexMap::with_capacity(headers.len());
        for (header, cell) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), cell_from_calamine(cell));
        }
        if !row_is_empty(&row) {
            rows.push(row);
        }
    }
    Ok(Frame::new(rows))
}

fn read_csv(domain: &str, path: &Path) -> Result<Frame, WdhError> {
    let bytes = std::fs::read(path)
        .map_err(|e| stage_error(domain, Stage::SheetReading, format!("could not read {}: {e}", path.display())))?;
    let without_bom = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(&bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(without_bom));

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| stage_error(domain, Stage::SheetReading, format!("could not read CSV headers: {e}")))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| stage_error(domain, Stage::SheetReading, format!("malformed CSV row: {e}")))?;
        let mut row: Row = IndexMap::with_capacity(headers.len());
        for (header, value) in headers.iter().zip(record.iter()) {
            let cell = if value.trim().is_empty() {
                CellValue::Null
            } else {
                CellValue::Text(value.to_string())
            };
            row.insert(header.clone(), cell);
        }
        if !row_is_empty(&row) {
            rows.push(row);
        }
    }
    Ok(Frame::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_csv_and_skips_blank_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        std::fs::write(&path, "a,b\n1,2\n,\n3,4\n").unwrap();

        let frame = read_frame("d", &path, &SheetSelector::Name("unused".into())).unwrap();
        assert_eq!(frame.len(), 2);
    }

    #[test]
    fn strips_utf8_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"a,b\n1,2\n");
        std::fs::write(&path, bytes).unwrap();

        let frame = read_frame("d", &path, &SheetSelector::Name("unused".into())).unwrap();
        assert_eq!(frame.len(), 1);
        assert_eq!(frame.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn unsupported_extension_is_a_discovery_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        std::fs::write(&path, "irrelevant").unwrap();
        let err = read_frame("d", &path, &SheetSelector::Name("unused".into())).unwrap_err();
        assert_eq!(err.category(), "discovery");
    }
}
