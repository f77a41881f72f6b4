// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Unknown-Companies Export
//!
//! Writes the names that fell through to Layer 5 during a run, with
//! occurrence counts, so an operator can extend `company_mapping.yml` or
//! wait for the async enrichment job to resolve them (spec.md §4.6, §6).
//! Only produced when at least one temporary id was generated.

use std::collections::HashMap;
use std::path::Path;

use workdatahub_domain::error::WdhError;

fn stage_error(message: impl Into<String>) -> WdhError {
    WdhError::internal(message.into())
}

/// Writes `counts` to `path` as a two-column CSV sorted by descending
/// occurrence count, then name, for a stable diff between runs.
pub fn export_unknown_companies(path: &Path, counts: &HashMap<String, u32>) -> Result<(), WdhError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| stage_error(format!("could not create {}: {e}", parent.display())))?;
    }

    let mut rows: Vec<(&String, &u32)> = counts.iter().collect();
    rows.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    let mut writer = csv::Writer::from_path(path).map_err(|e| stage_error(format!("could not open {}: {e}", path.display())))?;
    writer
        .write_record(["name", "occurrences"])
        .map_err(|e| stage_error(format!("could not write header: {e}")))?;
    for (name, count) in rows {
        writer
            .write_record([name.as_str(), &count.to_string()])
            .map_err(|e| stage_error(format!("could not write row for '{name}': {e}")))?;
    }
    writer.flush().map_err(|e| stage_error(format!("could not flush {}: {e}", path.display())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_by_descending_count_then_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unknown.csv");
        let counts = HashMap::from([
            ("Zebra Co".to_string(), 1u32),
            ("Alpha Co".to_string(), 3u32),
            ("Beta Co".to_string(), 3u32),
        ]);
        export_unknown_companies(&path, &counts).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines[0], "name,occurrences");
        assert_eq!(lines[1], "Alpha Co,3");
        assert_eq!(lines[2], "Beta Co,3");
        assert_eq!(lines[3], "Zebra Co,1");
    }

    #[test]
    fn empty_counts_still_writes_a_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unknown.csv");
        export_unknown_companies(&path, &HashMap::new()).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.trim(), "name,occurrences");
    }
}
