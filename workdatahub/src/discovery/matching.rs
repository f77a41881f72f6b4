// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Include/Exclude File Matching
//!
//! Within a chosen version directory, lists files and keeps only those
//! matching at least one include pattern and no exclude pattern (spec.md
//! §4.2 step 4). Exactly one candidate must remain (step 5).

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use workdatahub_domain::error::{Stage, WdhError};

use super::stage_error;

fn build_set(domain: &str, patterns: &[String]) -> Result<GlobSet, WdhError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| stage_error(domain, Stage::FileMatching, format!("invalid glob pattern '{pattern}': {e}")))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| stage_error(domain, Stage::FileMatching, format!("could not build glob set: {e}")))
}

pub fn select_candidate(
    domain: &str,
    dir: &Path,
    include_patterns: &[String],
    exclude_patterns: &[String],
) -> Result<PathBuf, WdhError> {
    let includes = build_set(domain, include_patterns)?;
    let excludes = build_set(domain, exclude_patterns)?;

    let entries = std::fs::read_dir(dir)
        .map_err(|e| stage_error(domain, Stage::FileMatching, format!("cannot read {}: {e}", dir.display())))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| stage_error(domain, Stage::FileMatching, e.to_string()))?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if includes.is_match(name) && !excludes.is_match(name) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    match matches.len() {
        0 => Err(stage_error(
            domain,
            Stage::FileMatching,
            format!("no file in {} matched the configured patterns", dir.display()),
        )),
        1 => Ok(matches.into_iter().next().expect("len checked")),
        _ => {
            let names: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
            Err(stage_error(
                domain,
                Stage::FileMatching,
                format!("ambiguous match: multiple candidates found: {}", names.join(", ")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn selects_sole_matching_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("年金规模.xlsx"), b"").unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();

        let result = select_candidate("d", dir.path(), &["*年金*.xlsx".to_string()], &[]).unwrap();
        assert_eq!(result.file_name().unwrap().to_str().unwrap(), "年金规模.xlsx");
    }

    #[test]
    fn zero_matches_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("readme.txt"), b"").unwrap();
        let err = select_candidate("d", dir.path(), &["*.xlsx".to_string()], &[]).unwrap_err();
        assert_eq!(err.category(), "discovery");
    }

    #[test]
    fn multiple_matches_is_ambiguous() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xlsx"), b"").unwrap();
        fs::write(dir.path().join("b.xlsx"), b"").unwrap();
        let err = select_candidate("d", dir.path(), &["*.xlsx".to_string()], &[]).unwrap_err();
        assert_eq!(err.category(), "discovery");
    }

    #[test]
    fn exclude_pattern_removes_a_candidate() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.xlsx"), b"").unwrap();
        fs::write(dir.path().join("a_backup.xlsx"), b"").unwrap();
        let result = select_candidate(
            "d",
            dir.path(),
            &["*.xlsx".to_string()],
            &["*backup*".to_string()],
        )
        .unwrap();
        assert_eq!(result.file_name().unwrap().to_str().unwrap(), "a.xlsx");
    }
}
