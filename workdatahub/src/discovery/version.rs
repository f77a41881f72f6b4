// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Version Folder Selection
//!
//! Chooses among sibling `V<digits>` folders inside a domain's resolved base
//! path (spec.md §4.2 steps 2-3). Numeric comparison, not lexicographic —
//! `V10` outranks `V2` (spec.md §8).

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use workdatahub_domain::entities::{VersionFallback, VersionStrategy, VersionStrategyUsed, VersionedPath};
use workdatahub_domain::error::{Stage, WdhError};
use workdatahub_domain::value_objects::VersionTag;

use super::stage_error;

struct Candidate {
    tag: VersionTag,
    path: PathBuf,
    modified: SystemTime,
}

fn list_version_dirs(domain: &str, base_path: &Path) -> Result<Vec<Candidate>, WdhError> {
    let entries = std::fs::read_dir(base_path).map_err(|e| {
        stage_error(
            domain,
            Stage::VersionDetection,
            format!("cannot read base path {}: {e}", base_path.display()),
        )
    })?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| stage_error(domain, Stage::VersionDetection, e.to_string()))?;
        let file_type = entry
            .file_type()
            .map_err(|e| stage_error(domain, Stage::VersionDetection, e.to_string()))?;
        if !file_type.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        let Some(tag) = VersionTag::parse(name) else { continue };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| stage_error(domain, Stage::VersionDetection, e.to_string()))?;
        candidates.push(Candidate {
            tag,
            path: entry.path(),
            modified,
        });
    }
    Ok(candidates)
}

pub fn select_version(
    domain: &str,
    base_path: &Path,
    strategy: VersionStrategy,
    fallback: VersionFallback,
) -> Result<VersionedPath, WdhError> {
    if !base_path.exists() {
        return Err(stage_error(
            domain,
            Stage::VersionDetection,
            format!("base path does not exist: {}", base_path.display()),
        ));
    }

    let candidates = list_version_dirs(domain, base_path)?;
    if candidates.is_empty() {
        return Ok(VersionedPath {
            absolute_path: base_path.to_path_buf(),
            version_tag: None,
            strategy_used: VersionStrategyUsed::NoVersionFolder,
        });
    }

    match strategy {
        VersionStrategy::HighestNumber => select_highest_number(domain, candidates),
        VersionStrategy::LatestModified => select_latest_modified(domain, candidates, fallback),
        VersionStrategy::Manual => select_manual(domain, candidates),
    }
}

fn select_highest_number(domain: &str, candidates: Vec<Candidate>) -> Result<VersionedPath, WdhError> {
    let max_number = candidates.iter().map(|c| c.tag.number()).max().unwrap_or(0);
    let winners: Vec<&Candidate> = candidates.iter().filter(|c| c.tag.number() == max_number).collect();
    if winners.len() > 1 {
        let names: Vec<&str> = winners.iter().map(|c| c.tag.as_str()).collect();
        return Err(stage_error(
            domain,
            Stage::VersionDetection,
            format!("ambiguous versions {} share the highest version number", names.join(" and ")),
        ));
    }
    let winner = winners[0];
    Ok(VersionedPath {
        absolute_path: winner.path.clone(),
        version_tag: Some(winner.tag.as_str().to_string()),
        strategy_used: VersionStrategyUsed::HighestNumber,
    })
}

fn select_latest_modified(
    domain: &str,
    candidates: Vec<Candidate>,
    fallback: VersionFallback,
) -> Result<VersionedPath, WdhError> {
    let newest = candidates.iter().map(|c| c.modified).max().expect("non-empty");
    let tied: Vec<&Candidate> = candidates.iter().filter(|c| c.modified == newest).collect();

    let winner = if tied.len() == 1 {
        tied[0]
    } else if fallback == VersionFallback::UseLatestModified {
        tied.iter().max_by_key(|c| c.tag.number()).copied().expect("non-empty")
    } else {
        let mut names: Vec<&str> = tied.iter().map(|c| c.tag.as_str()).collect();
        names.sort_unstable();
        return Err(stage_error(
            domain,
            Stage::VersionDetection,
            format!("ambiguous versions {} modified at the same timestamp", names.join(" and ")),
        ));
    };

    Ok(VersionedPath {
        absolute_path: winner.path.clone(),
        version_tag: Some(winner.tag.as_str().to_string()),
        strategy_used: VersionStrategyUsed::LatestModified,
    })
}

fn select_manual(domain: &str, candidates: Vec<Candidate>) -> Result<VersionedPath, WdhError> {
    if candidates.len() > 1 {
        let names: Vec<&str> = candidates.iter().map(|c| c.tag.as_str()).collect();
        return Err(stage_error(
            domain,
            Stage::VersionDetection,
            format!(
                "manual version_strategy requires exactly one version folder, found {}",
                names.join(", ")
            ),
        ));
    }
    let winner = &candidates[0];
    Ok(VersionedPath {
        absolute_path: winner.path.clone(),
        version_tag: Some(winner.tag.as_str().to_string()),
        strategy_used: VersionStrategyUsed::Manual,
    })
}
