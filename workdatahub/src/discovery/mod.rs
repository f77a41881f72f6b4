// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # File Discovery Service
//!
//! Given `(domain, period)`, resolves a single input frame plus provenance
//! (spec.md §4.2): template substitution, version-folder selection,
//! include/exclude matching, sheet/CSV reading, and column-name
//! normalization. File reads are blocking and happen entirely in this module
//! (spec.md §5).

mod matching;
mod normalize;
mod reader;
mod template;
mod version;

pub use normalize::normalize_columns;
pub use template::resolve_template;
pub use version::select_version;

use std::path::{Path, PathBuf};
use std::time::Instant;

use workdatahub_domain::entities::{DiscoveryResult, DomainConfig, SheetSelector, VersionStrategyUsed, VersionedPath};
use workdatahub_domain::error::{Stage, WdhError};
use workdatahub_domain::value_objects::Period;

pub struct DiscoveryService;

impl Default for DiscoveryService {
    fn default() -> Self {
        Self::new()
    }
}

impl DiscoveryService {
    pub fn new() -> Self {
        Self
    }

    /// Full algorithm, steps 1-8 of spec.md §4.2.
    pub fn discover(&self, domain: &DomainConfig, period: Period) -> Result<DiscoveryResult, WdhError> {
        let started = Instant::now();

        let base_path = resolve_template(&domain.base_path_template, period);
        let base_path = PathBuf::from(base_path);

        let versioned = version::select_version(&domain.domain_name, &base_path, domain.version_strategy, domain.version_fallback)?;

        let candidate = matching::select_candidate(
            &domain.domain_name,
            &versioned.absolute_path,
            &domain.include_patterns,
            &domain.exclude_patterns,
        )?;

        self.load_candidate(domain, &candidate, versioned, started)
    }

    /// An operator-supplied explicit path, skipping template resolution,
    /// version selection, and include/exclude matching (spec.md §4.2
    /// "Override").
    pub fn discover_with_override(&self, domain: &DomainConfig, explicit_file: &Path) -> Result<DiscoveryResult, WdhError> {
        let started = Instant::now();
        let versioned = VersionedPath {
            absolute_path: explicit_file
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            version_tag: None,
            strategy_used: VersionStrategyUsed::ExplicitOverride,
        };
        self.load_candidate(domain, explicit_file, versioned, started)
    }

    fn load_candidate(
        &self,
        domain: &DomainConfig,
        candidate: &Path,
        versioned: VersionedPath,
        started: Instant,
    ) -> Result<DiscoveryResult, WdhError> {
        let raw_frame = reader::read_frame(&domain.domain_name, candidate, &domain.sheet_selector)?;
        let (frame, warnings) = normalize::normalize_columns(raw_frame);
        for warning in warnings {
            tracing::warn!(domain = %domain.domain_name, %warning, "column name normalization");
        }

        let sheet_or_table = match &domain.sheet_selector {
            SheetSelector::Name(n) => n.clone(),
            SheetSelector::Index(i) => format!("#{i}"),
        };

        Ok(DiscoveryResult {
            row_count: frame.len(),
            frame,
            file_path: candidate.to_path_buf(),
            version_tag: versioned.version_tag,
            sheet_or_table,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

pub(crate) fn stage_error(domain: &str, stage: Stage, message: impl Into<String>) -> WdhError {
    WdhError::discovery(domain, stage, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn discover_with_override_skips_version_and_matching() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.csv");
        fs::write(&file, "a,b\n1,2\n").unwrap();

        let domain = DomainConfig {
            domain_name: "test_domain".into(),
            base_path_template: "unused".into(),
            include_patterns: vec!["*.csv".into()],
            exclude_patterns: vec![],
            sheet_selector: SheetSelector::Name("ignored".into()),
            version_strategy: workdatahub_domain::entities::VersionStrategy::HighestNumber,
            version_fallback: workdatahub_domain::entities::VersionFallback::Error,
            table_name: "t".into(),
            schema_name: "public".into(),
            primary_key_columns: vec!["id".into()],
            composite_delete_key_columns: vec![],
            requires_backfill: false,
            supports_enrichment: false,
        };

        let service = DiscoveryService::new();
        let result = service.discover_with_override(&domain, &file).unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.version_tag, None);
    }
}
