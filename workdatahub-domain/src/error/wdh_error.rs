// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! `WdhError` is the single error type that flows between every component of
//! a run: config loading, discovery, validation, the pipeline framework,
//! enrichment, FK backfill, the loader, and post-ETL hooks. Each variant maps
//! to one entry of the error taxonomy: configuration problems are fatal at
//! startup, discovery/validation/backfill/load problems are fatal per run
//! unless a named recovery policy exists (classified retry, `collect_errors`
//! mode, provider-level disable), and every variant carries enough context to
//! report a stage tag and a primary cause.

use std::fmt;

use thiserror::Error;

/// Pipeline stage tag attached to most errors, so the orchestrator can report
/// "where" a run failed without parsing the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    ConfigResolution,
    VersionDetection,
    FileMatching,
    SheetReading,
    Normalization,
    BronzeValidation,
    PipelineStep,
    GoldValidation,
    Enrichment,
    FkBackfill,
    Load,
    PostHook,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::ConfigResolution => "config_resolution",
            Stage::VersionDetection => "version_detection",
            Stage::FileMatching => "file_matching",
            Stage::SheetReading => "sheet_reading",
            Stage::Normalization => "normalization",
            Stage::BronzeValidation => "bronze_validation",
            Stage::PipelineStep => "pipeline_step",
            Stage::GoldValidation => "gold_validation",
            Stage::Enrichment => "enrichment",
            Stage::FkBackfill => "fk_backfill",
            Stage::Load => "load",
            Stage::PostHook => "post_hook",
        };
        write!(f, "{}", s)
    }
}

/// Domain-wide error taxonomy (spec §7).
///
/// Every raised error includes a stage tag (where available) and a primary
/// cause string. Variants map 1:1 onto the error taxonomy in the
/// specification; CLI exit-code collapse happens one layer up, in
/// `workdatahub-bootstrap::exit_code`.
#[derive(Error, Debug, Clone)]
pub enum WdhError {
    #[error("configuration error at {path}: {message}")]
    Config { path: String, message: String },

    #[error("discovery error [{domain}] during {stage}: {message}")]
    Discovery {
        domain: String,
        stage: Stage,
        message: String,
    },

    #[error("validation error [{stage}] field={field:?}: {message}")]
    Validation {
        stage: Stage,
        field: Option<String>,
        message: String,
    },

    #[error("pipeline step '{step_name}' (index {step_index}) failed: {message}")]
    Pipeline {
        step_name: String,
        step_index: usize,
        message: String,
    },

    #[error("transient {tier} error (attempt {attempt}/{max_attempts}): {message}")]
    Transient {
        tier: String,
        attempt: u32,
        max_attempts: u32,
        message: String,
    },

    #[error("FK backfill rule '{rule_name}' failed: {message}")]
    Backfill { rule_name: String, message: String },

    #[error("load error: {message}")]
    Load { message: String },

    #[error("enrichment provider error: {message}")]
    EnrichmentProvider { message: String },

    #[error("post-ETL hook '{hook_name}' failed: {message}")]
    Hook { hook_name: String, message: String },

    #[error("unknown domain: {0}")]
    UnknownDomain(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WdhError {
    pub fn config(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn discovery(domain: impl Into<String>, stage: Stage, message: impl Into<String>) -> Self {
        Self::Discovery {
            domain: domain.into(),
            stage,
            message: message.into(),
        }
    }

    pub fn validation(stage: Stage, field: Option<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            stage,
            field,
            message: message.into(),
        }
    }

    pub fn pipeline(step_name: impl Into<String>, step_index: usize, message: impl Into<String>) -> Self {
        Self::Pipeline {
            step_name: step_name.into(),
            step_index,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Stage tag, when the variant carries one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            WdhError::Discovery { stage, .. } => Some(*stage),
            WdhError::Validation { stage, .. } => Some(*stage),
            WdhError::Pipeline { .. } => Some(Stage::PipelineStep),
            WdhError::Backfill { .. } => Some(Stage::FkBackfill),
            WdhError::Load { .. } => Some(Stage::Load),
            WdhError::EnrichmentProvider { .. } => Some(Stage::Enrichment),
            WdhError::Hook { .. } => Some(Stage::PostHook),
            _ => None,
        }
    }

    /// Coarse category, used for metrics and log fields.
    pub fn category(&self) -> &'static str {
        match self {
            WdhError::Config { .. } => "config",
            WdhError::Discovery { .. } => "discovery",
            WdhError::Validation { .. } => "validation",
            WdhError::Pipeline { .. } => "pipeline",
            WdhError::Transient { .. } => "transient",
            WdhError::Backfill { .. } => "backfill",
            WdhError::Load { .. } => "load",
            WdhError::EnrichmentProvider { .. } => "enrichment",
            WdhError::Hook { .. } => "hook",
            WdhError::UnknownDomain(_) => "config",
            WdhError::Io(_) => "io",
            WdhError::Serialization(_) => "serialization",
            WdhError::Internal(_) => "internal",
        }
    }

    /// Transient database/network faults are retried per the pipeline
    /// framework's classified-retry policy; everything else is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, WdhError::Transient { .. })
    }
}

impl From<std::io::Error> for WdhError {
    fn from(err: std::io::Error) -> Self {
        WdhError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for WdhError {
    fn from(err: serde_json::Error) -> Self {
        WdhError::Serialization(err.to_string())
    }
}

// NOTE: no From<serde_yaml::Error> here — YAML is a config-loading format
// choice, an infrastructure concern (workdatahub::infrastructure::config).
// The domain only needs JSON for parameter serialization.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_matches_variant() {
        let err = WdhError::config("domains.annuity_performance.base_path", "missing key");
        assert_eq!(err.category(), "config");
    }

    #[test]
    fn transient_is_recoverable() {
        let err = WdhError::Transient {
            tier: "database".into(),
            attempt: 1,
            max_attempts: 5,
            message: "connection reset".into(),
        };
        assert!(err.is_recoverable());
        assert!(!WdhError::internal("boom").is_recoverable());
    }
}
