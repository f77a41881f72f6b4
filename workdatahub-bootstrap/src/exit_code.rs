// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Process exit codes (spec.md §6): a small, closed set rather than BSD
//! `sysexits.h`'s full range, because every failure a run can produce is
//! already tagged with a [`Stage`](workdatahub_domain::error::Stage) that
//! maps cleanly onto one of six outcomes.

use std::fmt;

use workdatahub_domain::error::{Stage, WdhError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    #[default]
    Success = 0,
    /// General/unexpected error not otherwise classified (6).
    Unexpected = 6,
    /// Structural or semantic problem in a configuration file. Fatal at startup.
    Config = 2,
    /// Missing path, ambiguous version, zero/multiple file matches, missing sheet.
    Discovery = 3,
    /// Schema violation, row-level rejection threshold breach.
    Validation = 4,
    /// Database failure during fact/reference write.
    Load = 5,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "success",
            ExitCode::Config => "configuration error",
            ExitCode::Discovery => "discovery error",
            ExitCode::Validation => "validation error",
            ExitCode::Load => "load error",
            ExitCode::Unexpected => "unexpected error",
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

impl From<&WdhError> for ExitCode {
    fn from(err: &WdhError) -> Self {
        match err.stage() {
            Some(Stage::ConfigResolution) => ExitCode::Config,
            Some(Stage::VersionDetection) | Some(Stage::FileMatching) | Some(Stage::SheetReading) => {
                ExitCode::Discovery
            }
            Some(Stage::Normalization) | Some(Stage::BronzeValidation) | Some(Stage::GoldValidation) => {
                ExitCode::Validation
            }
            Some(Stage::Load) => ExitCode::Load,
            Some(Stage::PipelineStep) | Some(Stage::Enrichment) | Some(Stage::FkBackfill) | Some(Stage::PostHook) => {
                ExitCode::Unexpected
            }
            None => ExitCode::Unexpected,
        }
    }
}

impl From<WdhError> for ExitCode {
    fn from(err: WdhError) -> Self {
        ExitCode::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_match_external_interface_contract() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::Config.as_i32(), 2);
        assert_eq!(ExitCode::Discovery.as_i32(), 3);
        assert_eq!(ExitCode::Validation.as_i32(), 4);
        assert_eq!(ExitCode::Load.as_i32(), 5);
        assert_eq!(ExitCode::Unexpected.as_i32(), 6);
    }

    #[test]
    fn config_stage_maps_to_config_exit_code() {
        let err = WdhError::config("data_sources.yml", "missing base_path");
        assert_eq!(ExitCode::from(&err), ExitCode::Config);
    }

    #[test]
    fn default_is_success() {
        assert_eq!(ExitCode::default(), ExitCode::Success);
    }
}
