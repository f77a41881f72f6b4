// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Standard Step Kinds
//!
//! Concrete [`workdatahub_domain::entities::PipelineStep`] implementations a
//! domain's pipeline definition is built from (spec.md §4.5). Each is a thin,
//! single-purpose transform; domain-specific sequencing lives in
//! [`crate::registry`].

mod calculation;
mod cleansing_step;
mod company_id_resolution;
mod drop;
mod gold_projection;
mod mapping;
mod replacement;
mod schema_validation;

pub use calculation::{CalculationFn, CalculationStep};
pub use cleansing_step::CleansingStep;
pub use company_id_resolution::{CompanyIdResolutionStep, CompanyResolver};
pub use drop::DropStep;
pub use gold_projection::GoldProjectionStep;
pub use mapping::MappingStep;
pub use replacement::ReplacementStep;
pub use schema_validation::SchemaValidationStep;
