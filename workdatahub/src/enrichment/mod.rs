// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Company Enrichment
//!
//! The five-layer resolver that guarantees every row leaving
//! `CompanyIdResolutionStep` carries a non-empty `company_id` (spec.md
//! §4.6): a YAML override map, the warehouse's own cache, the row's
//! existing column, an external lookup API, and a deterministic temporary
//! id as the layer of last resort.

mod counters;
mod export;
mod layer5_only;
mod local_resolver;
mod provider;
mod resolver;

pub use counters::{EnrichmentCounterSnapshot, EnrichmentCounters};
pub use export::export_unknown_companies;
pub use layer5_only::Layer5OnlyResolver;
pub use local_resolver::LocalOnlyResolver;
pub use provider::{EqcCandidate, EqcProvider, HttpEqcProvider};
pub use resolver::CompanyEnrichmentResolver;
