// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # WorkDataHub Domain
//!
//! Pure business logic for the monthly ETL platform: no I/O, no database
//! driver, no HTTP client. Everything here is reachable with nothing but the
//! standard library plus `serde`/`chrono`/`rust_decimal` for shape and
//! `thiserror` for error enums — the infrastructure crate is the only place
//! that talks to Postgres, the filesystem, or an external API.
//!
//! ## Module structure
//!
//! - [`value_objects`] — small, self-validating wrapper types: [`value_objects::CompanyId`],
//!   [`value_objects::Period`], [`value_objects::Confidence`], [`value_objects::RunId`],
//!   [`value_objects::VersionTag`].
//! - [`entities`] — the records that flow through a run: [`entities::Frame`]/[`entities::Row`]
//!   (the dynamic, config-driven row model), [`entities::DomainConfig`], discovery results,
//!   pipeline-step contracts, foreign-key rules, resolution requests/results, rejections, and
//!   load results.
//! - [`services`] — stateless pure functions: RFC3339 datetime serde helpers and
//!   deterministic temporary-id generation.
//! - [`error`] — [`error::WdhError`], the single error type threaded through every stage of a
//!   run.
//!
//! ## Business rules and invariants
//!
//! - A company id is either resolved by one of the first four enrichment
//!   layers, or falls back to a temporary id of shape `IN[A-Z2-7]{16}`; the
//!   latter always carries zero confidence ([`entities::ResolutionResult::is_consistent`]).
//! - Version folders (`V1`, `V2`, ..., `V10`) compare numerically, never
//!   lexicographically ([`value_objects::VersionTag`]).
//! - A `Period` is always a valid calendar month within the platform's
//!   supported range.
//! - Monetary cell values are `Decimal`, never `f64`, so re-running the same
//!   input twice produces byte-identical output.

pub mod entities;
pub mod error;
pub mod services;
pub mod value_objects;

pub use entities::{CellValue, Frame, Row};
pub use error::WdhError;
pub use value_objects::{CompanyId, Confidence, Period, RunId, VersionTag};
