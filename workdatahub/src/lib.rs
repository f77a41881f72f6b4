// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # WorkDataHub Application & Infrastructure
//!
//! Everything that talks to the filesystem, Postgres, or an external API
//! lives here, behind plain service structs rather than a repository-trait
//! indirection — `workdatahub-domain` stays pure, and this crate is the only
//! place a `sqlx::PgPool` or a `calamine::Xlsx` reader is ever constructed.
//!
//! ## Module structure
//!
//! - [`config_store`] — loads and validates the four YAML configuration files into one
//!   immutable snapshot.
//! - [`discovery`] — version-folder selection, include/exclude matching, Excel/CSV reading,
//!   column-name normalization.
//! - [`cleansing`] — the named registry of pure value-level rules.
//! - [`validation`] — Bronze/Gold frame schemas, the shared date parser, rejection export.
//! - [`pipeline`] — the step-execution framework: ordering, metrics, error modes, classified
//!   retry, and the standard step kinds.
//! - [`enrichment`] — the five-layer company resolver.
//! - [`backfill`] — the foreign-key backfill engine.
//! - [`loader`] — the transactional warehouse loader.
//! - [`hooks`] — the post-ETL hook runner.
//! - [`observability`] — per-run JSON summaries and CSV exports.
//! - [`registry`] — the domain service registry and job registry.
//! - [`orchestrator`] — translates a CLI invocation into an execution plan and drives it.

pub mod backfill;
pub mod cleansing;
pub mod config_store;
pub mod discovery;
pub mod enrichment;
pub mod hooks;
pub mod loader;
pub mod observability;
pub mod orchestrator;
pub mod pipeline;
pub mod registry;
pub mod validation;
