// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Foreign-Key Backfill
//!
//! Ensures every parent row a Gold frame references exists before the
//! frame is loaded (spec.md §4.7). Applies only to domains whose config
//! sets `requires_backfill = true`; the caller is responsible for that
//! check, this module only knows how to run a rule list.

mod engine;

pub use engine::{run_all, run_rule, BackfillRuleResult};
