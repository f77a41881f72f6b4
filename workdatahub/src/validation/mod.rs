// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Validation Engine
//!
//! Two gates a frame passes through on its way to the warehouse (spec.md
//! §4.4): [`bronze`] coerces raw cells into typed values against a
//! [`schema::BronzeSchema`], and [`gold`] checks the fully-processed frame
//! against a [`schema::GoldSchema`] before it reaches the loader. Both share
//! [`date_parser`], the multi-format date grammar accepted across every
//! domain.

pub mod bronze;
pub mod date_parser;
pub mod export;
pub mod gold;
pub mod schema;

pub use schema::{BronzeSchema, FieldKind, FieldSpec, GoldSchema};
