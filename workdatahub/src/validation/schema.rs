// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Validation Schemas
//!
//! Per-domain field descriptions consumed by [`crate::validation::bronze`] and
//! [`crate::validation::gold`]. Like [`crate::cleansing::CleansingDomainConfig`],
//! these are built in code by each domain's registry entry rather than read
//! from a user-editable file (spec.md §4.9).

/// The coercion target for one Bronze-layer field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Decimal,
    Date,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub fn required(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: true,
            kind,
        }
    }

    pub fn optional(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            required: false,
            kind,
        }
    }
}

/// The Bronze-layer shape check: which columns must exist, what type each
/// coerces to, and how many bad rows are tolerated before the whole run
/// aborts (spec.md §4.4 — default 10%, "a sign of a systemic data problem").
#[derive(Debug, Clone)]
pub struct BronzeSchema {
    pub fields: Vec<FieldSpec>,
    pub failure_threshold: f64,
}

impl BronzeSchema {
    pub fn new(fields: Vec<FieldSpec>) -> Self {
        Self {
            fields,
            failure_threshold: 0.10,
        }
    }

    pub fn with_failure_threshold(mut self, threshold: f64) -> Self {
        self.failure_threshold = threshold;
        self
    }
}

/// The Gold-layer shape check: non-null required fields, non-negative
/// monetary fields, and a composite uniqueness key (spec.md §4.4).
#[derive(Debug, Clone)]
pub struct GoldSchema {
    pub required_fields: Vec<String>,
    pub non_negative_fields: Vec<String>,
    pub unique_key_columns: Vec<String>,
    pub max_listed_collisions: usize,
}

impl GoldSchema {
    pub fn new(required_fields: Vec<String>, non_negative_fields: Vec<String>, unique_key_columns: Vec<String>) -> Self {
        Self {
            required_fields,
            non_negative_fields,
            unique_key_columns,
            max_listed_collisions: 20,
        }
    }
}
