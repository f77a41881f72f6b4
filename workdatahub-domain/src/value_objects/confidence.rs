// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Confidence Value Object
//!
//! A score in `[0.0, 1.0]` attached to every enrichment resolution and every
//! `enrichment_index` cache row. `0.0` is reserved for temporary ids (spec
//! invariant: `source = temp_id` iff `confidence = 0.0`).

use serde::{Deserialize, Serialize};

use crate::error::WdhError;

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Result<Self, WdhError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(WdhError::internal(format!(
                "confidence must be within [0.0, 1.0], got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    pub const ZERO: Confidence = Confidence(0.0);

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn meets_minimum(&self, minimum: Confidence) -> bool {
        self.0 >= minimum.0
    }
}

impl Default for Confidence {
    fn default() -> Self {
        Confidence::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range() {
        assert!(Confidence::new(-0.1).is_err());
        assert!(Confidence::new(1.1).is_err());
        assert!(Confidence::new(0.0).is_ok());
        assert!(Confidence::new(1.0).is_ok());
    }

    #[test]
    fn meets_minimum_threshold() {
        let c = Confidence::new(0.6).unwrap();
        let min = Confidence::new(0.6).unwrap();
        assert!(c.meets_minimum(min));
        assert!(!Confidence::new(0.5).unwrap().meets_minimum(min));
    }
}
