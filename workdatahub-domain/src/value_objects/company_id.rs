// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Company ID Value Object
//!
//! Every row written to a fact table carries a non-empty `company_id`. Most
//! are canonical enterprise identifiers resolved by the enrichment layers
//! (yaml, cache, existing column, external API); unresolved names get a
//! temporary id of the shape `IN<16 Base32 chars>`, produced deterministically
//! from `HMAC-SHA1(salt, normalized_name)` so the same unresolved name always
//! collapses to the same id (spec §4.6 Layer 5, §8).

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::WdhError;

fn temp_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^IN[A-Z2-7]{16}$").expect("static temp-id regex is valid"))
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyId(String);

impl CompanyId {
    pub fn new(value: impl Into<String>) -> Result<Self, WdhError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(WdhError::internal("company_id must not be empty"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this id matches the temporary-id shape `IN[A-Z2-7]{16}`.
    pub fn is_temporary(&self) -> bool {
        temp_id_pattern().is_match(&self.0)
    }
}

impl fmt::Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CompanyId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(CompanyId::new("").is_err());
        assert!(CompanyId::new("   ").is_err());
    }

    #[test]
    fn recognizes_temp_id_shape() {
        let temp = CompanyId::new("INABCDEFGHIJKLMN").unwrap();
        assert!(temp.is_temporary());

        let real = CompanyId::new("C1").unwrap();
        assert!(!real.is_temporary());
    }

    #[test]
    fn temp_id_shape_is_case_sensitive_upper_and_base32() {
        // lowercase or digits 0/1/8/9 are not valid base32 (RFC4648) chars
        let not_temp = CompanyId::new("INabcdefghijklmn").unwrap();
        assert!(!not_temp.is_temporary());
        let not_temp2 = CompanyId::new("IN019ABCDEFGHIJK").unwrap();
        assert!(!not_temp2.is_temporary());
    }
}
