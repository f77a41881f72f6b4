// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Period Value Object
//!
//! A `Period` is the six-character month tag (`YYYYMM`) used to select input
//! files and scope warehouse writes. It is a distinct type from the general
//! date parser in `workdatahub`'s validation engine: a `Period` is always
//! exactly `YYYYMM`, used for path templating and delete-scope keys, whereas
//! the date parser (§4.4) additionally accepts Chinese and ISO forms for row
//! values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::WdhError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    pub fn new(year: u16, month: u8) -> Result<Self, WdhError> {
        if !(1..=12).contains(&month) {
            return Err(WdhError::validation(
                crate::error::Stage::ConfigResolution,
                None,
                format!("invalid month {} in period", month),
            ));
        }
        if !(2000..=2030).contains(&year) {
            return Err(WdhError::validation(
                crate::error::Stage::ConfigResolution,
                None,
                format!("period year {} out of supported range 2000-2030", year),
            ));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Zero-padded `YYYYMM`, the canonical path-template substitution value.
    pub fn as_yyyymm(&self) -> String {
        format!("{:04}{:02}", self.year, self.month)
    }

    pub fn as_yyyy(&self) -> String {
        format!("{:04}", self.year)
    }

    pub fn as_mm(&self) -> String {
        format!("{:02}", self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_yyyymm())
    }
}

impl FromStr for Period {
    type Err = WdhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WdhError::validation(
                crate::error::Stage::ConfigResolution,
                None,
                format!("period must be 6 digits YYYYMM, got '{}'", s),
            ));
        }
        let year: u16 = s[0..4]
            .parse()
            .map_err(|_| WdhError::validation(crate::error::Stage::ConfigResolution, None, "invalid year in period"))?;
        let month: u8 = s[4..6]
            .parse()
            .map_err(|_| WdhError::validation(crate::error::Stage::ConfigResolution, None, "invalid month in period"))?;
        Period::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_yyyymm() {
        let p: Period = "202501".parse().unwrap();
        assert_eq!(p.year(), 2025);
        assert_eq!(p.month(), 1);
        assert_eq!(p.as_yyyymm(), "202501");
    }

    #[test]
    fn rejects_out_of_range_year() {
        assert!("19990101".parse::<Period>().is_err());
        assert!("199901".parse::<Period>().is_err());
    }

    #[test]
    fn rejects_bad_month() {
        assert!(Period::new(2025, 13).is_err());
        assert!(Period::new(2025, 0).is_err());
    }
}
