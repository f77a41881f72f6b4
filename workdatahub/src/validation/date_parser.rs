// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Shared Date Parser
//!
//! Accepts integer `YYYYMM`, ISO `YYYY-MM`, and Chinese `YYYY年M月` /
//! `YY年M月` forms (spec.md §4.4). Native `CellValue::Date` values bypass
//! this parser entirely — see [`crate::validation::bronze`]. Two-digit years
//! map 00-49 to the 2000s and 50-99 to the 1900s. The 2000-2030 range gate
//! applies to every other accepted form, but not to a 1900s two-digit-year
//! expansion (spec.md §8's worked boundary, `"50年1月" → 1950-01-01`, falls
//! outside that window by construction).

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use workdatahub_domain::error::WdhError;

const ACCEPTED_FORMATS: &str = "YYYYMM, YYYY-MM, YYYY年M月, YY年M月";
const MIN_YEAR: i32 = 2000;
const MAX_YEAR: i32 = 2030;

fn iso_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{4})-(\d{1,2})$").expect("static regex is valid"))
}

fn chinese_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{2}|\d{4})年(\d{1,2})月$").expect("static regex is valid"))
}

fn expand_two_digit_year(short: i32) -> i32 {
    if short <= 49 {
        2000 + short
    } else {
        1900 + short
    }
}

/// `check_range` is false only for years expanded from a two-digit Chinese
/// year: spec §8's worked boundary (`"50年1月" → 1950-01-01`) falls outside
/// the 2000-2030 window that otherwise governs every other accepted form, so
/// the 1900s half of that expansion is deliberately exempted from the range
/// gate rather than rejected by it.
fn build_date(raw: &str, year: i32, month: u32, check_range: bool) -> Result<NaiveDate, WdhError> {
    if !(1..=12).contains(&month) {
        return Err(rejection(raw, format!("month {month} out of range 1-12")));
    }
    if check_range && !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(rejection(raw, format!("year {year} out of supported range {MIN_YEAR}-{MAX_YEAR}")));
    }
    NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| rejection(raw, "not a valid calendar date"))
}

fn rejection(raw: &str, reason: impl std::fmt::Display) -> WdhError {
    WdhError::validation(
        workdatahub_domain::error::Stage::BronzeValidation,
        None,
        format!("could not parse date '{raw}' ({reason}); accepted formats: {ACCEPTED_FORMATS}"),
    )
}

/// Parses a date-shaped string into the first day of its month. `raw` is the
/// original value, preserved in error messages.
pub fn parse(raw: &str) -> Result<NaiveDate, WdhError> {
    let trimmed = raw.trim();

    if trimmed.len() == 6 && trimmed.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = trimmed[0..4].parse().map_err(|_| rejection(raw, "invalid year digits"))?;
        let month: u32 = trimmed[4..6].parse().map_err(|_| rejection(raw, "invalid month digits"))?;
        return build_date(raw, year, month, true);
    }

    if let Some(caps) = iso_pattern().captures(trimmed) {
        let year: i32 = caps[1].parse().map_err(|_| rejection(raw, "invalid year digits"))?;
        let month: u32 = caps[2].parse().map_err(|_| rejection(raw, "invalid month digits"))?;
        return build_date(raw, year, month, true);
    }

    if let Some(caps) = chinese_pattern().captures(trimmed) {
        let year_part = &caps[1];
        let month: u32 = caps[2].parse().map_err(|_| rejection(raw, "invalid month digits"))?;
        let is_two_digit = year_part.len() == 2;
        let year: i32 = if is_two_digit {
            let short: i32 = year_part.parse().map_err(|_| rejection(raw, "invalid year digits"))?;
            expand_two_digit_year(short)
        } else {
            year_part.parse().map_err(|_| rejection(raw, "invalid year digits"))?
        };
        return build_date(raw, year, month, !is_two_digit);
    }

    Err(rejection(raw, "unrecognized format"))
}
