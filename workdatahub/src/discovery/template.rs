// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Base Path Template Resolution
//!
//! Substitutes `{YYYYMM}`, `{YYYY}`, and `{MM}` placeholders in a domain's
//! `base_path_template` with the run's period (spec.md §4.2 step 1).
//! Unrecognized placeholders are left untouched rather than failing: the
//! config store already validated the domain at startup, and a literal
//! `{...}` surviving here would be an immediately visible path error rather
//! than a silent data-quality defect.

use workdatahub_domain::value_objects::Period;

pub fn resolve_template(template: &str, period: Period) -> String {
    template
        .replace("{YYYYMM}", &period.as_yyyymm())
        .replace("{YYYY}", &period.as_yyyy())
        .replace("{MM}", &period.as_mm())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_all_placeholders() {
        let period = Period::new(2025, 1).unwrap();
        assert_eq!(resolve_template("ref/monthly/{YYYYMM}/in", period), "ref/monthly/202501/in");
        assert_eq!(resolve_template("{YYYY}/{MM}/data", period), "2025/01/data");
    }

    #[test]
    fn leaves_unrecognized_placeholders_untouched() {
        let period = Period::new(2025, 1).unwrap();
        assert_eq!(resolve_template("ref/{UNKNOWN}/{YYYYMM}", period), "ref/{UNKNOWN}/202501");
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let period = Period::new(2025, 1).unwrap();
        assert_eq!(resolve_template("ref/static/in", period), "ref/static/in");
    }
}
