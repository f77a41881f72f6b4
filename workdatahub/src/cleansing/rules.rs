// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Standard Cleansing Rules
//!
//! The five required built-ins (spec.md §4.3). Every rule is total (never
//! fails) and a no-op on non-text cells, which is what makes them trivially
//! idempotent for `Null`/`Int`/`Decimal`/`Bool`/`Date` values.

use workdatahub_domain::entities::CellValue;

const NULL_TOKENS: &[&str] = &["", " ", "N/A", "NA", "nan", "None", "\u{3000}"];

const CORPORATE_SUFFIXES: &[&str] = &[
    "股份有限公司",
    "有限责任公司",
    "集团有限公司",
    "有限公司",
    "Co., Ltd.",
    "Co.,Ltd.",
    "Co. Ltd.",
    "Corporation",
    "Corp.",
    "Inc.",
    "LLC",
];

const CURRENCY_SYMBOLS: &[char] = &['¥', '$', '€', '£', '元'];

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn trim_whitespace(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => CellValue::Text(s.trim().to_string()),
        other => other.clone(),
    }
}

pub fn normalize_company_name(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => {
            let mut name = collapse_whitespace(s.trim());
            for suffix in CORPORATE_SUFFIXES {
                if let Some(stripped) = name.strip_suffix(suffix) {
                    name = stripped.trim_end().to_string();
                    break;
                }
            }
            CellValue::Text(name)
        }
        other => other.clone(),
    }
}

pub fn standardize_null_values(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) if NULL_TOKENS.contains(&s.trim()) => CellValue::Null,
        other => other.clone(),
    }
}

pub fn remove_currency_symbols(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => {
            let cleaned: String = s.chars().filter(|c| !CURRENCY_SYMBOLS.contains(c)).collect();
            CellValue::Text(cleaned.trim().to_string())
        }
        other => other.clone(),
    }
}

pub fn clean_comma_separated_number(value: &CellValue) -> CellValue {
    match value {
        CellValue::Text(s) => CellValue::Text(s.replace(',', "")),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(
            trim_whitespace(&CellValue::Text("  hi  ".into())),
            CellValue::Text("hi".into())
        );
    }

    #[test]
    fn strips_corporate_suffix_and_collapses_spacing() {
        let result = normalize_company_name(&CellValue::Text("  Acme   有限公司 ".into()));
        assert_eq!(result, CellValue::Text("Acme".into()));
    }

    #[test]
    fn standardizes_known_null_tokens() {
        for token in ["", " ", "N/A", "NA", "nan", "None", "\u{3000}"] {
            assert_eq!(
                standardize_null_values(&CellValue::Text(token.into())),
                CellValue::Null,
                "token '{token}' should standardize to null"
            );
        }
        assert_eq!(
            standardize_null_values(&CellValue::Text("real value".into())),
            CellValue::Text("real value".into())
        );
    }

    #[test]
    fn removes_currency_symbols() {
        assert_eq!(
            remove_currency_symbols(&CellValue::Text("¥1234".into())),
            CellValue::Text("1234".into())
        );
    }

    #[test]
    fn cleans_comma_separated_numbers() {
        assert_eq!(
            clean_comma_separated_number(&CellValue::Text("1,234,567.89".into())),
            CellValue::Text("1234567.89".into())
        );
    }

    #[test]
    fn non_text_cells_are_left_untouched() {
        assert_eq!(trim_whitespace(&CellValue::Int(5)), CellValue::Int(5));
        assert_eq!(normalize_company_name(&CellValue::Null), CellValue::Null);
    }
}
