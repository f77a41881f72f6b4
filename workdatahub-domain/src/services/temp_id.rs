// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Temporary Company ID Generation
//!
//! Layer 5 of company enrichment (spec §4.6, worked example in §8): when no
//! other layer resolves a company name, a temporary id is derived
//! deterministically so the same unresolved name always maps to the same id
//! across runs. The recipe is `"IN" + base32(HMAC-SHA1(salt, normalized_name))[..16]`,
//! where `normalized_name` is the input lowercased, trimmed, and collapsed to
//! single spaces internally.

use base32::Alphabet;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::WdhError;
use crate::value_objects::CompanyId;

type HmacSha1 = Hmac<Sha1>;

/// Lowercases, trims surrounding whitespace, and collapses consecutive
/// internal whitespace to a single space, so two names differing only by
/// incidental spacing converge on the same temp id (spec §4.6, §8).
/// Unicode-aware: CJK company names have no case to fold, but ASCII
/// suffixes like "XYZ" do.
pub fn normalize_name(raw: &str) -> String {
    raw.trim().to_lowercase().split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Derives a stable temporary `CompanyId` for `name` under `salt`.
///
/// The same `(salt, name)` pair always yields the same id; two different
/// unresolved names collapse to the same temp id only in the astronomically
/// unlikely event of an HMAC-SHA1 collision truncated to 16 Base32 chars.
pub fn generate(salt: &str, name: &str) -> Result<CompanyId, WdhError> {
    let normalized = normalize_name(name);
    let mut mac = HmacSha1::new_from_slice(salt.as_bytes())
        .map_err(|e| WdhError::internal(format!("invalid HMAC key length: {e}")))?;
    mac.update(normalized.as_bytes());
    let digest = mac.finalize().into_bytes();

    let encoded = base32::encode(Alphabet::Rfc4648 { padding: false }, &digest);
    let suffix: String = encoded.chars().take(16).collect();
    CompanyId::new(format!("IN{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_salt_and_name_always_yields_the_same_id() {
        let a = generate("testsalt", "新公司XYZ").unwrap();
        let b = generate("testsalt", "新公司XYZ").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn normalization_folds_case_before_hashing() {
        let a = generate("testsalt", "新公司XYZ").unwrap();
        let b = generate("testsalt", "新公司xyz").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn result_matches_temp_id_shape() {
        let id = generate("testsalt", "Unresolved Co").unwrap();
        assert!(id.is_temporary());
    }

    #[test]
    fn internal_whitespace_collapse_before_hashing() {
        let a = generate("testsalt", "Alpha  Co").unwrap();
        let b = generate("testsalt", "Alpha Co").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_names_yield_different_ids() {
        let a = generate("testsalt", "Alpha Co").unwrap();
        let b = generate("testsalt", "Beta Co").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn different_salts_yield_different_ids_for_the_same_name() {
        let a = generate("salt-one", "Alpha Co").unwrap();
        let b = generate("salt-two", "Alpha Co").unwrap();
        assert_ne!(a, b);
    }
}
