// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Retry Classification
//!
//! A pure function mapping a failed step's [`WdhError`] to a [`RetryTier`],
//! so the pipeline framework's retry loop (spec.md §4.5) never needs to know
//! which infrastructure produced the failure. Classification is by message
//! content because `WdhError`'s infrastructure-facing variants carry a
//! flattened string rather than the original `sqlx`/`reqwest` error type.

use workdatahub_domain::entities::RetryTier;
use workdatahub_domain::error::WdhError;

fn looks_like(message: &str, needles: &[&str]) -> bool {
    let lower = message.to_ascii_lowercase();
    needles.iter().any(|n| lower.contains(n))
}

/// Returns the retry tier a failure belongs to, or `None` if it should not
/// be retried at all.
pub fn classify(error: &WdhError) -> Option<RetryTier> {
    match error {
        WdhError::Load { message } | WdhError::Backfill { message, .. } => {
            if looks_like(message, &["connection reset", "connection refused", "pool timed out", "broken pipe"]) {
                Some(RetryTier::Database)
            } else {
                None
            }
        }
        WdhError::EnrichmentProvider { message } => {
            if looks_like(message, &["429", "503", "throttl", "rate limit"]) {
                Some(RetryTier::HttpThrottled)
            } else if looks_like(message, &["500", "502", "504"]) {
                Some(RetryTier::HttpServerError)
            } else if looks_like(message, &["timed out", "connection", "dns"]) {
                Some(RetryTier::Network)
            } else {
                None
            }
        }
        WdhError::Io(_) => Some(RetryTier::Network),
        WdhError::Transient { tier, .. } => tier_by_name(tier),
        _ => None,
    }
}

fn tier_by_name(name: &str) -> Option<RetryTier> {
    match name {
        "database" => Some(RetryTier::Database),
        "network" => Some(RetryTier::Network),
        "http_throttled" => Some(RetryTier::HttpThrottled),
        "http_server_error" => Some(RetryTier::HttpServerError),
        _ => None,
    }
}
