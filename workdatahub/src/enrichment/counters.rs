// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Enrichment Counters
//!
//! The observable counters a run reports for company enrichment (spec.md
//! §4.6). Plain atomics so [`crate::enrichment::CompanyEnrichmentResolver`]
//! can be shared across concurrent callers without a mutex around the whole
//! resolver; a snapshot is taken once at the end of a run for the JSON
//! summary.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct EnrichmentCounters {
    pub yaml_hits: AtomicU64,
    pub cache_hits: AtomicU64,
    pub existing_hits: AtomicU64,
    pub api_calls: AtomicU64,
    pub api_budget_used: AtomicU64,
    pub api_failures: AtomicU64,
    pub temp_ids_generated: AtomicU64,
    pub queued_new: AtomicU64,
}

/// Point-in-time copy of [`EnrichmentCounters`] for a run's JSON summary.
/// `queue_depth_after` (spec.md §4.6) is the distinct count of pending
/// `enrichment_requests` rows this run queued, which is just `queued_new`
/// since a run never queues the same normalized name twice (§5: partial
/// unique index on `status ∈ {pending, processing}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
pub struct EnrichmentCounterSnapshot {
    pub yaml_hits: u64,
    pub cache_hits: u64,
    pub existing_hits: u64,
    pub api_calls: u64,
    pub api_budget_used: u64,
    pub api_failures: u64,
    pub temp_ids_generated: u64,
    pub queued_new: u64,
    pub queue_depth_after: u64,
}

impl EnrichmentCounters {
    pub fn snapshot(&self) -> EnrichmentCounterSnapshot {
        let queued_new = self.queued_new.load(Ordering::Relaxed);
        EnrichmentCounterSnapshot {
            yaml_hits: self.yaml_hits.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            existing_hits: self.existing_hits.load(Ordering::Relaxed),
            api_calls: self.api_calls.load(Ordering::Relaxed),
            api_budget_used: self.api_budget_used.load(Ordering::Relaxed),
            api_failures: self.api_failures.load(Ordering::Relaxed),
            temp_ids_generated: self.temp_ids_generated.load(Ordering::Relaxed),
            queued_new,
            queue_depth_after: queued_new,
        }
    }
}
