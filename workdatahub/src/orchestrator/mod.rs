// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Orchestrator
//!
//! Translates a validated CLI invocation into an execution plan and drives
//! it (spec.md §3, §6): fans `--domain` out into one [`RunRequest`] per
//! domain, opens a database pool unless every request is `--plan-only`, and
//! runs each request to completion through [`run::run_once`].

pub mod request;
pub mod run;
mod wiring;

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use workdatahub_bootstrap::config::RuntimeConfig;
use workdatahub_domain::error::WdhError;

pub use request::RunRequest;
pub use run::{check_db, connect_pool, RunOutcome};
pub use wiring::ResolverHandle;

use crate::config_store::AppConfig;

/// Runs every request in sequence, stopping at the first failure (spec.md
/// §9 Open Question: "is a multi-domain invocation all-or-nothing or
/// best-effort" — resolved as fail-fast, so an operator sees the first
/// broken domain immediately rather than a pile of unrelated failures after
/// a long wait).
pub async fn run_all(
    app_config: &AppConfig,
    runtime: &RuntimeConfig,
    pool: Option<&PgPool>,
    requests: &[RunRequest],
    cancellation: &CancellationToken,
) -> Result<Vec<RunOutcome>, WdhError> {
    let mut outcomes = Vec::with_capacity(requests.len());
    for request in requests {
        if cancellation.is_cancelled() {
            return Err(WdhError::internal("run was cancelled before all requested domains completed"));
        }
        let outcome = run::run_once(app_config, runtime, pool, request, cancellation).await?;
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn an_empty_request_list_produces_no_outcomes() {
        let app_config = AppConfig::from_parts(
            Default::default(),
            Default::default(),
            Default::default(),
            crate::config_store::EqcConfidenceConfig {
                match_confidence: Default::default(),
                default: 0.5,
                min_confidence_for_cache: 0.5,
            },
        );
        let dotenv = std::collections::HashMap::new();
        let mut process_env = std::collections::HashMap::new();
        process_env.insert("WDH_DATABASE_URL".to_string(), "postgres://localhost/unused".to_string());
        process_env.insert("WDH_ENRICHMENT_SALT".to_string(), "salt".to_string());
        let runtime = RuntimeConfig::load(&dotenv, &process_env).unwrap();
        let cancellation = CancellationToken::new();

        let outcomes = run_all(&app_config, &runtime, None, &[], &cancellation).await.unwrap();
        assert!(outcomes.is_empty());
    }
}
