// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # External Lookup Provider (Layer 4)
//!
//! [`EqcProvider`] is the port Layer 4 of company resolution calls through;
//! [`HttpEqcProvider`] is the only implementation, a thin `reqwest` client
//! against an EQC-class company lookup API. Kept as a trait so resolver
//! tests never make a real HTTP call.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use workdatahub_domain::error::WdhError;

/// One candidate match returned by the external provider, before confidence
/// is assigned from the configured match-type table (spec.md §4.6 Layer 4).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EqcCandidate {
    pub company_id: String,
    /// The provider's Chinese match-type label, e.g. `全称精确匹配`.
    #[serde(rename = "type")]
    pub match_type: String,
}

#[async_trait]
pub trait EqcProvider: Send + Sync {
    /// Looks up `name`. Auth failures must be surfaced as
    /// `WdhError::EnrichmentProvider` with a message containing `401` or
    /// `403` so the resolver can recognize and disable the provider for the
    /// remainder of the run (spec.md §4.6); retryable failures should read
    /// like the status codes `pipeline::retry::classify` matches on.
    async fn lookup(&self, name: &str) -> Result<Vec<EqcCandidate>, WdhError>;
}

/// Per-attempt timeout for the external lookup call (spec.md §5).
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub struct HttpEqcProvider {
    client: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl HttpEqcProvider {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Result<Self, WdhError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| WdhError::internal(format!("could not build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            api_token: api_token.into(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    candidates: Vec<EqcCandidate>,
}

#[async_trait]
impl EqcProvider for HttpEqcProvider {
    async fn lookup(&self, name: &str) -> Result<Vec<EqcCandidate>, WdhError> {
        let response = self
            .client
            .get(format!("{}/lookup", self.base_url))
            .bearer_auth(&self.api_token)
            .query(&[("name", name)])
            .send()
            .await
            .map_err(|e| {
                let message = if e.is_timeout() {
                    format!("request timed out: {e}")
                } else {
                    format!("request failed: {e}")
                };
                WdhError::EnrichmentProvider { message }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(WdhError::EnrichmentProvider {
                message: format!("{} auth failure from lookup provider", status.as_u16()),
            });
        }
        if !status.is_success() {
            return Err(WdhError::EnrichmentProvider {
                message: format!("{} response from lookup provider", status.as_u16()),
            });
        }

        let body: LookupResponse = response
            .json()
            .await
            .map_err(|e| WdhError::EnrichmentProvider {
                message: format!("malformed lookup response: {e}"),
            })?;
        Ok(body.candidates)
    }
}
