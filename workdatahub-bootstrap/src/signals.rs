// /////////////////////////////////////////////////////////////////////////////
// WorkDataHub
// Copyright (c) 2026 WorkDataHub Contributors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Signal Handling
//!
//! A run is cancelled cooperatively: the pipeline framework checks a
//! [`CancellationToken`] at each step boundary (spec.md §5) rather than
//! being torn down mid-step. This module's job is narrow — translate
//! SIGTERM/SIGINT/SIGHUP into that token being cancelled.

use std::future::Future;
use std::pin::Pin;

use tokio_util::sync::CancellationToken;

/// Abstracts "wait for a shutdown signal" so tests can substitute a handler
/// that never fires.
pub trait SystemSignals: Send + Sync {
    fn wait_for_signal(&self, token: CancellationToken) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

#[cfg(unix)]
pub struct UnixSignalHandler;

#[cfg(unix)]
impl UnixSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Default for UnixSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl SystemSignals for UnixSignalHandler {
    fn wait_for_signal(&self, token: CancellationToken) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let Ok(mut sigterm) = signal(SignalKind::terminate()) else {
                tracing::warn!("could not register SIGTERM handler");
                return;
            };
            let Ok(mut sigint) = signal(SignalKind::interrupt()) else {
                tracing::warn!("could not register SIGINT handler");
                return;
            };
            let Ok(mut sighup) = signal(SignalKind::hangup()) else {
                tracing::warn!("could not register SIGHUP handler");
                return;
            };

            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM, cancelling run at next step boundary"),
                _ = sigint.recv() => tracing::info!("received SIGINT, cancelling run at next step boundary"),
                _ = sighup.recv() => tracing::info!("received SIGHUP, cancelling run at next step boundary"),
            }

            token.cancel();
        })
    }
}

#[cfg(not(unix))]
pub struct GenericSignalHandler;

#[cfg(not(unix))]
impl GenericSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(not(unix))]
impl SystemSignals for GenericSignalHandler {
    fn wait_for_signal(&self, token: CancellationToken) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received Ctrl+C, cancelling run at next step boundary");
                token.cancel();
            }
        })
    }
}

/// A handler that never fires, for tests that control cancellation directly.
pub struct NoOpSignalHandler;

impl NoOpSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignals for NoOpSignalHandler {
    fn wait_for_signal(&self, _token: CancellationToken) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(std::future::pending())
    }
}

pub fn create_signal_handler() -> Box<dyn SystemSignals> {
    #[cfg(unix)]
    {
        Box::new(UnixSignalHandler::new())
    }
    #[cfg(not(unix))]
    {
        Box::new(GenericSignalHandler::new())
    }
}
