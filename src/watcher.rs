// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Navigation watching for same-document route changes.
//!
//! Single-page navigation mutates history in memory instead of reloading
//! the document, so there is no load event to observe. Two sources must
//! both be covered:
//!
//! - programmatic history mutation: [`HistoryBinding`] wraps the host's
//!   two mutation entry points ("wrap, delegate, then notify"), with a
//!   symmetric [`restore`](HistoryBinding::restore) that hands the original
//!   backend back and stops notifying
//! - user back/forward: the host forwards its history-change notification
//!   to [`HistoryBinding::pop_state`]
//!
//! Detected transitions are debounced: each one schedules a delayed report
//! and cancels any report still pending, so a chain of programmatic
//! redirects collapses into a single visit for the final destination.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::engine::VisitEngine;

/// The host's two native history mutation entry points.
pub trait HistoryBackend: Send + Sync {
    fn push_state(&self, url: &str);
    fn replace_state(&self, url: &str);
}

/// Watches navigation signals and drives the engine after a quiet period.
pub struct NavigationWatcher {
    tx: mpsc::UnboundedSender<String>,
    task: JoinHandle<()>,
}

impl NavigationWatcher {
    /// Spawn the debounce task. `debounce_ms` is the quiet period a
    /// transition must survive before it is reported.
    pub fn spawn(engine: Arc<VisitEngine>, debounce_ms: u64) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let debounce = Duration::from_millis(debounce_ms);

        let task = tokio::spawn(async move {
            // Currently-known URL, for idempotence against redundant signals
            let mut known_url: Option<String> = None;
            // The single pending report; rescheduling replaces it
            let mut pending: Option<String> = None;

            let sleep = tokio::time::sleep(Duration::ZERO);
            tokio::pin!(sleep);

            loop {
                tokio::select! {
                    signal = rx.recv() => {
                        let Some(url) = signal else { break };
                        if known_url.as_deref() == Some(url.as_str()) {
                            continue;
                        }
                        known_url = Some(url.clone());
                        pending = Some(url);
                        sleep.as_mut().reset(tokio::time::Instant::now() + debounce);
                    }
                    () = &mut sleep, if pending.is_some() => {
                        if let Some(url) = pending.take() {
                            debug!(url = %url, "Debounce elapsed, reporting visit");
                            engine.track_visit(Some(&url), None).await;
                        }
                    }
                }
            }
            debug!("Navigation watcher stopped");
        });

        Self { tx, task }
    }

    /// Wrap a history backend so every mutation also feeds this watcher.
    pub fn bind(&self, inner: Arc<dyn HistoryBackend>) -> HistoryBinding {
        HistoryBinding {
            inner,
            tx: self.tx.clone(),
            restored: AtomicBool::new(false),
        }
    }

    /// Feed a raw transition signal, bypassing any binding.
    pub fn notify(&self, url: &str) {
        let _ = self.tx.send(url.to_string());
    }

    /// Tear down: cancels any pending debounced report.
    pub fn shutdown(self) {
        debug!("Navigation watcher shutting down");
        // Drop aborts the task
    }
}

impl Drop for NavigationWatcher {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// "Wrap, delegate, then notify" decorator over the host's history
/// mutation entry points.
///
/// After [`restore`](Self::restore) the binding keeps delegating (the host
/// may still hold it) but stops notifying: the watcher observes nothing
/// further, matching an uninstalled patch.
pub struct HistoryBinding {
    inner: Arc<dyn HistoryBackend>,
    tx: mpsc::UnboundedSender<String>,
    restored: AtomicBool,
}

impl HistoryBinding {
    fn notify(&self, url: &str) {
        if !self.restored.load(Ordering::Acquire) {
            let _ = self.tx.send(url.to_string());
        }
    }

    /// User-driven back/forward navigation.
    pub fn pop_state(&self, url: &str) {
        self.notify(url);
    }

    /// Uninstall: hand the original backend back and stop notifying.
    pub fn restore(&self) -> Arc<dyn HistoryBackend> {
        self.restored.store(true, Ordering::Release);
        self.inner.clone()
    }
}

impl HistoryBackend for HistoryBinding {
    fn push_state(&self, url: &str) {
        self.inner.push_state(url);
        self.notify(url);
    }

    fn replace_state(&self, url: &str) {
        self.inner.replace_state(url);
        self.notify(url);
    }
}
