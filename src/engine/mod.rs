// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Tracking engine coordinator.
//!
//! The [`VisitEngine`] ties the components together: the identity store,
//! the cooldown policy, the session lifecycle, and the dispatcher. The
//! navigation watcher drives it from outside; hosts can also call
//! [`track_visit`](VisitEngine::track_visit) directly.
//!
//! # Lifecycle
//!
//! ```text
//! Created → start() → Running | Disabled → shutdown() → ShutDown
//! ```
//!
//! `Disabled` is terminal for the process: no endpoint, the kill switch, or
//! an administrative operator all land there, and the engine performs no
//! store or network activity afterwards.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use visit_engine::{MemoryStore, TrackerConfig, VisitEngine, EngineState};
//!
//! let config = TrackerConfig::default(); // no endpoint
//! let engine = VisitEngine::with_store(config, Arc::new(MemoryStore::new()));
//!
//! assert_eq!(engine.state(), EngineState::Created);
//! engine.start();
//! assert_eq!(engine.state(), EngineState::Disabled);
//! assert!(!engine.is_tracking());
//! ```

mod pipeline;

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::json;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cleanup::prune_session_pages;
use crate::config::TrackerConfig;
use crate::cooldown::CooldownPolicy;
use crate::dispatch::{Dispatcher, HttpTransport, Transport};
use crate::environment::EnvironmentInfo;
use crate::identity::IdentityStore;
use crate::records::SessionRecord;
use crate::storage::StateStore;

/// Engine lifecycle state.
///
/// Use [`VisitEngine::state()`] to check the current state or
/// [`VisitEngine::state_receiver()`] to watch for changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Just created, not yet started
    Created,
    /// Accepting and reporting visits
    Running,
    /// Permanently inert: no endpoint, kill switch, or administrative operator
    Disabled,
    /// Shut down by the host
    ShutDown,
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::Running => write!(f, "Running"),
            Self::Disabled => write!(f, "Disabled"),
            Self::ShutDown => write!(f, "ShutDown"),
        }
    }
}

/// Main tracking engine coordinator.
///
/// Thread safe; methods take `&self` and the engine is designed to be
/// shared behind an `Arc` between the navigation watcher and the host.
pub struct VisitEngine {
    pub(crate) config: TrackerConfig,
    pub(crate) identity: IdentityStore,
    pub(crate) policy: CooldownPolicy,
    pub(crate) dispatcher: Option<Dispatcher>,
    /// Environment fallback for urls/titles the host omits
    pub(crate) environment: RwLock<EnvironmentInfo>,
    state: watch::Sender<EngineState>,
    state_rx: watch::Receiver<EngineState>,
}

impl VisitEngine {
    /// Create an engine over an explicit store and transport.
    ///
    /// This is the fully-injected constructor tests use; production hosts
    /// usually want [`with_store`](Self::with_store), which wires up the
    /// HTTP transport from the config.
    pub fn new(
        config: TrackerConfig,
        store: Arc<dyn StateStore>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Self {
        let (state_tx, state_rx) = watch::channel(EngineState::Created);
        let policy = CooldownPolicy::from_config(&config);

        Self {
            identity: IdentityStore::new(store),
            policy,
            dispatcher: transport.map(Dispatcher::new),
            environment: RwLock::new(EnvironmentInfo::default()),
            state: state_tx,
            state_rx,
            config,
        }
    }

    /// Create an engine whose transport is built from `config.api_base`.
    ///
    /// A missing endpoint, or a transport that fails to build, leaves the
    /// engine without a dispatcher; `start()` then lands in `Disabled`.
    pub fn with_store(config: TrackerConfig, store: Arc<dyn StateStore>) -> Self {
        let transport: Option<Arc<dyn Transport>> = config.api_base.as_deref().and_then(|base| {
            match HttpTransport::new(base, config.dispatch_timeout_ms) {
                Ok(t) => Some(Arc::new(t) as Arc<dyn Transport>),
                Err(e) => {
                    debug!(error = %e, "HTTP transport unavailable, tracking disabled");
                    None
                }
            }
        });
        Self::new(config, store, transport)
    }

    /// Activate the engine: sample the admin flag, prime the visitor record
    /// for a new calendar day, and run the cleanup job.
    ///
    /// Configuration faults never error; the engine becomes a no-op.
    pub fn start(&self) {
        if self.state() != EngineState::Created {
            return;
        }

        if !self.config.is_enabled() || self.dispatcher.is_none() {
            info!("Tracking disabled by configuration");
            let _ = self.state.send(EngineState::Disabled);
            return;
        }

        // Admin check happens before any other store access; a Disabled
        // engine never touches the store or network again
        if self.identity.is_admin() {
            info!("Administrative session, tracking disabled");
            let _ = self.state.send(EngineState::Disabled);
            return;
        }

        let now = chrono::Utc::now();
        let mut visitor = self.identity.visitor();
        let mut dirty = false;

        // New calendar day resets the new-visitor flag
        if visitor.is_first_visit_of(now.date_naive()) && !visitor.is_new_visitor {
            visitor.is_new_visitor = true;
            dirty = true;
        }

        // Bound cooldown bookkeeping growth (persist only on change)
        if prune_session_pages(&mut visitor, now.timestamp_millis(), self.config.page_history_max_age_ms) {
            dirty = true;
        }

        if dirty {
            self.identity.merge_visitor(json!({
                "isNewVisitor": visitor.is_new_visitor,
                "sessionPages": visitor.session_pages,
            }));
        }

        let _ = self.state.send(EngineState::Running);
        info!("Visit tracking engine running");
    }

    /// Stop tracking. Pending dispatches are not awaited; they complete or
    /// time out on their own.
    pub fn shutdown(&self) {
        let _ = self.state.send(EngineState::ShutDown);
        info!("Visit tracking engine shut down");
    }

    /// Get current engine state.
    #[must_use]
    pub fn state(&self) -> EngineState {
        *self.state_rx.borrow()
    }

    /// Get a receiver to watch state changes.
    #[must_use]
    pub fn state_receiver(&self) -> watch::Receiver<EngineState> {
        self.state_rx.clone()
    }

    /// True iff an endpoint is configured, tracking is not disabled, and
    /// the operator is not administrative.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.state() == EngineState::Running
    }

    /// Update the environment fallback the engine reads when a navigation
    /// arrives without an explicit url/title.
    pub fn set_environment(&self, env: EnvironmentInfo) {
        *self.environment.write() = env;
    }

    // --- Read-only status surface ---

    /// Current visitor id, if the backend has assigned one.
    #[must_use]
    pub fn visitor_id(&self) -> Option<String> {
        if !self.is_tracking() {
            return None;
        }
        let id = self.identity.visitor().visitor_id;
        (!id.is_empty()).then_some(id)
    }

    /// The persisted session, filtered through the inactivity timeout. An
    /// expired record is reported as absent even though the blob lingers
    /// until the next accepted report replaces it.
    fn live_session(&self) -> Option<SessionRecord> {
        let session = self.identity.session()?;
        let now_ms = chrono::Utc::now().timestamp_millis();
        (!session.is_expired(now_ms, self.config.session_timeout_ms)).then_some(session)
    }

    /// Current session id, if a live session exists.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        if !self.is_tracking() {
            return None;
        }
        self.live_session().map(|s| s.session_id)
    }

    /// Whether the current visitor is new today.
    #[must_use]
    pub fn is_new_visitor(&self) -> bool {
        if !self.is_tracking() {
            return false;
        }
        self.identity.visitor().is_new_visitor
    }

    /// Page URLs observed this session, in first-visit order. Empty once
    /// the session has expired.
    #[must_use]
    pub fn session_pages(&self) -> Vec<String> {
        if !self.is_tracking() {
            return Vec::new();
        }
        self.live_session()
            .map(|s| s.pages_visited)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn engine_without_endpoint() -> VisitEngine {
        VisitEngine::with_store(TrackerConfig::default(), Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_created_state() {
        let engine = engine_without_endpoint();
        assert_eq!(engine.state(), EngineState::Created);
        assert!(!engine.is_tracking());
    }

    #[test]
    fn test_no_endpoint_disables() {
        let engine = engine_without_endpoint();
        engine.start();
        assert_eq!(engine.state(), EngineState::Disabled);
        assert!(!engine.is_tracking());
        assert!(engine.visitor_id().is_none());
        assert!(engine.session_id().is_none());
        assert!(engine.session_pages().is_empty());
    }

    #[test]
    fn test_kill_switch_disables() {
        let config = TrackerConfig {
            api_base: Some("https://api.example.com".into()),
            disabled: true,
            ..Default::default()
        };
        let engine = VisitEngine::with_store(config, Arc::new(MemoryStore::new()));
        engine.start();
        assert_eq!(engine.state(), EngineState::Disabled);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(format!("{}", EngineState::Created), "Created");
        assert_eq!(format!("{}", EngineState::Running), "Running");
        assert_eq!(format!("{}", EngineState::Disabled), "Disabled");
        assert_eq!(format!("{}", EngineState::ShutDown), "ShutDown");
    }

    #[test]
    fn test_start_twice_is_idempotent() {
        let engine = engine_without_endpoint();
        engine.start();
        engine.start();
        assert_eq!(engine.state(), EngineState::Disabled);
    }

    #[test]
    fn test_state_receiver_observes_transitions() {
        let engine = engine_without_endpoint();
        let rx = engine.state_receiver();
        engine.start();
        assert_eq!(*rx.borrow(), EngineState::Disabled);
    }
}
