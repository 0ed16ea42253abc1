//! # Visit Engine
//!
//! A best-effort visitor/session tracking engine for single-page
//! storefronts: it observes in-app route changes, decides which visits are
//! worth reporting, maintains a durable visitor identity and a time-bounded
//! session, and relays visit events to an analytics endpoint without ever
//! blocking or breaking the hosting application.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Navigation Watcher                       │
//! │  • Wraps the host's history mutation entry points           │
//! │  • Debounces bursts (500ms) to the final destination        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Visit Pipeline                         │
//! │  • Cooldown policy (30s same-page, 5s cross-page)           │
//! │  • Session lifecycle (30min inactivity expiry)              │
//! │  • Identity store: durable visitor + session blobs          │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Dispatcher                           │
//! │  • One POST per accepted visit, 8s client-side timeout      │
//! │  • Every failure is silent: no retry, nothing propagates    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use visit_engine::{
//!     JsonFileStore, NavigationWatcher, TrackerConfig, VisitEngine,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = TrackerConfig {
//!         api_base: Some("https://analytics.example.com".into()),
//!         ..Default::default()
//!     };
//!
//!     let store = Arc::new(JsonFileStore::open("visit_state.json"));
//!     let engine = Arc::new(VisitEngine::with_store(config, store));
//!     engine.start();
//!
//!     // Observe in-app navigation
//!     let watcher = NavigationWatcher::spawn(engine.clone(), 500);
//!     watcher.notify("/products/42");
//!
//!     // Or report manually
//!     engine.track_visit(Some("/checkout"), Some("Checkout")).await;
//!
//!     // Teardown leaves no dangling timer or history patch
//!     watcher.shutdown();
//!     engine.shutdown();
//! }
//! ```
//!
//! ## Guarantees (and non-guarantees)
//!
//! - **Non-blocking**: no error from storage, network, or configuration
//!   ever reaches the host; the only observable failure is an untracked
//!   visit.
//! - **Best-effort delivery**: no retry, no queue. The next organic
//!   navigation is the retry.
//! - **Last-write-wins across tabs**: concurrent processes sharing a store
//!   race without coordination; the engine never reconciles.
//!
//! ## Modules
//!
//! - [`engine`]: the [`VisitEngine`] coordinator and visit pipeline
//! - [`watcher`]: history decorator + debounce
//! - [`cooldown`]: report-worthiness policy
//! - [`session`]: session lifecycle
//! - [`cleanup`]: cooldown bookkeeping bounds
//! - [`dispatch`]: wire payload and silent-failure transport
//! - [`storage`]: the state-store port and its backends
//! - [`environment`]: device/browser classification

pub mod cleanup;
pub mod config;
pub mod cooldown;
pub mod dispatch;
pub mod engine;
pub mod environment;
pub mod identity;
pub mod records;
pub mod session;
pub mod storage;
pub mod watcher;

pub use config::TrackerConfig;
pub use cooldown::{CooldownPolicy, Decision};
pub use dispatch::{BackendAck, Dispatcher, HttpTransport, Transport, TransportError, VisitPayload};
pub use engine::{EngineState, VisitEngine};
pub use environment::{BrowserFamily, DeviceType, EnvironmentInfo};
pub use identity::IdentityStore;
pub use records::{SessionRecord, VisitorRecord};
pub use storage::{JsonFileStore, MemoryStore, StateStore, StorageError};
pub use watcher::{HistoryBackend, HistoryBinding, NavigationWatcher};
